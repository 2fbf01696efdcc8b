//! # Model Registry
//!
//! Process-wide map from model name to its registered schema.
//!
//! ## Idempotent Registration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_or_register("Cart", schema)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock models                                                           │
//! │       │                                                                 │
//! │       ├── "Cart" present? → return existing Arc (new schema dropped)   │
//! │       │                                                                 │
//! │       └── absent → insert Arc<RegisteredModel>, return it              │
//! │                                                                         │
//! │  Check and insert happen under one lock, so re-running module          │
//! │  initialization (hot reload, a second Database handle) never races     │
//! │  and never defines a model twice.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The registry is not a global. Callers share it through an
//! `Arc<ModelRegistry>` handle passed to whoever needs it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::schema::Schema;
use crate::validation::ValidationResult;

/// A document type that can be registered and persisted.
pub trait Model: Serialize + DeserializeOwned {
    /// Registry key, e.g. `"Cart"`.
    const NAME: &'static str;

    /// Fresh schema declaration for this model.
    fn schema() -> Schema;

    /// Checks typed fields that do not survive JSON serialization.
    ///
    /// Runs before the schema sees the document. Non-finite floats
    /// serialize as `null` and would otherwise be reported as missing.
    fn check_fields(&self) -> ValidationResult<()> {
        Ok(())
    }
}

/// A schema bound to its model name.
#[derive(Debug, PartialEq)]
pub struct RegisteredModel {
    name: String,
    schema: Schema,
}

impl RegisteredModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates a raw document against this model's schema.
    pub fn validate(&self, doc: &Value) -> ValidationResult<()> {
        self.schema.validate(doc).map_err(|err| match err {
            ValidationError::NotADocument { .. } => ValidationError::NotADocument {
                model: self.name.clone(),
            },
            other => other,
        })
    }

    /// Applies defaults, validates and deserializes a raw document.
    pub fn hydrate<M: Model>(&self, mut doc: Value) -> CoreResult<M> {
        self.schema.apply_defaults(&mut doc);
        self.validate(&doc)?;

        serde_json::from_value(doc).map_err(|e| CoreError::Hydration {
            model: self.name.clone(),
            reason: e.to_string(),
        })
    }

    /// Validates an already typed document before it is written.
    pub fn check<M: Model>(&self, model: &M) -> CoreResult<()> {
        model.check_fields()?;

        let doc = serde_json::to_value(model).map_err(|e| CoreError::Hydration {
            model: self.name.clone(),
            reason: e.to_string(),
        })?;
        self.validate(&doc)?;
        Ok(())
    }
}

/// Registry of model definitions keyed by name.
///
/// ## Usage
/// ```rust
/// use std::sync::Arc;
/// use storefront_core::{Cart, ModelRegistry};
///
/// let registry = Arc::new(ModelRegistry::new());
/// let first = registry.register::<Cart>();
/// let second = registry.register::<Cart>();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Mutex<HashMap<String, Arc<RegisteredModel>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        ModelRegistry::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<RegisteredModel>>> {
        // Inserts are single calls, so a poisoned map is still consistent.
        self.models.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the existing registration for `name`, or registers `schema`
    /// under it.
    pub fn get_or_register(&self, name: &str, schema: Schema) -> Arc<RegisteredModel> {
        let mut models = self.lock();

        if let Some(existing) = models.get(name) {
            debug!(model = %name, "Model already registered, reusing");
            return Arc::clone(existing);
        }

        let model = Arc::new(RegisteredModel {
            name: name.to_string(),
            schema,
        });
        models.insert(name.to_string(), Arc::clone(&model));

        let unique: Vec<&str> = model.schema.unique_fields().collect();
        info!(model = %name, unique = ?unique, "Model registered");
        model
    }

    /// Registers `M` under [`Model::NAME`], reusing an existing registration.
    pub fn register<M: Model>(&self) -> Arc<RegisteredModel> {
        self.get_or_register(M::NAME, M::schema())
    }

    pub fn get(&self, name: &str) -> Option<Arc<RegisteredModel>> {
        self.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
