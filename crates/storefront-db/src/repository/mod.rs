//! # Repository Module
//!
//! One repository per registered model.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Every Write                                     │
//! │                                                                         │
//! │  NewCart / NewCategory / edited document                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  assign id + timestamps (store-owned fields)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RegisteredModel::hydrate / check  ──► DbError::Validation             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT / UPDATE                   ──► DbError::UniqueViolation        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CartRepository`](cart::CartRepository) - one cart per user
//! - [`CategoryRepository`](category::CategoryRepository) - unique name / slug

pub mod cart;
pub mod category;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use serde_json::Value;
use storefront_core::ObjectId;

use crate::error::{DbError, DbResult};

/// Store clock. Millisecond precision, like the timestamps it maintains.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Serializes a construction input and adds the fields the store owns.
pub(crate) fn new_document<T: Serialize>(
    entity: &str,
    input: &T,
    id: ObjectId,
    timestamps: Option<DateTime<Utc>>,
) -> DbResult<Value> {
    let mut doc = serde_json::to_value(input).map_err(|e| DbError::corrupt(entity, e))?;

    let obj = doc
        .as_object_mut()
        .ok_or_else(|| DbError::corrupt(entity, "input is not a document"))?;

    obj.insert("id".to_string(), Value::String(id.to_string()));
    if let Some(at) = timestamps {
        let at = serde_json::to_value(at).map_err(|e| DbError::corrupt(entity, e))?;
        obj.insert("createdAt".to_string(), at.clone());
        obj.insert("updatedAt".to_string(), at);
    }

    Ok(doc)
}

/// Parses an id column back into an [`ObjectId`].
pub(crate) fn parse_id(entity: &str, raw: &str) -> DbResult<ObjectId> {
    raw.parse().map_err(|e| DbError::corrupt(entity, e))
}
