//! # Schema Declarations
//!
//! Typed descriptions of a document's fields and constraints.
//!
//! ## How A Document Is Checked
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Write-Time Schema Check                             │
//! │                                                                         │
//! │  serde_json::Value (serialized model or raw input)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply_defaults()   image missing? → ""                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate()         for each field, in declaration order:              │
//! │       │               required → type → minimum → nested array         │
//! │       │                                                                 │
//! │       ├── first violation → ValidationError (field path included)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OK → store enforces unique_fields() with UNIQUE indexes               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Uniqueness is declared here but never checked here: only the store can
//! see the other documents.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::validation::{validate_min, validate_required, ValidationResult};

/// The storage type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Reference to another document, stored as a string.
    ObjectId,
    String,
    Number,
    /// RFC 3339 string.
    Timestamp,
    /// Ordered sequence of embedded sub-documents.
    Array(Box<Schema>),
}

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            FieldKind::ObjectId => "object id",
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Array(_) => "array",
        }
    }
}

/// A single field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub unique: bool,
    /// Inclusive lower bound, only meaningful for `Number`.
    pub min: Option<f64>,
    /// Value filled in by `apply_defaults` when the field is absent.
    pub default: Option<Value>,
}

impl FieldDef {
    /// Declares an optional field with no constraints.
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldDef {
            name,
            kind,
            required: false,
            unique: false,
            min: None,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// An ordered list of field declarations.
///
/// ## Example
/// ```rust
/// use storefront_core::schema::{FieldDef, FieldKind, Schema};
///
/// let schema = Schema::new()
///     .field(FieldDef::new("name", FieldKind::String).required().unique())
///     .field(FieldDef::new("image", FieldKind::String).default_value(""));
///
/// let mut doc = serde_json::json!({ "name": "Drinks" });
/// schema.apply_defaults(&mut doc);
/// assert_eq!(doc["image"], "");
/// assert!(schema.validate(&doc).is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDef>,
    timestamps: bool,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    /// Appends a field declaration.
    pub fn field(mut self, def: FieldDef) -> Self {
        self.fields.push(def);
        self
    }

    /// Declares store-maintained `createdAt` / `updatedAt` fields.
    pub fn with_timestamps(mut self) -> Self {
        self.timestamps = true;
        self.fields
            .push(FieldDef::new("createdAt", FieldKind::Timestamp).required());
        self.fields
            .push(FieldDef::new("updatedAt", FieldKind::Timestamp).required());
        self
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn has_timestamps(&self) -> bool {
        self.timestamps
    }

    /// Names of fields the store must index uniquely.
    pub fn unique_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.unique).map(|f| f.name)
    }

    /// Fills absent (or null) fields that declare a default.
    ///
    /// Recurses into arrays of sub-documents. Non-object documents are left
    /// untouched; `validate` reports them.
    pub fn apply_defaults(&self, doc: &mut Value) {
        let Some(obj) = doc.as_object_mut() else {
            return;
        };

        for def in &self.fields {
            if let Some(default) = &def.default {
                let missing = obj.get(def.name).map_or(true, Value::is_null);
                if missing {
                    obj.insert(def.name.to_string(), default.clone());
                }
            }

            if let (FieldKind::Array(inner), Some(Value::Array(items))) =
                (&def.kind, obj.get_mut(def.name))
            {
                for item in items.iter_mut() {
                    inner.apply_defaults(item);
                }
            }
        }
    }

    /// Checks a document against every declared constraint except
    /// uniqueness.
    pub fn validate(&self, doc: &Value) -> ValidationResult<()> {
        let obj = doc.as_object().ok_or_else(|| ValidationError::NotADocument {
            model: "document".to_string(),
        })?;
        self.validate_object(obj, "")
    }

    fn validate_object(&self, obj: &Map<String, Value>, prefix: &str) -> ValidationResult<()> {
        for def in &self.fields {
            let path = format!("{}{}", prefix, def.name);

            let value = match obj.get(def.name) {
                None | Some(Value::Null) => {
                    if def.required {
                        return Err(ValidationError::Required { field: path });
                    }
                    continue;
                }
                Some(v) => v,
            };

            match (&def.kind, value) {
                (FieldKind::ObjectId | FieldKind::String | FieldKind::Timestamp, Value::String(s)) => {
                    if def.required {
                        validate_required(&path, s)?;
                    }
                    if def.kind == FieldKind::Timestamp
                        && chrono::DateTime::parse_from_rfc3339(s).is_err()
                    {
                        return Err(ValidationError::InvalidFormat {
                            field: path,
                            reason: "expected an RFC 3339 timestamp".to_string(),
                        });
                    }
                    if def.kind == FieldKind::ObjectId && uuid::Uuid::parse_str(s).is_err() {
                        return Err(ValidationError::InvalidFormat {
                            field: path,
                            reason: "must be a valid object id".to_string(),
                        });
                    }
                }
                (FieldKind::Number, Value::Number(n)) => {
                    if let (Some(min), Some(n)) = (def.min, n.as_f64()) {
                        validate_min(&path, n, min)?;
                    }
                }
                (FieldKind::Array(inner), Value::Array(items)) => {
                    for (idx, item) in items.iter().enumerate() {
                        let item_path = format!("{}.{}", path, idx);
                        let item_obj =
                            item.as_object()
                                .ok_or_else(|| ValidationError::InvalidFormat {
                                    field: item_path.clone(),
                                    reason: "expected a sub-document".to_string(),
                                })?;
                        inner.validate_object(item_obj, &format!("{}.", item_path))?;
                    }
                }
                (kind, _) => {
                    return Err(ValidationError::InvalidFormat {
                        field: path,
                        reason: format!("expected {}", kind.describe()),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const USER: &str = "6f1c2a4e-8b3d-4c5a-9e7f-0a1b2c3d4e5f";
    const PRODUCT_A: &str = "0d9e8f7a-6b5c-4d3e-8f2a-1b0c9d8e7f6a";
    const PRODUCT_B: &str = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d";

    fn item_schema() -> Schema {
        Schema::new()
            .field(FieldDef::new("productId", FieldKind::ObjectId).required())
            .field(FieldDef::new("quantity", FieldKind::Number).required().min(0.1))
    }

    fn cart_like() -> Schema {
        Schema::new()
            .field(FieldDef::new("userId", FieldKind::ObjectId).required().unique())
            .field(FieldDef::new("items", FieldKind::Array(Box::new(item_schema()))))
    }

    #[test]
    fn test_required_missing_and_empty() {
        let schema = cart_like();

        let err = schema.validate(&json!({ "items": [] })).unwrap_err();
        assert_eq!(err.field(), Some("userId"));

        let err = schema.validate(&json!({ "userId": "" })).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));

        let err = schema.validate(&json!({ "userId": null })).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
    }

    #[test]
    fn test_nested_minimum_reports_path() {
        let schema = cart_like();
        let doc = json!({
            "userId": USER,
            "items": [
                { "productId": PRODUCT_A, "quantity": 2 },
                { "productId": PRODUCT_B, "quantity": 0.05 }
            ]
        });

        let err = schema.validate(&doc).unwrap_err();
        assert_eq!(
            err,
            ValidationError::BelowMinimum {
                field: "items.1.quantity".to_string(),
                value: 0.05,
                min: 0.1,
            }
        );
    }

    #[test]
    fn test_nested_required() {
        let doc = json!({ "userId": USER, "items": [{ "quantity": 1 }] });
        let err = cart_like().validate(&doc).unwrap_err();
        assert_eq!(err.field(), Some("items.0.productId"));
    }

    #[test]
    fn test_type_mismatch() {
        let doc = json!({ "userId": USER, "items": [{ "productId": PRODUCT_A, "quantity": "two" }] });
        let err = cart_like().validate(&doc).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));

        let err = cart_like().validate(&json!({ "userId": USER, "items": {} })).unwrap_err();
        assert_eq!(err.field(), Some("items"));
    }

    #[test]
    fn test_object_ids_must_parse() {
        let doc = json!({ "userId": "U1", "items": [] });
        let err = cart_like().validate(&doc).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFormat { ref field, .. } if field == "userId"
        ));

        let doc = json!({
            "userId": USER,
            "items": [
                { "productId": PRODUCT_A, "quantity": 1 },
                { "productId": "P1", "quantity": 1 }
            ]
        });
        let err = cart_like().validate(&doc).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFormat { ref field, .. } if field == "items.1.productId"
        ));
    }

    #[test]
    fn test_not_a_document() {
        let err = cart_like().validate(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ValidationError::NotADocument { .. }));
    }

    #[test]
    fn test_defaults_fill_missing_and_null() {
        let schema = Schema::new()
            .field(FieldDef::new("name", FieldKind::String).required())
            .field(FieldDef::new("image", FieldKind::String).default_value(""));

        let mut doc = json!({ "name": "Fruit" });
        schema.apply_defaults(&mut doc);
        assert_eq!(doc["image"], json!(""));

        let mut doc = json!({ "name": "Fruit", "image": null });
        schema.apply_defaults(&mut doc);
        assert_eq!(doc["image"], json!(""));

        let mut doc = json!({ "name": "Fruit", "image": "/img/fruit.png" });
        schema.apply_defaults(&mut doc);
        assert_eq!(doc["image"], json!("/img/fruit.png"));
    }

    #[test]
    fn test_timestamps_are_required_and_parsed() {
        let schema = Schema::new().with_timestamps();
        assert!(schema.has_timestamps());

        let err = schema.validate(&json!({})).unwrap_err();
        assert_eq!(err.field(), Some("createdAt"));

        let doc = json!({ "createdAt": "yesterday", "updatedAt": "2024-01-01T00:00:00Z" });
        let err = schema.validate(&doc).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));

        let doc = json!({
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        });
        assert!(schema.validate(&doc).is_ok());
    }

    #[test]
    fn test_unique_fields() {
        let schema = Schema::new()
            .field(FieldDef::new("name", FieldKind::String).required().unique())
            .field(FieldDef::new("slug", FieldKind::String).required().unique())
            .field(FieldDef::new("image", FieldKind::String));

        let unique: Vec<_> = schema.unique_fields().collect();
        assert_eq!(unique, vec!["name", "slug"]);
    }
}
