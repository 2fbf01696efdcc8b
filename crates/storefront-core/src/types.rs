//! # Document Types
//!
//! The documents persisted by the storefront store.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Document Types                                  │
//! │                                                                         │
//! │  ┌─────────────────────┐            ┌─────────────────────┐            │
//! │  │        Cart         │            │      Category       │            │
//! │  │  ─────────────────  │            │  ─────────────────  │            │
//! │  │  id        ObjectId │            │  id        ObjectId │            │
//! │  │  userId    (unique) │──► User    │  name      (unique) │            │
//! │  │  items     [..]     │            │  slug      (unique) │            │
//! │  │  createdAt          │            │  image     = ""     │            │
//! │  │  updatedAt          │            └─────────────────────┘            │
//! │  └─────────┬───────────┘                                                │
//! │            │ owns                                                       │
//! │  ┌─────────▼───────────┐                                                │
//! │  │      CartItem       │                                                │
//! │  │  productId ─────────┼──► Product                                    │
//! │  │  quantity  ≥ 0.1    │                                                │
//! │  └─────────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names are serialized in camelCase; that is the persisted layout.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::registry::Model;
use crate::schema::{FieldDef, FieldKind, Schema};
use crate::validation::{validate_quantity, ValidationResult};
use crate::MIN_ITEM_QUANTITY;

// =============================================================================
// ObjectId
// =============================================================================

/// Opaque document identifier, assigned by the store on creation.
///
/// Backed by a v4 UUID so ids can be generated without coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        ObjectId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        ObjectId::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ObjectId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(ObjectId)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "id".to_string(),
                reason: "must be a valid object id".to_string(),
            })
    }
}

impl From<Uuid> for ObjectId {
    fn from(id: Uuid) -> Self {
        ObjectId(id)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One line of a cart. Owned by its cart; has no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Referenced product.
    #[ts(as = "String")]
    pub product_id: ObjectId,

    /// Fractional quantities are allowed; must be at least 0.1.
    pub quantity: f64,
}

impl CartItem {
    pub fn new(product_id: ObjectId, quantity: f64) -> Self {
        CartItem {
            product_id,
            quantity,
        }
    }
}

/// A user's shopping cart. At most one per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    #[ts(as = "String")]
    pub id: ObjectId,

    /// Owning user. Unique across all carts.
    #[ts(as = "String")]
    pub user_id: ObjectId,

    /// Lines in insertion order.
    #[serde(default)]
    pub items: Vec<CartItem>,

    /// Set by the store on insert.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Set by the store on insert and on every update.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a cart. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCart {
    pub user_id: ObjectId,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl NewCart {
    pub fn new(user_id: ObjectId, items: Vec<CartItem>) -> Self {
        NewCart { user_id, items }
    }

    /// Checks item quantities before the input is serialized.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_items(&self.items)
    }
}

/// Checks every line's quantity, reporting `items.<i>.quantity`.
pub fn validate_items(items: &[CartItem]) -> ValidationResult<()> {
    for (idx, item) in items.iter().enumerate() {
        validate_quantity(&format!("items.{}.quantity", idx), item.quantity)?;
    }
    Ok(())
}

impl Model for Cart {
    const NAME: &'static str = "Cart";

    fn schema() -> Schema {
        let item = Schema::new()
            .field(FieldDef::new("productId", FieldKind::ObjectId).required())
            .field(
                FieldDef::new("quantity", FieldKind::Number)
                    .required()
                    .min(MIN_ITEM_QUANTITY),
            );

        Schema::new()
            .field(FieldDef::new("userId", FieldKind::ObjectId).required().unique())
            .field(
                FieldDef::new("items", FieldKind::Array(Box::new(item)))
                    .default_value(serde_json::json!([])),
            )
            .with_timestamps()
    }

    fn check_fields(&self) -> ValidationResult<()> {
        validate_items(&self.items)
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
///
/// `name` and `slug` are independently unique; nothing ties one to the
/// other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    #[ts(as = "String")]
    pub id: ObjectId,

    /// Display label.
    pub name: String,

    /// URL identifier.
    pub slug: String,

    /// Image reference or URL. Empty when none was given.
    #[serde(default)]
    pub image: String,
}

/// Input for creating a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        NewCategory {
            name: name.into(),
            slug: slug.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

impl Model for Category {
    const NAME: &'static str = "Category";

    fn schema() -> Schema {
        Schema::new()
            .field(FieldDef::new("name", FieldKind::String).required().unique())
            .field(FieldDef::new("slug", FieldKind::String).required().unique())
            .field(FieldDef::new("image", FieldKind::String).default_value(""))
    }
}
