//! # storefront-core: Document Models for the Storefront
//!
//! Typed document models, their declarative schemas, the model registry and
//! the client error-handler component. Nothing in this crate performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Front End                                │   │
//! │  │    pages mount ClientErrorHandler · consume TS bindings         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ storefront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  schema   │  │ registry  │  │ lifecycle │  │   │
//! │  │   │   Cart    │  │ FieldDef  │  │ get_or_   │  │ ViewHost  │  │   │
//! │  │   │ Category  │  │ validate  │  │ register  │  │ ErrorHdlr │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-db (Document Store)                  │   │
//! │  │        SQLite, UNIQUE indexes, write-time validation            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart, CartItem, Category and their construction inputs
//! - [`schema`] - Field declarations and the document validator
//! - [`registry`] - Idempotent model registration
//! - [`lifecycle`] - View lifecycle and the call-once error handler
//! - [`validation`] - Field predicates used by the schemas
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use storefront_core::{Cart, ModelRegistry, ObjectId};
//!
//! let registry = Arc::new(ModelRegistry::new());
//! let carts = registry.register::<Cart>();
//!
//! let doc = serde_json::json!({
//!     "userId": ObjectId::new(),
//!     "items": [{ "productId": ObjectId::new(), "quantity": 0.05 }],
//!     "createdAt": "2024-01-01T00:00:00Z",
//!     "updatedAt": "2024-01-01T00:00:00Z",
//! });
//!
//! // Quantity below the 0.1 minimum is rejected.
//! assert!(carts.validate(&doc).is_err());
//! ```

pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod schema;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use lifecycle::{ClientErrorHandler, ErrorHandlerInit, Lifecycle, ViewHost};
pub use registry::{Model, ModelRegistry, RegisteredModel};
pub use schema::{FieldDef, FieldKind, Schema};
pub use types::*;

/// Smallest quantity a cart line may hold.
///
/// Fractional quantities are allowed (weighed goods), so the floor is 0.1
/// rather than 1.
pub const MIN_ITEM_QUANTITY: f64 = 0.1;
