//! # storefront-db: Document Store for the Storefront
//!
//! Persists Cart and Category documents in SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Data Flow                               │
//! │                                                                         │
//! │  API / service code (not in this workspace)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   storefront-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │ SqlitePool    │◄───│ CartRepo       │    │ 001_initial  │  │   │
//! │  │   │ ModelRegistry │    │ CategoryRepo   │    │ _schema.sql  │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (carts, categories + UNIQUE indexes)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, configuration and model registration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Cart and Category repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storefront_core::{CartItem, ModelRegistry, NewCart};
//! use storefront_db::{Database, DbConfig};
//!
//! let registry = Arc::new(ModelRegistry::new());
//! let db = Database::new(DbConfig::from_env(), registry).await?;
//!
//! let cart = db
//!     .carts()
//!     .create(&NewCart::new(user_id, vec![CartItem::new(product_id, 2.0)]))
//!     .await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::cart::CartRepository;
pub use repository::category::CategoryRepository;
