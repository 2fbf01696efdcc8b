//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Registry / hydration failures                  │
//! │  └── ValidationError  - Schema constraint violations                   │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                 │
//! │  └── DbError          - Store failures, incl. uniqueness               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field path in every validation message
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while turning raw documents into typed models.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A document failed its schema.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A document passed its schema but does not fit the Rust type.
    ///
    /// ## When This Occurs
    /// - Fields present that the schema does not declare, with a type the
    ///   model rejects
    /// - Timestamp strings that are not RFC 3339
    #[error("Cannot build {model} from document: {reason}")]
    Hydration { model: String, reason: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Schema constraint violations.
///
/// Raised at write time, never when a schema is declared. `field` is a
/// dotted path into the document (`items.0.quantity`).
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing, null or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is below the declared minimum.
    #[error("{field} ({value}) is less than minimum allowed value ({min})")]
    BelowMinimum { field: String, value: f64, min: f64 },

    /// Value has the wrong type for the field.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Document is not an object at all.
    #[error("{model} document must be an object")]
    NotADocument { model: String },
}

impl ValidationError {
    /// The dotted field path the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Required { field }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::InvalidFormat { field, .. } => Some(field),
            ValidationError::NotADocument { .. } => None,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
