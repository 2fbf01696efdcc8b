//! # Validation Module
//!
//! Field predicates attached to schema fields.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Schema (this crate)                                          │
//! │  ├── required / type / minimum                                         │
//! │  └── checked at write time by the repositories                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store (SQLite)                                               │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE indexes (userId, name, slug)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_quantity, validate_required};
//!
//! assert!(validate_quantity("quantity", 2.0).is_ok());
//! assert!(validate_quantity("quantity", 0.05).is_err());
//! assert!(validate_required("name", "").is_err());
//! ```

use crate::error::ValidationError;
use crate::MIN_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates that a string field holds a value.
///
/// Whitespace-only values count as present; only the empty string is
/// rejected.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a number against an inclusive minimum.
///
/// NaN never satisfies a minimum.
pub fn validate_min(field: &str, value: f64, min: f64) -> ValidationResult<()> {
    if !(value >= min) {
        return Err(ValidationError::BelowMinimum {
            field: field.to_string(),
            value,
            min,
        });
    }

    Ok(())
}

/// Validates a cart item quantity.
///
/// ## Rules
/// - Fractional quantities are allowed (0.5 kg)
/// - Must be at least [`MIN_ITEM_QUANTITY`], so zero, negatives and NaN fail
/// - Must be finite
pub fn validate_quantity(field: &str, qty: f64) -> ValidationResult<()> {
    validate_min(field, qty, MIN_ITEM_QUANTITY)?;

    if qty.is_infinite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    Ok(())
}
