//! # Error Types
//!
//! Domain-specific error types for ledgerbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ledgerbook-core errors (this file)                                    │
//! │  ├── CoreError        - Query/paging configuration errors              │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  ledgerbook-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  ledgerbook-service errors                                             │
//! │  └── ServiceError     - What the transport boundary sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ServiceError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, value, allowed names)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core errors raised while preparing a query.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested sort field is not in the entity's registry.
    ///
    /// ## When This Occurs
    /// - Caller passes a `field_name` the entity does not expose
    /// - Typos such as `"prodcut_code"`
    ///
    /// Never silently ignored: ordering by an unknown column is a caller bug.
    #[error("Cannot sort {entity} by '{field}'; allowed fields: {allowed:?}")]
    UnknownSortField {
        entity: &'static str,
        field: String,
        allowed: Vec<&'static str>,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request fields don't meet structural requirements.
/// They are collected before any business rule runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field value must have an exact length.
    #[error("{field} must be exactly {len} characters")]
    WrongLength { field: String, len: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::InvalidFormat`].
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
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
