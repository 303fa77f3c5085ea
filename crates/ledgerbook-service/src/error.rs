//! # Service Error Type
//!
//! One error type for every handler, so callers get a single
//! `Result<_, ServiceError>` instead of two reporting styles.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ledgerbook                             │
//! │                                                                         │
//! │  Request ──► Validate ──► Specifications ──► Write repository          │
//! │                 │               │                    │                  │
//! │                 ▼               ▼                    ▼                  │
//! │        ValidationFailed   NotFound            Ok(false)                │
//! │        (field list)       AlreadyExists       → PersistenceFailed     │
//! │                           Conflict            DbError                  │
//! │                                               → From<DbError>         │
//! │                 │               │                    │                  │
//! │                 └───────────────┴────────────────────┘                  │
//! │                                 ▼                                       │
//! │                     Err(ServiceError)                                   │
//! │                     code()         "CUSTOMER_EMAIL_ALREADY_EXISTS"     │
//! │                     kind()         ErrorKind::AlreadyExists            │
//! │                     status_code()  409                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! The transport layer renders [`ErrorBody`]:
//! ```json
//! {
//!   "code": "CUSTOMER_EMAIL_ALREADY_EXISTS",
//!   "message": "Customer with email 'a@x.com' already exists",
//!   "errors": []
//! }
//! ```

use ledgerbook_core::{CoreError, ValidationError};
use ledgerbook_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Conceptual error category, independent of the specific code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    /// A rule other than uniqueness rejected the change (record still in use).
    Conflict,
    ValidationFailed,
    PersistenceFailed,
    Unexpected,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Referenced entity does not exist (by id or natural key).
    #[error("{entity} not found: {key}")]
    NotFound {
        code: &'static str,
        entity: String,
        key: String,
    },

    /// Uniqueness violation.
    #[error("{entity} with {field} '{value}' already exists")]
    AlreadyExists {
        code: &'static str,
        entity: String,
        field: String,
        value: String,
        /// Id of the record holding the value, when known.
        existing_id: Option<String>,
    },

    /// The operation would break a reference (e.g. removing a product that
    /// classifications still use).
    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    /// Structural validation failed. Never reaches the repositories.
    #[error("Validation failed: {}", join_messages(.0))]
    ValidationFailed(Vec<ValidationError>),

    /// Sort field outside the entity's allow-list.
    #[error("Unknown sort field '{field}' for {entity}; allowed: {}", .allowed.join(", "))]
    InvalidSortField {
        entity: String,
        field: String,
        allowed: Vec<&'static str>,
    },

    /// The write repository reported that nothing was written.
    #[error("{0}")]
    PersistenceFailed(String),

    /// Anything else. The detail is logged, never displayed.
    #[error("An unexpected error occurred")]
    Unexpected(String),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ServiceError {
    pub fn not_found(code: &'static str, entity: impl Into<String>, key: impl Into<String>) -> Self {
        ServiceError::NotFound {
            code,
            entity: entity.into(),
            key: key.into(),
        }
    }

    pub fn already_exists(
        code: &'static str,
        entity: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        existing_id: Option<String>,
    ) -> Self {
        ServiceError::AlreadyExists {
            code,
            entity: entity.into(),
            field: field.into(),
            value: value.into(),
            existing_id,
        }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Conflict {
            code,
            message: message.into(),
        }
    }

    /// Machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound { code, .. }
            | ServiceError::AlreadyExists { code, .. }
            | ServiceError::Conflict { code, .. } => code,
            ServiceError::ValidationFailed(_) => "VALIDATION_FAILED",
            ServiceError::InvalidSortField { .. } => "INVALID_SORT_FIELD",
            ServiceError::PersistenceFailed(_) => "PERSISTENCE_FAILED",
            ServiceError::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::NotFound { .. } => ErrorKind::NotFound,
            ServiceError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            ServiceError::Conflict { .. } => ErrorKind::Conflict,
            ServiceError::ValidationFailed(_) | ServiceError::InvalidSortField { .. } => {
                ErrorKind::ValidationFailed
            }
            ServiceError::PersistenceFailed(_) => ErrorKind::PersistenceFailed,
            ServiceError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// HTTP-equivalent status.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::AlreadyExists | ErrorKind::Conflict => 409,
            ErrorKind::ValidationFailed => 400,
            ErrorKind::PersistenceFailed | ErrorKind::Unexpected => 500,
        }
    }

    /// Serializable body for the transport layer.
    pub fn to_body(&self) -> ErrorBody {
        let errors = match self {
            ServiceError::ValidationFailed(errors) => {
                errors.iter().map(ToString::to_string).collect()
            }
            _ => Vec::new(),
        };

        ErrorBody {
            code: self.code(),
            message: self.to_string(),
            errors,
        }
    }
}

/// What the transport layer sends back on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    /// Field-level messages (validation failures only).
    pub errors: Vec<String>,
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownSortField {
                entity,
                field,
                allowed,
            } => ServiceError::InvalidSortField {
                entity: entity.to_string(),
                field,
                allowed,
            },
            CoreError::Validation(e) => ServiceError::ValidationFailed(vec![e]),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::ValidationFailed(vec![err])
    }
}

/// Converts database errors that a handler did not translate itself.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::not_found("NOT_FOUND", entity, id),
            DbError::UniqueViolation { field, value } => {
                ServiceError::already_exists("ALREADY_EXISTS", "Record", field, value, None)
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ServiceError::conflict("REFERENCE_VIOLATION", "Invalid or in-use reference")
            }
            DbError::Query(core) => ServiceError::from(core),
            other => {
                // Log the actual error but return a generic message
                tracing::error!("Database operation failed: {}", other);
                ServiceError::Unexpected(other.to_string())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
