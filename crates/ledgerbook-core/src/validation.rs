//! # Validation Module
//!
//! Structural (field-level) validation for ledgerbook requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE - structural checks                              │
//! │  ├── Required, length, range, format                                   │
//! │  └── Failures are RETURNED as a list, never raised                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Specifications (ledgerbook-service)                          │
//! │  ├── Must exist / must be unique against the store                     │
//! │  └── First violation stops the command                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE indexes                                                    │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ledgerbook_core::validation::{validate_product_code, Validator};
//!
//! assert!(validate_product_code("AB12").is_ok());
//!
//! let errors = Validator::new()
//!     .check(validate_product_code("toolong"))
//!     .finish();
//! assert_eq!(errors.len(), 1);
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Requests that can check their own shape.
pub trait Validate {
    /// Every field-level failure, empty when the request is well formed.
    fn validate(&self) -> Vec<ValidationError>;
}

/// Collects failures from several checks.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationError>,
}

impl Validator {
    pub fn new() -> Self {
        Validator::default()
    }

    /// Records the error, if any.
    pub fn check<T>(mut self, result: ValidationResult<T>) -> Self {
        if let Err(e) = result {
            self.errors.push(e);
        }
        self
    }

    /// Runs `f` only when the value is present.
    pub fn check_optional<T, U>(
        self,
        value: Option<T>,
        f: impl FnOnce(T) -> ValidationResult<U>,
    ) -> Self {
        match value {
            Some(v) => self.check(f(v)),
            None => self,
        }
    }

    pub fn finish(self) -> Vec<ValidationError> {
        self.errors
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field with a maximum length.
///
/// ## Example
/// ```rust
/// use ledgerbook_core::validation::validate_text;
///
/// assert!(validate_text("name", "Maria", 100).is_ok());
/// assert!(validate_text("name", "  ", 100).is_err());
/// ```
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

fn validate_digits(field: &str, value: &str, len: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.len() != len {
        return Err(ValidationError::WrongLength {
            field: field.to_string(),
            len,
        });
    }

    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(field, "must contain only digits"));
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Required, at most 150 characters
/// - Exactly one `@`, non-empty local part, domain containing a dot
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_text("email", email, 150)?;

    let email = email.trim();
    let mut parts = email.split('@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    let well_formed = parts.next().is_none()
        && !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);

    if !well_formed {
        return Err(ValidationError::invalid_format("email", "must be a valid email address"));
    }

    Ok(())
}

/// Validates a customer document number.
///
/// ## Rules
/// - Digits only
/// - 11 digits (individual) or 14 digits (company)
pub fn validate_document_number(document: &str) -> ValidationResult<()> {
    let document = document.trim();

    if document.is_empty() {
        return Err(ValidationError::required("documentNumber"));
    }

    if !document.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(
            "documentNumber",
            "must contain only digits",
        ));
    }

    if document.len() != 11 && document.len() != 14 {
        return Err(ValidationError::invalid_format(
            "documentNumber",
            "must have 11 or 14 digits",
        ));
    }

    Ok(())
}

/// Validates a phone number (optional field; call only when present).
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let digits = phone.trim();
    if !(10..=11).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format("phone", "must have 10 or 11 digits"));
    }
    Ok(())
}

/// Validates a product code.
///
/// ## Rules
/// - Exactly 4 characters
/// - Letters and digits only
///
/// ## Example
/// ```rust
/// use ledgerbook_core::validation::validate_product_code;
///
/// assert!(validate_product_code("ZZZZ").is_ok());
/// assert!(validate_product_code("ZZ-Z").is_err());
/// assert!(validate_product_code("").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::required("productCode"));
    }

    if code.chars().count() != 4 {
        return Err(ValidationError::WrongLength {
            field: "productCode".to_string(),
            len: 4,
        });
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::invalid_format(
            "productCode",
            "must contain only letters and digits",
        ));
    }

    Ok(())
}

/// Validates a COSIF account code (11 digits).
pub fn validate_cosif_code(code: &str) -> ValidationResult<()> {
    validate_digits("cosifCode", code, 11)
}

/// Validates a classification code (1 to 6 characters).
pub fn validate_classification_code(code: &str) -> ValidationResult<()> {
    validate_text("classificationCode", code, 6)
}

/// Validates a two-letter state code.
pub fn validate_state(state: &str) -> ValidationResult<()> {
    let state = state.trim();
    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::invalid_format("state", "must be a two-letter code"));
    }
    Ok(())
}

/// Validates a zip code (8 digits, no separator).
pub fn validate_zip_code(zip: &str) -> ValidationResult<()> {
    validate_digits("zipCode", zip, 8)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a month (1..=12).
pub fn validate_month(month: u32) -> ValidationResult<()> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        });
    }
    Ok(())
}

/// Validates a posting year (2000..=2100).
pub fn validate_year(year: u32) -> ValidationResult<()> {
    if !(2000..=2100).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field: "year".to_string(),
            min: 2000,
            max: 2100,
        });
    }
    Ok(())
}

/// Validates a movement value in cents.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_value_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "value".to_string(),
        });
    }
    Ok(())
}

/// Validates a page size against an upper bound.
pub fn validate_page_size(page_size: u32, max: u32) -> ValidationResult<()> {
    if page_size < 1 || page_size > max {
        return Err(ValidationError::OutOfRange {
            field: "pageSize".to_string(),
            min: 1,
            max: i64::from(max),
        });
    }
    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use ledgerbook_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id.trim())
        .map_err(|_| ValidationError::invalid_format("id", "must be a valid UUID"))?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
