//! # Specifications
//!
//! Business rules that need the store to decide: "this product must exist",
//! "this email must not be taken by someone else".
//!
//! ## Evaluation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    validate_all(&[a, b, c], candidate)                  │
//! │                                                                         │
//! │   a.is_satisfied_by ──► Ok(true)  ──► b.is_satisfied_by ──► ...         │
//! │          │                                   │                          │
//! │          ├─► Ok(false) ──► Err(a.violation(candidate))                  │
//! │          └─► Err(e)    ──► Err(e)                                       │
//! │                                                                         │
//! │   Sequential, in the given order. The first failure stops the run;      │
//! │   later specifications never touch the repositories.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Styles
//! - **Throwing**: returns `Err(NotFound | AlreadyExists)` itself, carrying the
//!   key and the conflicting record id ([`MustExistById`], [`MustBeUnique`]).
//! - **Boolean**: returns `Ok(false)`; [`validate`] turns that into the
//!   specification's fixed [`Specification::violation`].
//!
//! Candidates can be an entity, a `(product_code, cosif_code)` pair or a
//! bare `str` (id, code, document).

use async_trait::async_trait;
use tracing::warn;

use crate::error::{ErrorKind, ServiceError, ServiceResult};

mod common;
pub mod customer;
pub mod manual_movement;
pub mod product;
pub mod product_cosif;

pub use common::{MustBeUnique, MustExistById};

/// Machine-readable codes raised by the specifications.
pub mod codes {
    pub const CUSTOMER_NOT_FOUND: &str = "CUSTOMER_NOT_FOUND";
    pub const CUSTOMER_EMAIL_ALREADY_EXISTS: &str = "CUSTOMER_EMAIL_ALREADY_EXISTS";
    pub const CUSTOMER_DOCUMENT_ALREADY_EXISTS: &str = "CUSTOMER_DOCUMENT_ALREADY_EXISTS";

    pub const PRODUCT_NOT_FOUND: &str = "PRODUCT_NOT_FOUND";
    pub const PRODUCT_CODE_ALREADY_EXISTS: &str = "PRODUCT_CODE_ALREADY_EXISTS";
    pub const PRODUCT_IN_USE: &str = "PRODUCT_IN_USE";

    pub const PRODUCT_COSIF_NOT_FOUND: &str = "PRODUCT_COSIF_NOT_FOUND";
    pub const PRODUCT_COSIF_ALREADY_EXISTS: &str = "PRODUCT_COSIF_ALREADY_EXISTS";
    pub const PRODUCT_COSIF_IN_USE: &str = "PRODUCT_COSIF_IN_USE";

    pub const MANUAL_MOVEMENT_NOT_FOUND: &str = "MANUAL_MOVEMENT_NOT_FOUND";
    pub const MANUAL_MOVEMENT_ALREADY_EXISTS: &str = "MANUAL_MOVEMENT_ALREADY_EXISTS";
}

/// A business rule evaluated against a candidate.
#[async_trait]
pub trait Specification<C: ?Sized + Sync>: Send + Sync {
    /// `Ok(true)` when the rule holds.
    async fn is_satisfied_by(&self, candidate: &C) -> ServiceResult<bool>;

    /// The error reported when `is_satisfied_by` answers `false`.
    fn violation(&self, candidate: &C) -> ServiceError;
}

/// Runs one specification, normalizing `false` into its violation.
pub async fn validate<C, S>(spec: &S, candidate: &C) -> ServiceResult<()>
where
    C: ?Sized + Sync,
    S: Specification<C> + ?Sized,
{
    let outcome = match spec.is_satisfied_by(candidate).await {
        Ok(true) => return Ok(()),
        Ok(false) => spec.violation(candidate),
        Err(err) => err,
    };

    if is_rule_violation(&outcome) {
        warn!(code = outcome.code(), "Specification violated: {}", outcome);
    }
    Err(outcome)
}

/// Kinds that mean a rule rejected the candidate.
fn is_rule_violation(err: &ServiceError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::NotFound | ErrorKind::AlreadyExists | ErrorKind::Conflict
    )
}

/// Runs every specification in order, stopping at the first failure.
pub async fn validate_all<C>(specs: &[&dyn Specification<C>], candidate: &C) -> ServiceResult<()>
where
    C: ?Sized + Sync,
{
    for spec in specs {
        validate(*spec, candidate).await?;
    }
    Ok(())
}
