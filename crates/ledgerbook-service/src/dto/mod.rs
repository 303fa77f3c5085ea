//! # Requests and DTOs
//!
//! Wire shapes for every operation, their structural validation and the
//! mapping to and from entities.
//!
//! ## Mapping
//! ```text
//! AddXRequest ──validate()──► into_entity(actor) ──► X ──► XDto::from
//! ChangeXRequest ─validate()─► apply_to(&mut X, actor)
//! XQuery ──validate()──► filter() + paging.page_request(limits)
//! ```
//!
//! Values are normalized on the way in: codes upper-case, emails
//! lower-case, every string trimmed.

use ledgerbook_core::validation::{validate_page_size, validate_uuid, Validate, Validator};
use ledgerbook_core::{PageRequest, SortOrder, ValidationError};
use serde::Deserialize;

use crate::config::PagingLimits;
use crate::error::{ServiceError, ServiceResult};

pub mod customer;
pub mod manual_movement;
pub mod product;
pub mod product_cosif;

/// Paging and ordering part of every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// 1-based; defaults to 1.
    pub page: Option<u32>,

    /// Defaults to [`PagingLimits::default_page_size`].
    pub page_size: Option<u32>,

    /// Sort field; defaults per entity.
    pub field_name: Option<String>,

    /// `"desc"` (any case) for descending, anything else ascending.
    pub order: Option<String>,
}

impl Paging {
    pub fn new(page: u32, page_size: u32) -> Self {
        Paging {
            page: Some(page),
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    pub fn sorted_by(mut self, field_name: &str, order: &str) -> Self {
        self.field_name = Some(field_name.to_string());
        self.order = Some(order.to_string());
        self
    }

    /// Validates the window and builds the repository request.
    pub fn page_request(&self, limits: &PagingLimits) -> ServiceResult<PageRequest> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(limits.default_page_size);

        let errors = Validator::new()
            .check(validate_page(page))
            .check(validate_page_size(page_size, limits.max_page_size))
            .finish();
        if !errors.is_empty() {
            return Err(ServiceError::ValidationFailed(errors));
        }

        Ok(PageRequest::new(page, page_size)?
            .sort_by(self.field_name.clone())
            .order(SortOrder::parse(self.order.as_deref())))
    }
}

fn validate_page(page: u32) -> Result<(), ValidationError> {
    if page < 1 {
        return Err(ValidationError::MustBePositive {
            field: "page".to_string(),
        });
    }
    Ok(())
}

/// Removes the entity with this id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    pub id: String,
}

impl RemoveRequest {
    pub fn new(id: impl Into<String>) -> Self {
        RemoveRequest { id: id.into() }
    }
}

impl Validate for RemoveRequest {
    fn validate(&self) -> Vec<ValidationError> {
        Validator::new().check(validate_uuid(&self.id)).finish()
    }
}

/// Runs the request's structural validation.
pub fn ensure_valid(request: &impl Validate) -> ServiceResult<()> {
    let errors = request.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationFailed(errors))
    }
}

/// Trimmed copy; `None` for blank input.
pub(crate) fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
