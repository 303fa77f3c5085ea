//! Product requests and DTO.

use chrono::{DateTime, Utc};
use ledgerbook_core::filters::{normalize_code, ProductFilter};
use ledgerbook_core::validation::{validate_product_code, validate_text, validate_uuid, Validate, Validator};
use ledgerbook_core::{EntityBase, EntityStatus, Product, ValidationError};
use serde::{Deserialize, Serialize};

use super::{trimmed, Paging};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    pub product_code: String,
    pub description: String,
}

impl Validate for AddProductRequest {
    fn validate(&self) -> Vec<ValidationError> {
        Validator::new()
            .check(validate_product_code(&self.product_code))
            .check(validate_text("description", &self.description, 200))
            .finish()
    }
}

impl AddProductRequest {
    pub fn into_entity(self, actor: &str) -> Product {
        Product {
            base: EntityBase::new(actor),
            product_code: normalize_code(&self.product_code),
            description: self.description.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeProductRequest {
    pub id: String,
    pub product_code: String,
    pub description: String,
    /// Unchanged when absent.
    pub status: Option<EntityStatus>,
}

impl Validate for ChangeProductRequest {
    fn validate(&self) -> Vec<ValidationError> {
        Validator::new()
            .check(validate_uuid(&self.id))
            .check(validate_product_code(&self.product_code))
            .check(validate_text("description", &self.description, 200))
            .finish()
    }
}

impl ChangeProductRequest {
    pub fn apply_to(self, product: &mut Product, actor: &str) {
        product.product_code = normalize_code(&self.product_code);
        product.description = self.description.trim().to_string();
        if let Some(status) = self.status {
            product.base.status = status;
        }
        product.base.touch(actor);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(flatten)]
    pub paging: Paging,
    pub product_code: Option<String>,
    pub description: Option<String>,
    pub status: Option<EntityStatus>,
}

impl ProductQuery {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            product_code: trimmed(&self.product_code).map(|c| normalize_code(&c)),
            description: trimmed(&self.description),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub product_code: String,
    pub description: String,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            id: p.base.id,
            product_code: p.product_code,
            description: p.description,
            status: p.base.status,
            created_at: p.base.created_at,
            created_by: p.base.created_by,
            updated_at: p.base.updated_at,
            updated_by: p.base.updated_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_request_normalizes_code() {
        let request = AddProductRequest {
            product_code: " ab12 ".to_string(),
            description: "Cash ".to_string(),
        };
        assert!(request.validate().is_empty());

        let product = request.into_entity("tester");
        assert_eq!(product.product_code, "AB12");
        assert_eq!(product.description, "Cash");
        assert_eq!(product.base.status, EntityStatus::Active);
        assert_eq!(product.base.created_by, "tester");
    }

    #[test]
    fn test_add_request_collects_every_failure() {
        let request = AddProductRequest {
            product_code: "toolong".to_string(),
            description: String::new(),
        };
        assert_eq!(request.validate().len(), 2);
    }

    #[test]
    fn test_change_keeps_status_when_absent() {
        let mut product = AddProductRequest {
            product_code: "AB12".to_string(),
            description: "Cash".to_string(),
        }
        .into_entity("seed");
        product.base.status = EntityStatus::Inactive;

        ChangeProductRequest {
            id: product.base.id.clone(),
            product_code: "cd34".to_string(),
            description: "Bank".to_string(),
            status: None,
        }
        .apply_to(&mut product, "editor");

        assert_eq!(product.product_code, "CD34");
        assert_eq!(product.base.status, EntityStatus::Inactive);
        assert_eq!(product.base.updated_by.as_deref(), Some("editor"));
    }

    #[test]
    fn test_query_filter_drops_blank_clauses() {
        let query = ProductQuery {
            product_code: Some("  ".to_string()),
            description: Some("Cash".to_string()),
            ..Default::default()
        };
        let filter = query.filter();
        assert!(filter.product_code.is_none());
        assert_eq!(filter.description.as_deref(), Some("Cash"));
    }
}
