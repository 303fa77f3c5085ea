//! Product-cosif requests and DTO.

use chrono::{DateTime, Utc};
use ledgerbook_core::filters::{normalize_code, ProductCosifFilter};
use ledgerbook_core::validation::{
    validate_classification_code, validate_cosif_code, validate_product_code, validate_uuid,
    Validate, Validator,
};
use ledgerbook_core::{EntityBase, EntityStatus, ProductCosif, ValidationError};
use serde::{Deserialize, Serialize};

use super::{trimmed, Paging};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductCosifRequest {
    pub product_code: String,
    pub cosif_code: String,
    pub classification_code: String,
}

impl Validate for AddProductCosifRequest {
    fn validate(&self) -> Vec<ValidationError> {
        Validator::new()
            .check(validate_product_code(&self.product_code))
            .check(validate_cosif_code(&self.cosif_code))
            .check(validate_classification_code(&self.classification_code))
            .finish()
    }
}

impl AddProductCosifRequest {
    pub fn into_entity(self, actor: &str) -> ProductCosif {
        ProductCosif {
            base: EntityBase::new(actor),
            product_code: normalize_code(&self.product_code),
            cosif_code: self.cosif_code.trim().to_string(),
            classification_code: normalize_code(&self.classification_code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeProductCosifRequest {
    pub id: String,
    pub product_code: String,
    pub cosif_code: String,
    pub classification_code: String,
    pub status: Option<EntityStatus>,
}

impl Validate for ChangeProductCosifRequest {
    fn validate(&self) -> Vec<ValidationError> {
        Validator::new()
            .check(validate_uuid(&self.id))
            .check(validate_product_code(&self.product_code))
            .check(validate_cosif_code(&self.cosif_code))
            .check(validate_classification_code(&self.classification_code))
            .finish()
    }
}

impl ChangeProductCosifRequest {
    pub fn apply_to(self, cosif: &mut ProductCosif, actor: &str) {
        cosif.product_code = normalize_code(&self.product_code);
        cosif.cosif_code = self.cosif_code.trim().to_string();
        cosif.classification_code = normalize_code(&self.classification_code);
        if let Some(status) = self.status {
            cosif.base.status = status;
        }
        cosif.base.touch(actor);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCosifQuery {
    #[serde(flatten)]
    pub paging: Paging,
    pub product_code: Option<String>,
    pub cosif_code: Option<String>,
    pub classification_code: Option<String>,
    pub status: Option<EntityStatus>,
}

impl ProductCosifQuery {
    pub fn filter(&self) -> ProductCosifFilter {
        ProductCosifFilter {
            product_code: trimmed(&self.product_code).map(|c| normalize_code(&c)),
            cosif_code: trimmed(&self.cosif_code),
            classification_code: trimmed(&self.classification_code).map(|c| normalize_code(&c)),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCosifDto {
    pub id: String,
    pub product_code: String,
    pub cosif_code: String,
    pub classification_code: String,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl From<ProductCosif> for ProductCosifDto {
    fn from(c: ProductCosif) -> Self {
        ProductCosifDto {
            id: c.base.id,
            product_code: c.product_code,
            cosif_code: c.cosif_code,
            classification_code: c.classification_code,
            status: c.base.status,
            created_at: c.base.created_at,
            created_by: c.base.created_by,
            updated_at: c.base.updated_at,
            updated_by: c.base.updated_by,
        }
    }
}
