//! Product-cosif rules. Candidates are `(product_code, cosif_code)` pairs.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerbook_core::filters::{ManualMovementFilter, ProductCosifFilter};
use ledgerbook_core::{ManualMovement, ProductCosif};
use ledgerbook_db::ReadRepository;

use super::codes::{PRODUCT_COSIF_ALREADY_EXISTS, PRODUCT_COSIF_IN_USE, PRODUCT_COSIF_NOT_FOUND};
use super::{MustExistById, Specification};
use crate::error::{ServiceError, ServiceResult};

/// `(product_code, cosif_code)`
pub type CosifKey = (String, String);

fn display_key((product_code, cosif_code): &CosifKey) -> String {
    format!("{product_code}/{cosif_code}")
}

/// The error for a pair that is already registered.
pub fn duplicate_key(key: &CosifKey) -> ServiceError {
    ServiceError::already_exists(
        PRODUCT_COSIF_ALREADY_EXISTS,
        "ProductCosif",
        "productCode/cosifCode",
        display_key(key),
        None,
    )
}

pub fn must_exist(product_cosifs: Arc<dyn ReadRepository<ProductCosif>>) -> MustExistById<ProductCosif> {
    MustExistById::new(product_cosifs, PRODUCT_COSIF_NOT_FOUND)
}

/// The pair must be registered. Boolean style.
pub struct ProductCosifMustExist {
    product_cosifs: Arc<dyn ReadRepository<ProductCosif>>,
}

impl ProductCosifMustExist {
    pub fn new(product_cosifs: Arc<dyn ReadRepository<ProductCosif>>) -> Self {
        ProductCosifMustExist { product_cosifs }
    }
}

#[async_trait]
impl Specification<CosifKey> for ProductCosifMustExist {
    async fn is_satisfied_by(&self, key: &CosifKey) -> ServiceResult<bool> {
        let (product_code, cosif_code) = key;
        let found = self
            .product_cosifs
            .count(&ProductCosifFilter::by_key(product_code, cosif_code))
            .await?;
        Ok(found > 0)
    }

    fn violation(&self, key: &CosifKey) -> ServiceError {
        ServiceError::not_found(PRODUCT_COSIF_NOT_FOUND, "ProductCosif", display_key(key))
    }
}

/// No other record may hold the pair. Boolean style.
pub struct ProductCosifMustBeUnique {
    product_cosifs: Arc<dyn ReadRepository<ProductCosif>>,
    excluding: Option<String>,
}

impl ProductCosifMustBeUnique {
    pub fn new(product_cosifs: Arc<dyn ReadRepository<ProductCosif>>) -> Self {
        ProductCosifMustBeUnique {
            product_cosifs,
            excluding: None,
        }
    }

    /// Ignores the record with this id.
    pub fn excluding(mut self, id: impl Into<String>) -> Self {
        self.excluding = Some(id.into());
        self
    }
}

#[async_trait]
impl Specification<CosifKey> for ProductCosifMustBeUnique {
    async fn is_satisfied_by(&self, key: &CosifKey) -> ServiceResult<bool> {
        let (product_code, cosif_code) = key;
        let holders = self
            .product_cosifs
            .find(&ProductCosifFilter::by_key(product_code, cosif_code))
            .await?;

        Ok(holders
            .iter()
            .all(|holder| Some(holder.base.id.as_str()) == self.excluding.as_deref()))
    }

    fn violation(&self, key: &CosifKey) -> ServiceError {
        duplicate_key(key)
    }
}

/// No movement may post against the candidate. Boolean style.
pub struct ProductCosifMustNotBeInUse {
    manual_movements: Arc<dyn ReadRepository<ManualMovement>>,
}

impl ProductCosifMustNotBeInUse {
    pub fn new(manual_movements: Arc<dyn ReadRepository<ManualMovement>>) -> Self {
        ProductCosifMustNotBeInUse { manual_movements }
    }
}

#[async_trait]
impl Specification<ProductCosif> for ProductCosifMustNotBeInUse {
    async fn is_satisfied_by(&self, cosif: &ProductCosif) -> ServiceResult<bool> {
        let references = self
            .manual_movements
            .count(&ManualMovementFilter::by_cosif(&cosif.product_code, &cosif.cosif_code))
            .await?;
        Ok(references == 0)
    }

    fn violation(&self, cosif: &ProductCosif) -> ServiceError {
        ServiceError::conflict(
            PRODUCT_COSIF_IN_USE,
            format!(
                "Product cosif {} is referenced by manual movements",
                display_key(&cosif.key())
            ),
        )
    }
}
