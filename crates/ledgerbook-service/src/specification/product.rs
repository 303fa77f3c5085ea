//! Product rules.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerbook_core::filters::{normalize_code, ProductCosifFilter, ProductFilter};
use ledgerbook_core::{Product, ProductCosif};
use ledgerbook_db::ReadRepository;

use super::codes::{PRODUCT_CODE_ALREADY_EXISTS, PRODUCT_IN_USE, PRODUCT_NOT_FOUND};
use super::{MustBeUnique, MustExistById, Specification};
use crate::error::{ServiceError, ServiceResult};

pub fn must_exist(products: Arc<dyn ReadRepository<Product>>) -> MustExistById<Product> {
    MustExistById::new(products, PRODUCT_NOT_FOUND)
}

pub fn code_must_be_unique(products: Arc<dyn ReadRepository<Product>>) -> MustBeUnique<Product> {
    MustBeUnique::new(
        products,
        PRODUCT_CODE_ALREADY_EXISTS,
        "productCode",
        |p| ProductFilter::by_code(&p.product_code),
        |p| p.product_code.clone(),
    )
}

/// A product with the candidate code must exist. Boolean style.
pub struct ProductMustExist {
    products: Arc<dyn ReadRepository<Product>>,
}

impl ProductMustExist {
    pub fn new(products: Arc<dyn ReadRepository<Product>>) -> Self {
        ProductMustExist { products }
    }
}

#[async_trait]
impl Specification<str> for ProductMustExist {
    async fn is_satisfied_by(&self, product_code: &str) -> ServiceResult<bool> {
        let found = self.products.count(&ProductFilter::by_code(product_code)).await?;
        Ok(found > 0)
    }

    fn violation(&self, product_code: &str) -> ServiceError {
        ServiceError::not_found(PRODUCT_NOT_FOUND, "Product", normalize_code(product_code))
    }
}

/// No classification may reference the candidate product. Boolean style.
pub struct ProductMustNotBeInUse {
    product_cosifs: Arc<dyn ReadRepository<ProductCosif>>,
}

impl ProductMustNotBeInUse {
    pub fn new(product_cosifs: Arc<dyn ReadRepository<ProductCosif>>) -> Self {
        ProductMustNotBeInUse { product_cosifs }
    }
}

#[async_trait]
impl Specification<Product> for ProductMustNotBeInUse {
    async fn is_satisfied_by(&self, product: &Product) -> ServiceResult<bool> {
        let references = self
            .product_cosifs
            .count(&ProductCosifFilter::by_product(&product.product_code))
            .await?;
        Ok(references == 0)
    }

    fn violation(&self, product: &Product) -> ServiceError {
        ServiceError::conflict(
            PRODUCT_IN_USE,
            format!(
                "Product {} is referenced by product cosif records",
                product.product_code
            ),
        )
    }
}
