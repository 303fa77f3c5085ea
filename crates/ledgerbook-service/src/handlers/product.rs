//! Product commands and queries.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerbook_core::validation::validate_uuid;
use ledgerbook_core::{Product, ProductCosif};
use ledgerbook_db::{DbError, ReadRepository, WriteRepository};
use tracing::info;

use super::{ensure_written, load, CommandHandler, Repositories};
use crate::config::ServiceConfig;
use crate::dto::product::{AddProductRequest, ChangeProductRequest, ProductDto, ProductQuery};
use crate::dto::{ensure_valid, RemoveRequest};
use crate::error::{ServiceError, ServiceResult};
use crate::response::{CommandResponse, PagedResult, QueryResponse};
use crate::specification::codes::{PRODUCT_CODE_ALREADY_EXISTS, PRODUCT_NOT_FOUND};
use crate::specification::product::{code_must_be_unique, must_exist, ProductMustNotBeInUse};
use crate::specification::validate;

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ReadRepository<Product>>,
    writer: Arc<dyn WriteRepository<Product>>,
    product_cosifs: Arc<dyn ReadRepository<ProductCosif>>,
    config: Arc<ServiceConfig>,
}

impl ProductService {
    pub fn new(repositories: &Repositories, config: Arc<ServiceConfig>) -> Self {
        ProductService {
            products: repositories.products.clone(),
            writer: repositories.product_writer.clone(),
            product_cosifs: repositories.product_cosifs.clone(),
            config,
        }
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<QueryResponse<ProductDto>> {
        validate_uuid(id)?;
        let product = load(self.products.as_ref(), PRODUCT_NOT_FOUND, id).await?;
        Ok(QueryResponse::ok(product.into()))
    }

    pub async fn find(
        &self,
        query: ProductQuery,
    ) -> ServiceResult<QueryResponse<PagedResult<ProductDto>>> {
        let request = query.paging.page_request(&self.config.paging)?;
        let page = self
            .products
            .find_with_pagination(&query.filter(), &request)
            .await?;
        Ok(QueryResponse::page(PagedResult::from_page(page, &request)))
    }

    fn write_error(err: DbError, product: &Product) -> ServiceError {
        if err.is_unique_violation_on("product_code") {
            return ServiceError::already_exists(
                PRODUCT_CODE_ALREADY_EXISTS,
                "Product",
                "productCode",
                &product.product_code,
                None,
            );
        }
        err.into()
    }
}

#[async_trait]
impl CommandHandler<AddProductRequest> for ProductService {
    type Output = ProductDto;

    async fn handle(&self, request: AddProductRequest) -> ServiceResult<CommandResponse<ProductDto>> {
        ensure_valid(&request)?;
        let product = request.into_entity(&self.config.actor);

        validate(&code_must_be_unique(self.products.clone()), &product).await?;

        let written = self
            .writer
            .add(&product)
            .await
            .map_err(|e| Self::write_error(e, &product))?;
        ensure_written(written, "Failed to add product")?;

        info!(id = %product.base.id, code = %product.product_code, "Product added");
        Ok(CommandResponse::created(product.into(), "Product added"))
    }
}

#[async_trait]
impl CommandHandler<ChangeProductRequest> for ProductService {
    type Output = ProductDto;

    async fn handle(
        &self,
        request: ChangeProductRequest,
    ) -> ServiceResult<CommandResponse<ProductDto>> {
        ensure_valid(&request)?;
        validate(&must_exist(self.products.clone()), request.id.as_str()).await?;

        let mut product = load(self.products.as_ref(), PRODUCT_NOT_FOUND, &request.id).await?;
        request.apply_to(&mut product, &self.config.actor);

        let unique = code_must_be_unique(self.products.clone()).excluding(&product.base.id);
        validate(&unique, &product).await?;

        let written = self
            .writer
            .update(&product)
            .await
            .map_err(|e| Self::write_error(e, &product))?;
        ensure_written(written, "Failed to update product")?;

        info!(id = %product.base.id, "Product updated");
        Ok(CommandResponse::ok(product.into(), "Product updated"))
    }
}

#[async_trait]
impl CommandHandler<RemoveRequest> for ProductService {
    type Output = String;

    async fn handle(&self, request: RemoveRequest) -> ServiceResult<CommandResponse<String>> {
        ensure_valid(&request)?;
        validate(&must_exist(self.products.clone()), request.id.as_str()).await?;

        let product = load(self.products.as_ref(), PRODUCT_NOT_FOUND, &request.id).await?;
        validate(&ProductMustNotBeInUse::new(self.product_cosifs.clone()), &product).await?;

        let removed = self.writer.delete(&request.id).await?;
        ensure_written(removed, "Failed to remove product")?;

        info!(id = %request.id, "Product removed");
        Ok(CommandResponse::ok(request.id, "Product removed"))
    }
}
