//! Product-cosif commands and queries.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerbook_core::validation::validate_uuid;
use ledgerbook_core::{ManualMovement, Product, ProductCosif};
use ledgerbook_db::{DbError, ReadRepository, WriteRepository};
use tracing::info;

use super::{ensure_written, load, CommandHandler, Repositories};
use crate::config::ServiceConfig;
use crate::dto::product_cosif::{
    AddProductCosifRequest, ChangeProductCosifRequest, ProductCosifDto, ProductCosifQuery,
};
use crate::dto::{ensure_valid, RemoveRequest};
use crate::error::{ServiceError, ServiceResult};
use crate::response::{CommandResponse, PagedResult, QueryResponse};
use crate::specification::codes::PRODUCT_COSIF_NOT_FOUND;
use crate::specification::product::ProductMustExist;
use crate::specification::product_cosif::{
    duplicate_key, must_exist, ProductCosifMustBeUnique, ProductCosifMustNotBeInUse,
};
use crate::specification::validate;

#[derive(Clone)]
pub struct ProductCosifService {
    product_cosifs: Arc<dyn ReadRepository<ProductCosif>>,
    writer: Arc<dyn WriteRepository<ProductCosif>>,
    products: Arc<dyn ReadRepository<Product>>,
    manual_movements: Arc<dyn ReadRepository<ManualMovement>>,
    config: Arc<ServiceConfig>,
}

impl ProductCosifService {
    pub fn new(repositories: &Repositories, config: Arc<ServiceConfig>) -> Self {
        ProductCosifService {
            product_cosifs: repositories.product_cosifs.clone(),
            writer: repositories.product_cosif_writer.clone(),
            products: repositories.products.clone(),
            manual_movements: repositories.manual_movements.clone(),
            config,
        }
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<QueryResponse<ProductCosifDto>> {
        validate_uuid(id)?;
        let cosif = load(self.product_cosifs.as_ref(), PRODUCT_COSIF_NOT_FOUND, id).await?;
        Ok(QueryResponse::ok(cosif.into()))
    }

    pub async fn find(
        &self,
        query: ProductCosifQuery,
    ) -> ServiceResult<QueryResponse<PagedResult<ProductCosifDto>>> {
        let request = query.paging.page_request(&self.config.paging)?;
        let page = self
            .product_cosifs
            .find_with_pagination(&query.filter(), &request)
            .await?;
        Ok(QueryResponse::page(PagedResult::from_page(page, &request)))
    }

    /// Referenced product first, then pair uniqueness.
    async fn check_rules(&self, cosif: &ProductCosif, excluding: Option<&str>) -> ServiceResult<()> {
        validate(&ProductMustExist::new(self.products.clone()), cosif.product_code.as_str()).await?;

        let mut unique = ProductCosifMustBeUnique::new(self.product_cosifs.clone());
        if let Some(id) = excluding {
            unique = unique.excluding(id);
        }
        let key = cosif.key();
        validate(&unique, &key).await?;
        Ok(())
    }

    fn write_error(err: DbError, cosif: &ProductCosif) -> ServiceError {
        if err.is_unique_violation_on("cosif_code") {
            return duplicate_key(&cosif.key());
        }
        err.into()
    }
}

#[async_trait]
impl CommandHandler<AddProductCosifRequest> for ProductCosifService {
    type Output = ProductCosifDto;

    async fn handle(
        &self,
        request: AddProductCosifRequest,
    ) -> ServiceResult<CommandResponse<ProductCosifDto>> {
        ensure_valid(&request)?;
        let cosif = request.into_entity(&self.config.actor);

        self.check_rules(&cosif, None).await?;

        let written = self
            .writer
            .add(&cosif)
            .await
            .map_err(|e| Self::write_error(e, &cosif))?;
        ensure_written(written, "Failed to add product cosif")?;

        info!(
            id = %cosif.base.id,
            product_code = %cosif.product_code,
            cosif_code = %cosif.cosif_code,
            "Product cosif added"
        );
        Ok(CommandResponse::created(cosif.into(), "Product cosif added"))
    }
}

#[async_trait]
impl CommandHandler<ChangeProductCosifRequest> for ProductCosifService {
    type Output = ProductCosifDto;

    async fn handle(
        &self,
        request: ChangeProductCosifRequest,
    ) -> ServiceResult<CommandResponse<ProductCosifDto>> {
        ensure_valid(&request)?;
        validate(&must_exist(self.product_cosifs.clone()), request.id.as_str()).await?;

        let mut cosif = load(self.product_cosifs.as_ref(), PRODUCT_COSIF_NOT_FOUND, &request.id).await?;
        request.apply_to(&mut cosif, &self.config.actor);

        self.check_rules(&cosif, Some(&cosif.base.id)).await?;

        let written = self
            .writer
            .update(&cosif)
            .await
            .map_err(|e| Self::write_error(e, &cosif))?;
        ensure_written(written, "Failed to update product cosif")?;

        info!(id = %cosif.base.id, "Product cosif updated");
        Ok(CommandResponse::ok(cosif.into(), "Product cosif updated"))
    }
}

#[async_trait]
impl CommandHandler<RemoveRequest> for ProductCosifService {
    type Output = String;

    async fn handle(&self, request: RemoveRequest) -> ServiceResult<CommandResponse<String>> {
        ensure_valid(&request)?;
        validate(&must_exist(self.product_cosifs.clone()), request.id.as_str()).await?;

        let cosif = load(self.product_cosifs.as_ref(), PRODUCT_COSIF_NOT_FOUND, &request.id).await?;
        validate(&ProductCosifMustNotBeInUse::new(self.manual_movements.clone()), &cosif).await?;

        let removed = self.writer.delete(&request.id).await?;
        ensure_written(removed, "Failed to remove product cosif")?;

        info!(id = %request.id, "Product cosif removed");
        Ok(CommandResponse::ok(request.id, "Product cosif removed"))
    }
}
