//! # Manual Movement Commands and Queries
//!
//! ## Add
//! ```text
//! validate shape
//!   → product must exist            (PRODUCT_NOT_FOUND, 404)
//!   → product cosif must exist      (PRODUCT_COSIF_NOT_FOUND, 404)
//!   → launch_number = next for (month, year)
//!   → natural key must be unique    (MANUAL_MOVEMENT_ALREADY_EXISTS, 409)
//!   → insert
//! ```
//! ## Change
//! The launch number is kept while `(month, year)` stays the same; moving
//! the movement to another period allocates the next number there.
//!
//! Allocation and insert are separate statements. Two concurrent adds for one
//! period can draw the same number; the storage unique index rejects the
//! second one, reported as `MANUAL_MOVEMENT_ALREADY_EXISTS`.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerbook_core::validation::validate_uuid;
use ledgerbook_core::{ManualMovement, Product, ProductCosif};
use ledgerbook_db::{DbError, LaunchNumberSource, ReadRepository, WriteRepository};
use tracing::{debug, info};

use super::{ensure_written, load, CommandHandler, Repositories};
use crate::config::ServiceConfig;
use crate::dto::manual_movement::{
    AddManualMovementRequest, ChangeManualMovementRequest, ManualMovementDto, ManualMovementQuery,
};
use crate::dto::{ensure_valid, RemoveRequest};
use crate::error::{ServiceError, ServiceResult};
use crate::response::{CommandResponse, PagedResult, QueryResponse};
use crate::specification::codes::{MANUAL_MOVEMENT_ALREADY_EXISTS, MANUAL_MOVEMENT_NOT_FOUND};
use crate::specification::manual_movement::{must_exist, natural_key, natural_key_must_be_unique};
use crate::specification::product::ProductMustExist;
use crate::specification::product_cosif::{CosifKey, ProductCosifMustExist};
use crate::specification::validate;

#[derive(Clone)]
pub struct ManualMovementService {
    manual_movements: Arc<dyn ReadRepository<ManualMovement>>,
    writer: Arc<dyn WriteRepository<ManualMovement>>,
    launch_numbers: Arc<dyn LaunchNumberSource>,
    products: Arc<dyn ReadRepository<Product>>,
    product_cosifs: Arc<dyn ReadRepository<ProductCosif>>,
    config: Arc<ServiceConfig>,
}

impl ManualMovementService {
    pub fn new(repositories: &Repositories, config: Arc<ServiceConfig>) -> Self {
        ManualMovementService {
            manual_movements: repositories.manual_movements.clone(),
            writer: repositories.manual_movement_writer.clone(),
            launch_numbers: repositories.launch_numbers.clone(),
            products: repositories.products.clone(),
            product_cosifs: repositories.product_cosifs.clone(),
            config,
        }
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<QueryResponse<ManualMovementDto>> {
        validate_uuid(id)?;
        let movement = load(self.manual_movements.as_ref(), MANUAL_MOVEMENT_NOT_FOUND, id).await?;
        Ok(QueryResponse::ok(movement.into()))
    }

    pub async fn find(
        &self,
        query: ManualMovementQuery,
    ) -> ServiceResult<QueryResponse<PagedResult<ManualMovementDto>>> {
        let request = query.paging.page_request(&self.config.paging)?;
        let page = self
            .manual_movements
            .find_with_pagination(&query.filter(), &request)
            .await?;
        Ok(QueryResponse::page(PagedResult::from_page(page, &request)))
    }

    /// Product first, then the classification pair.
    async fn check_references(&self, key: &CosifKey) -> ServiceResult<()> {
        validate(&ProductMustExist::new(self.products.clone()), key.0.as_str()).await?;
        validate(&ProductCosifMustExist::new(self.product_cosifs.clone()), key).await?;
        Ok(())
    }

    async fn next_launch_number(&self, month: u32, year: u32) -> ServiceResult<u32> {
        let next = self.launch_numbers.next_launch_number(month, year).await?;
        debug!(month, year, launch_number = next, "Launch number allocated");
        Ok(next)
    }

    fn write_error(err: DbError, movement: &ManualMovement) -> ServiceError {
        if err.is_unique_violation_on("launch_number") {
            return ServiceError::already_exists(
                MANUAL_MOVEMENT_ALREADY_EXISTS,
                "ManualMovement",
                "launchNumber",
                natural_key(movement),
                None,
            );
        }
        err.into()
    }
}

#[async_trait]
impl CommandHandler<AddManualMovementRequest> for ManualMovementService {
    type Output = ManualMovementDto;

    async fn handle(
        &self,
        request: AddManualMovementRequest,
    ) -> ServiceResult<CommandResponse<ManualMovementDto>> {
        ensure_valid(&request)?;
        self.check_references(&request.cosif_key()).await?;

        let launch_number = self.next_launch_number(request.month, request.year).await?;
        let movement = request.into_entity(launch_number, &self.config.actor);

        validate(&natural_key_must_be_unique(self.manual_movements.clone()), &movement).await?;

        let written = self
            .writer
            .add(&movement)
            .await
            .map_err(|e| Self::write_error(e, &movement))?;
        ensure_written(written, "Failed to add manual movement")?;

        info!(
            id = %movement.base.id,
            month = movement.month,
            year = movement.year,
            launch_number = movement.launch_number,
            "Manual movement added"
        );
        Ok(CommandResponse::created(movement.into(), "Manual movement added"))
    }
}

#[async_trait]
impl CommandHandler<ChangeManualMovementRequest> for ManualMovementService {
    type Output = ManualMovementDto;

    async fn handle(
        &self,
        request: ChangeManualMovementRequest,
    ) -> ServiceResult<CommandResponse<ManualMovementDto>> {
        ensure_valid(&request)?;
        validate(&must_exist(self.manual_movements.clone()), request.id.as_str()).await?;

        let mut movement =
            load(self.manual_movements.as_ref(), MANUAL_MOVEMENT_NOT_FOUND, &request.id).await?;
        self.check_references(&request.cosif_key()).await?;

        let launch_number = if request.changes_period(&movement) {
            self.next_launch_number(request.month, request.year).await?
        } else {
            movement.launch_number
        };
        request.apply_to(&mut movement, launch_number, &self.config.actor);

        let unique =
            natural_key_must_be_unique(self.manual_movements.clone()).excluding(&movement.base.id);
        validate(&unique, &movement).await?;

        let written = self
            .writer
            .update(&movement)
            .await
            .map_err(|e| Self::write_error(e, &movement))?;
        ensure_written(written, "Failed to update manual movement")?;

        info!(id = %movement.base.id, "Manual movement updated");
        Ok(CommandResponse::ok(movement.into(), "Manual movement updated"))
    }
}

#[async_trait]
impl CommandHandler<RemoveRequest> for ManualMovementService {
    type Output = String;

    async fn handle(&self, request: RemoveRequest) -> ServiceResult<CommandResponse<String>> {
        ensure_valid(&request)?;
        validate(&must_exist(self.manual_movements.clone()), request.id.as_str()).await?;

        let removed = self.writer.delete(&request.id).await?;
        ensure_written(removed, "Failed to remove manual movement")?;

        info!(id = %request.id, "Manual movement removed");
        Ok(CommandResponse::ok(request.id, "Manual movement removed"))
    }
}
