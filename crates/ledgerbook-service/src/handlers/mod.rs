//! # Command and Query Handlers
//!
//! One service per entity. Commands go through [`CommandHandler`]; queries
//! are inherent `get_by_id` / `find` methods.
//!
//! ## Command Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Validate shape      request.validate()      → ValidationFailed     │
//! │                         (no repository call)                           │
//! │  2. Map                 Add: new id, Active, created_at/by             │
//! │                         Change: must exist by id, load, apply, touch   │
//! │  3. Specifications      referenced records first, then uniqueness      │
//! │                         (excluding self on Change)                     │
//! │  4. Persist             Ok(false)        → PersistenceFailed (500)     │
//! │                         unique violation → same AlreadyExists code     │
//! │  5. Respond             201 Add · 200 Change/Remove                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers share nothing but `Arc`'d repositories; every call is
//! independent.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerbook_core::{Customer, ManualMovement, Product, ProductCosif};
use ledgerbook_db::{Database, LaunchNumberSource, ReadRepository, WriteRepository};
use tracing::error;

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::response::CommandResponse;

pub mod customer;
pub mod manual_movement;
pub mod product;
pub mod product_cosif;

pub use customer::CustomerService;
pub use manual_movement::ManualMovementService;
pub use product::ProductService;
pub use product_cosif::ProductCosifService;

/// Handles one command type.
#[async_trait]
pub trait CommandHandler<C>: Send + Sync {
    type Output;

    async fn handle(&self, command: C) -> ServiceResult<CommandResponse<Self::Output>>;
}

/// Every repository the handlers read from or write to.
#[derive(Clone)]
pub struct Repositories {
    pub customers: Arc<dyn ReadRepository<Customer>>,
    pub customer_writer: Arc<dyn WriteRepository<Customer>>,
    pub products: Arc<dyn ReadRepository<Product>>,
    pub product_writer: Arc<dyn WriteRepository<Product>>,
    pub product_cosifs: Arc<dyn ReadRepository<ProductCosif>>,
    pub product_cosif_writer: Arc<dyn WriteRepository<ProductCosif>>,
    pub manual_movements: Arc<dyn ReadRepository<ManualMovement>>,
    pub manual_movement_writer: Arc<dyn WriteRepository<ManualMovement>>,
    pub launch_numbers: Arc<dyn LaunchNumberSource>,
}

impl Repositories {
    /// SQLite-backed repositories sharing the database's pool.
    pub fn from_database(db: &Database) -> Self {
        let customers = Arc::new(db.customers());
        let products = Arc::new(db.products());
        let product_cosifs = Arc::new(db.product_cosifs());
        let manual_movements = Arc::new(db.manual_movements());

        Repositories {
            customers: customers.clone(),
            customer_writer: customers,
            products: products.clone(),
            product_writer: products,
            product_cosifs: product_cosifs.clone(),
            product_cosif_writer: product_cosifs,
            manual_movements: manual_movements.clone(),
            manual_movement_writer: manual_movements.clone(),
            launch_numbers: manual_movements,
        }
    }
}

/// All four services over one set of repositories.
#[derive(Clone)]
pub struct Ledgerbook {
    pub customers: CustomerService,
    pub products: ProductService,
    pub product_cosifs: ProductCosifService,
    pub manual_movements: ManualMovementService,
}

impl Ledgerbook {
    pub fn new(repositories: Repositories, config: ServiceConfig) -> Self {
        let config = Arc::new(config);

        Ledgerbook {
            customers: CustomerService::new(&repositories, config.clone()),
            products: ProductService::new(&repositories, config.clone()),
            product_cosifs: ProductCosifService::new(&repositories, config.clone()),
            manual_movements: ManualMovementService::new(&repositories, config),
        }
    }
}

/// Turns a write that touched nothing into `PersistenceFailed`.
pub(crate) fn ensure_written(written: bool, message: &str) -> ServiceResult<()> {
    if written {
        return Ok(());
    }
    error!("{}", message);
    Err(ServiceError::PersistenceFailed(message.to_string()))
}

/// Loads an entity that a must-exist specification just confirmed.
pub(crate) async fn load<E: ledgerbook_core::Filterable>(
    repository: &dyn ReadRepository<E>,
    code: &'static str,
    id: &str,
) -> ServiceResult<E> {
    repository
        .get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(code, E::KIND, id))
}
