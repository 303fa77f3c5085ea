//! # Repository Module
//!
//! Repository contracts and their SQLite implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Contracts                                 │
//! │                                                                         │
//! │  ledgerbook-service (specifications, handlers)                         │
//! │       │                                                                 │
//! │       │  Arc<dyn ReadRepository<Product>>                              │
//! │       │  Arc<dyn WriteRepository<Product>>                             │
//! │       ▼                                                                 │
//! │  ReadRepository<E>                 WriteRepository<E>                  │
//! │  ├── get_by_id(id)                 ├── add(entity)      → bool         │
//! │  ├── find(filter)                  ├── update(entity)   → bool         │
//! │  ├── count(filter)                 └── delete(id)       → bool         │
//! │  └── find_with_pagination(filter, page request)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  paging.rs: one generic SQL engine for every entity                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Write methods return `Ok(false)` when the statement touched no row; that
//! is a persistence failure, not an error. Constraint violations surface as
//! [`DbError`](crate::DbError).
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers with their address
//! - [`ProductRepository`](product::ProductRepository) - Products
//! - [`ProductCosifRepository`](product_cosif::ProductCosifRepository) - Product classifications
//! - [`ManualMovementRepository`](manual_movement::ManualMovementRepository) - Movements and launch numbers

use async_trait::async_trait;
use ledgerbook_core::{Entity, Filterable, Page, PageRequest};

use crate::error::DbResult;

pub mod customer;
pub mod manual_movement;
pub mod paging;
pub mod product;
pub mod product_cosif;

/// Read side of a repository.
#[async_trait]
pub trait ReadRepository<E: Filterable>: Send + Sync {
    /// Looks an entity up by primary key.
    async fn get_by_id(&self, id: &str) -> DbResult<Option<E>>;

    /// Every entity matching the filter, in the entity's default order.
    async fn find(&self, filter: &E::Filter) -> DbResult<Vec<E>>;

    /// Number of entities matching the filter.
    async fn count(&self, filter: &E::Filter) -> DbResult<u64>;

    /// Filtered, counted, sorted and windowed result.
    ///
    /// `total_count` covers the whole filtered set. An unknown sort field
    /// fails before any query runs.
    async fn find_with_pagination(
        &self,
        filter: &E::Filter,
        request: &PageRequest,
    ) -> DbResult<Page<E>>;
}

/// Write side of a repository.
#[async_trait]
pub trait WriteRepository<E: Entity>: Send + Sync {
    async fn add(&self, entity: &E) -> DbResult<bool>;

    async fn update(&self, entity: &E) -> DbResult<bool>;

    async fn delete(&self, id: &str) -> DbResult<bool>;
}

/// Allocates per-period launch numbers for manual movements.
///
/// The value is `MAX(launch_number) + 1` for the period, or 1 for an empty
/// period. Two concurrent callers can read the same value; the unique index
/// on the movement's natural key rejects the second insert.
#[async_trait]
pub trait LaunchNumberSource: Send + Sync {
    async fn next_launch_number(&self, month: u32, year: u32) -> DbResult<u32>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, Utc};
    use ledgerbook_core::{Address, Customer, EntityBase, ManualMovement, Product, ProductCosif};

    use crate::{Database, DbConfig};

    pub async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Base whose `created_at` is `offset` seconds in the past.
    pub fn base(offset: i64) -> EntityBase {
        let mut base = EntityBase::new("test");
        base.created_at = Utc::now() - Duration::seconds(offset);
        base
    }

    pub fn product(code: &str) -> Product {
        Product {
            base: base(0),
            product_code: code.to_string(),
            description: format!("Product {code}"),
        }
    }

    pub fn product_cosif(product_code: &str, cosif_code: &str) -> ProductCosif {
        ProductCosif {
            base: base(0),
            product_code: product_code.to_string(),
            cosif_code: cosif_code.to_string(),
            classification_code: "ABC".to_string(),
        }
    }

    pub fn movement(month: u32, year: u32, launch_number: u32, cosif: &ProductCosif) -> ManualMovement {
        ManualMovement {
            base: base(0),
            month,
            year,
            launch_number,
            product_code: cosif.product_code.clone(),
            cosif_code: cosif.cosif_code.clone(),
            description: "Adjustment".to_string(),
            value_cents: 1_000,
        }
    }

    pub fn customer(name: &str, email: &str, document: &str) -> Customer {
        Customer {
            base: base(0),
            name: name.to_string(),
            email: email.to_string(),
            document_number: document.to_string(),
            phone: None,
            address: Address {
                street: "Rua A".to_string(),
                number: "10".to_string(),
                complement: None,
                neighborhood: "Centro".to_string(),
                city: "Recife".to_string(),
                state: "PE".to_string(),
                zip_code: "50000000".to_string(),
            },
        }
    }
}
