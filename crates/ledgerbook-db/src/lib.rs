//! # ledgerbook-db: Database Layer for ledgerbook
//!
//! SQLite storage for customers, products, product classifications and
//! manual movements, behind the repository contracts the service layer
//! consumes.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ledgerbook Data Flow                             │
//! │                                                                         │
//! │  Command / query handler (ledgerbook-service)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   ledgerbook-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ CustomerRepo  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 001_init.sql │  │   │
//! │  │   │               │    │ ProductCosif  │    │              │  │   │
//! │  │   │               │    │ ManualMovement│    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                        paging.rs (shared SQL engine)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository contracts and SQLite implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledgerbook_db::{Database, DbConfig, ReadRepository};
//!
//! let db = Database::new(DbConfig::new("ledgerbook.db")).await?;
//! let request = PageRequest::new(1, 20)?.sort_by(Some("ProductCode"));
//! let page = db.products().find_with_pagination(&ProductFilter::default(), &request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{LaunchNumberSource, ReadRepository, WriteRepository};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::manual_movement::ManualMovementRepository;
pub use repository::product::ProductRepository;
pub use repository::product_cosif::ProductCosifRepository;
