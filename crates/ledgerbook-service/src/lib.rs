//! # ledgerbook-service: Business Rules and Handlers
//!
//! Everything between a request and the repositories: structural
//! validation, store-backed business rules, orchestration and the unified
//! error type.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  AddProductRequest ─┐                                                   │
//! │                     ▼                                                   │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                ledgerbook-service (THIS CRATE)                  │   │
//! │  │                                                                 │   │
//! │  │   dto ──► handlers ──► specification ──► ReadRepository         │   │
//! │  │                │                                                │   │
//! │  │                └──────────────────────► WriteRepository         │   │
//! │  │                                                                 │   │
//! │  │   error: ServiceError { code, kind, status_code }               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  Ok(CommandResponse { data, message, status_code: 201 })               │
//! │  Err(ServiceError::AlreadyExists { code: "PRODUCT_CODE_...", .. })     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`handlers`] - Per-entity services (commands and queries)
//! - [`specification`] - Business rules and their composition
//! - [`dto`] - Requests, queries, DTOs and mapping
//! - [`response`] - Success envelopes
//! - [`error`] - `ServiceError`
//! - [`config`] - Environment configuration
//! - [`telemetry`] - Tracing setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledgerbook_service::{CommandHandler, Ledgerbook, Repositories, ServiceConfig};
//!
//! let config = ServiceConfig::load()?;
//! let db = Database::new(config.db_config()).await?;
//! let ledger = Ledgerbook::new(Repositories::from_database(&db), config);
//!
//! let created = ledger
//!     .products
//!     .handle(AddProductRequest { product_code: "AB12".into(), description: "Cash".into() })
//!     .await?;
//! assert_eq!(created.status_code, 201);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod response;
pub mod specification;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, PagingLimits, ServiceConfig};
pub use error::{ErrorBody, ErrorKind, ServiceError, ServiceResult};
pub use handlers::{
    CommandHandler, CustomerService, Ledgerbook, ManualMovementService, ProductCosifService,
    ProductService, Repositories,
};
pub use response::{CommandResponse, PagedResult, QueryResponse};
pub use specification::{validate, validate_all, Specification};
