//! # ledgerbook-core: Pure Domain Logic for ledgerbook
//!
//! Entities, structural validation and the I/O-free half of the paginated
//! query engine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ledgerbook Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ledgerbook-service                                │   │
//! │  │  Command/query handlers · specifications · DTOs                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ledgerbook-db                                     │   │
//! │  │  SQLite pool · migrations · repositories · SQL paging          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ ledgerbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  filters  │  │   query   │  │ validation│  │   │
//! │  │   │ Customer  │  │ predicates│  │ PageReq   │  │  field    │  │   │
//! │  │   │ Product.. │  │ sort regs │  │ paginate  │  │  rules    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Customer, Product, ProductCosif, ManualMovement)
//! - [`filters`] - Per-entity predicates and sort-field registries
//! - [`query`] - Paging, sort direction, in-memory windowing
//! - [`error`] - Domain error types
//! - [`validation`] - Structural validation
//!
//! ## Example Usage
//!
//! ```rust
//! use ledgerbook_core::query::{paginate, PageRequest, SortOrder};
//! use ledgerbook_core::{EntityBase, Product};
//!
//! let products: Vec<Product> = ["BBBB", "AAAA", "CCCC"]
//!     .into_iter()
//!     .map(|code| Product {
//!         base: EntityBase::new("docs"),
//!         product_code: code.to_string(),
//!         description: String::new(),
//!     })
//!     .collect();
//!
//! let request = PageRequest::new(1, 2)
//!     .unwrap()
//!     .sort_by(Some("productCode"))
//!     .order(SortOrder::Desc);
//! let page = paginate(products, |_| true, &request).unwrap();
//!
//! assert_eq!(page.total_count, 3);
//! assert_eq!(page.items[0].product_code, "CCCC");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filters;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use filters::{Filterable, Predicate};
pub use query::{Page, PageRequest, SortOrder, Sortable};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Actor recorded in audit columns when the caller supplies none.
pub const SYSTEM_ACTOR: &str = "system";

/// Page size used when a query does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size accepted by default.
pub const MAX_PAGE_SIZE: u32 = 100;
