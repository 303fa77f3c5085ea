//! # Domain Types
//!
//! Core entities managed by ledgerbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  EntityBase (embedded in every entity)                                  │
//! │  id · status · created_at/by · updated_at/by                            │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Customer     │   │     Product     │   │    ProductCosif     │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  email (uniq)   │   │  product_code   │◄──│  product_code (FK)  │   │
//! │  │  document (uniq)│   │    (unique)     │   │  cosif_code         │   │
//! │  │  address (1:1)  │   │  description    │   │  (pair unique)      │   │
//! │  └─────────────────┘   └─────────────────┘   └──────────┬──────────┘   │
//! │                                                          │              │
//! │                              ┌───────────────────────────▼──────────┐   │
//! │                              │           ManualMovement             │   │
//! │                              │  (month, year, launch_number,        │   │
//! │                              │   product_code, cosif_code) unique   │   │
//! │                              └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for lookups by primary key
//! - Natural key: (email, document_number, product_code, ...) - business-meaningful

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

// =============================================================================
// Entity Status
// =============================================================================

/// Lifecycle status shared by every persisted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    /// Record exists but has not been activated yet.
    Created,
    /// Live record (default for everything created through a handler).
    Active,
    /// Record kept for history but hidden from active listings.
    Inactive,
}

impl EntityStatus {
    /// Returns the storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Created => "created",
            EntityStatus::Active => "active",
            EntityStatus::Inactive => "inactive",
        }
    }
}

impl Default for EntityStatus {
    fn default() -> Self {
        EntityStatus::Active
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" => Ok(EntityStatus::Created),
            "active" => Ok(EntityStatus::Active),
            "inactive" => Ok(EntityStatus::Inactive),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

// =============================================================================
// Entity Base
// =============================================================================

/// Identity, lifecycle and audit columns carried by every entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EntityBase {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Lifecycle status.
    pub status: EntityStatus,

    /// When the record was created (set by the handler, not the database).
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Who created the record.
    pub created_by: String,

    /// When the record was last changed.
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Who last changed the record.
    pub updated_by: Option<String>,
}

impl EntityBase {
    /// Creation metadata for a brand-new record: fresh id, `Active`, `created_at = now`.
    pub fn new(actor: impl Into<String>) -> Self {
        EntityBase {
            id: generate_id(),
            status: EntityStatus::Active,
            created_at: Utc::now(),
            created_by: actor.into(),
            updated_at: None,
            updated_by: None,
        }
    }

    /// Stamps the update audit columns.
    pub fn touch(&mut self, actor: impl Into<String>) {
        self.updated_at = Some(Utc::now());
        self.updated_by = Some(actor.into());
    }
}

/// Generates a new entity ID.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Common behaviour of persisted entities.
///
/// `KIND` is the human name used in error messages and logs ("Customer", ...).
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: &'static str;

    fn base(&self) -> &EntityBase;

    fn base_mut(&mut self) -> &mut EntityBase;

    fn id(&self) -> &str {
        &self.base().id
    }
}

macro_rules! impl_entity {
    ($ty:ty, $kind:literal) => {
        impl Entity for $ty {
            const KIND: &'static str = $kind;

            fn base(&self) -> &EntityBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut EntityBase {
                &mut self.base
            }
        }
    };
}

// =============================================================================
// Customer
// =============================================================================

/// Postal address, owned one-to-one by a [`Customer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter state code.
    pub state: String,
    /// Eight digits, no separator.
    pub zip_code: String,
}

/// A customer with unique email and document number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    #[serde(flatten)]
    pub base: EntityBase,

    /// Display name.
    pub name: String,

    /// Unique, stored lower-case.
    pub email: String,

    /// Unique tax document (digits only).
    pub document_number: String,

    pub phone: Option<String>,

    pub address: Address,
}

impl_entity!(Customer, "Customer");

// =============================================================================
// Product
// =============================================================================

/// A product identified by a four-character code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    #[serde(flatten)]
    pub base: EntityBase,

    /// Business identifier, unique, stored upper-case.
    pub product_code: String,

    pub description: String,
}

impl_entity!(Product, "Product");

// =============================================================================
// Product Cosif
// =============================================================================

/// Accounting classification (COSIF account) attached to a product.
///
/// `(product_code, cosif_code)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductCosif {
    #[serde(flatten)]
    pub base: EntityBase,

    /// References [`Product::product_code`].
    pub product_code: String,

    /// Eleven-digit COSIF account code.
    pub cosif_code: String,

    pub classification_code: String,
}

impl ProductCosif {
    /// The `(product_code, cosif_code)` pair used as natural key.
    pub fn key(&self) -> (String, String) {
        (self.product_code.clone(), self.cosif_code.clone())
    }
}

impl_entity!(ProductCosif, "ProductCosif");

// =============================================================================
// Manual Movement
// =============================================================================

/// A manual ledger movement.
///
/// ## Natural Key
/// `(month, year, launch_number, product_code, cosif_code)`; `launch_number` is
/// a per-period sequence assigned when the movement is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ManualMovement {
    #[serde(flatten)]
    pub base: EntityBase,

    /// 1..=12
    pub month: u32,

    pub year: u32,

    /// Sequence within `(month, year)`, starting at 1.
    pub launch_number: u32,

    pub product_code: String,

    pub cosif_code: String,

    pub description: String,

    /// Movement value in cents (smallest currency unit).
    pub value_cents: i64,
}

impl ManualMovement {
    /// The `(product_code, cosif_code)` pair this movement posts against.
    pub fn cosif_key(&self) -> (String, String) {
        (self.product_code.clone(), self.cosif_code.clone())
    }
}

impl_entity!(ManualMovement, "ManualMovement");

// =============================================================================
// Unit Tests
// =============================================================================
