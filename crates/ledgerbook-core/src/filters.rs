//! # Entity Filters and Sort Registries
//!
//! Per-entity predicates for `find` / `find_with_pagination`, plus the sort
//! allow-lists that back [`Sortable`].
//!
//! ## Predicate Semantics
//! A filter is the logical AND of optional clauses. A clause whose value is
//! absent or blank is a no-op, so `ProductFilter::default()` matches everything.
//! Clauses are exact matches on normalized values (codes upper-case, email
//! lower-case); the SQL renderer in ledgerbook-db binds the same normalized
//! values.

use std::cmp::Ordering;

use crate::query::{SortField, Sortable};
use crate::types::{Customer, EntityStatus, ManualMovement, Product, ProductCosif};

/// In-memory evaluation of a filter.
pub trait Predicate<E>: Send + Sync {
    fn matches(&self, entity: &E) -> bool;
}

/// Ties an entity to its filter type.
pub trait Filterable: Sortable {
    type Filter: Predicate<Self> + Default + Clone + std::fmt::Debug + Send + Sync + 'static;
}

/// Returns the trimmed value when the clause is active.
pub fn clause(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn text_matches(value: &Option<String>, actual: &str) -> bool {
    clause(value).map_or(true, |wanted| wanted == actual)
}

fn status_matches(value: Option<EntityStatus>, actual: EntityStatus) -> bool {
    value.map_or(true, |wanted| wanted == actual)
}

fn number_matches(value: Option<u32>, actual: u32) -> bool {
    value.map_or(true, |wanted| wanted == actual)
}

/// Upper-cases a code-like value.
pub fn normalize_code(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Lower-cases an email.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub document_number: Option<String>,
    pub status: Option<EntityStatus>,
}

impl CustomerFilter {
    pub fn by_email(email: &str) -> Self {
        CustomerFilter {
            email: Some(normalize_email(email)),
            ..Default::default()
        }
    }

    pub fn by_document(document_number: &str) -> Self {
        CustomerFilter {
            document_number: Some(document_number.trim().to_string()),
            ..Default::default()
        }
    }
}

impl Predicate<Customer> for CustomerFilter {
    fn matches(&self, c: &Customer) -> bool {
        text_matches(&self.name, &c.name)
            && text_matches(&self.email, &c.email)
            && text_matches(&self.document_number, &c.document_number)
            && status_matches(self.status, c.base.status)
    }
}

const CUSTOMER_SORT: &[SortField<Customer>] = &[
    SortField {
        name: "Name",
        column: "name",
        compare: |a: &Customer, b: &Customer| a.name.cmp(&b.name),
    },
    SortField {
        name: "Email",
        column: "email",
        compare: |a: &Customer, b: &Customer| a.email.cmp(&b.email),
    },
    SortField {
        name: "DocumentNumber",
        column: "document_number",
        compare: |a: &Customer, b: &Customer| a.document_number.cmp(&b.document_number),
    },
    SortField {
        name: "Status",
        column: "status",
        compare: |a: &Customer, b: &Customer| a.base.status.as_str().cmp(b.base.status.as_str()),
    },
    SortField {
        name: "CreatedAt",
        column: "created_at",
        compare: |a: &Customer, b: &Customer| a.base.created_at.cmp(&b.base.created_at),
    },
];

impl Filterable for Customer {
    type Filter = CustomerFilter;
}

impl Sortable for Customer {
    const DEFAULT_SORT: &'static str = "Name";

    fn sort_fields() -> &'static [SortField<Self>] {
        CUSTOMER_SORT
    }
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub product_code: Option<String>,
    pub description: Option<String>,
    pub status: Option<EntityStatus>,
}

impl ProductFilter {
    pub fn by_code(product_code: &str) -> Self {
        ProductFilter {
            product_code: Some(normalize_code(product_code)),
            ..Default::default()
        }
    }
}

impl Predicate<Product> for ProductFilter {
    fn matches(&self, p: &Product) -> bool {
        text_matches(&self.product_code, &p.product_code)
            && text_matches(&self.description, &p.description)
            && status_matches(self.status, p.base.status)
    }
}

const PRODUCT_SORT: &[SortField<Product>] = &[
    SortField {
        name: "ProductCode",
        column: "product_code",
        compare: |a: &Product, b: &Product| a.product_code.cmp(&b.product_code),
    },
    SortField {
        name: "Description",
        column: "description",
        compare: |a: &Product, b: &Product| a.description.cmp(&b.description),
    },
    SortField {
        name: "Status",
        column: "status",
        compare: |a: &Product, b: &Product| a.base.status.as_str().cmp(b.base.status.as_str()),
    },
    SortField {
        name: "CreatedAt",
        column: "created_at",
        compare: |a: &Product, b: &Product| a.base.created_at.cmp(&b.base.created_at),
    },
];

impl Filterable for Product {
    type Filter = ProductFilter;
}

impl Sortable for Product {
    const DEFAULT_SORT: &'static str = "ProductCode";

    fn sort_fields() -> &'static [SortField<Self>] {
        PRODUCT_SORT
    }
}

// =============================================================================
// Product Cosif
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCosifFilter {
    pub product_code: Option<String>,
    pub cosif_code: Option<String>,
    pub classification_code: Option<String>,
    pub status: Option<EntityStatus>,
}

impl ProductCosifFilter {
    pub fn by_key(product_code: &str, cosif_code: &str) -> Self {
        ProductCosifFilter {
            product_code: Some(normalize_code(product_code)),
            cosif_code: Some(cosif_code.trim().to_string()),
            ..Default::default()
        }
    }

    pub fn by_product(product_code: &str) -> Self {
        ProductCosifFilter {
            product_code: Some(normalize_code(product_code)),
            ..Default::default()
        }
    }
}

impl Predicate<ProductCosif> for ProductCosifFilter {
    fn matches(&self, pc: &ProductCosif) -> bool {
        text_matches(&self.product_code, &pc.product_code)
            && text_matches(&self.cosif_code, &pc.cosif_code)
            && text_matches(&self.classification_code, &pc.classification_code)
            && status_matches(self.status, pc.base.status)
    }
}

const PRODUCT_COSIF_SORT: &[SortField<ProductCosif>] = &[
    SortField {
        name: "ProductCode",
        column: "product_code",
        compare: |a: &ProductCosif, b: &ProductCosif| a.product_code.cmp(&b.product_code),
    },
    SortField {
        name: "CosifCode",
        column: "cosif_code",
        compare: |a: &ProductCosif, b: &ProductCosif| a.cosif_code.cmp(&b.cosif_code),
    },
    SortField {
        name: "ClassificationCode",
        column: "classification_code",
        compare: |a: &ProductCosif, b: &ProductCosif| {
            a.classification_code.cmp(&b.classification_code)
        },
    },
    SortField {
        name: "CreatedAt",
        column: "created_at",
        compare: |a: &ProductCosif, b: &ProductCosif| a.base.created_at.cmp(&b.base.created_at),
    },
];

impl Filterable for ProductCosif {
    type Filter = ProductCosifFilter;
}

impl Sortable for ProductCosif {
    const DEFAULT_SORT: &'static str = "ProductCode";

    fn sort_fields() -> &'static [SortField<Self>] {
        PRODUCT_COSIF_SORT
    }
}

// =============================================================================
// Manual Movement
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualMovementFilter {
    pub month: Option<u32>,
    pub year: Option<u32>,
    pub launch_number: Option<u32>,
    pub product_code: Option<String>,
    pub cosif_code: Option<String>,
    pub status: Option<EntityStatus>,
}

impl ManualMovementFilter {
    /// Exact natural-key match.
    pub fn by_natural_key(m: &ManualMovement) -> Self {
        ManualMovementFilter {
            month: Some(m.month),
            year: Some(m.year),
            launch_number: Some(m.launch_number),
            product_code: Some(normalize_code(&m.product_code)),
            cosif_code: Some(m.cosif_code.trim().to_string()),
            status: None,
        }
    }

    pub fn by_cosif(product_code: &str, cosif_code: &str) -> Self {
        ManualMovementFilter {
            product_code: Some(normalize_code(product_code)),
            cosif_code: Some(cosif_code.trim().to_string()),
            ..Default::default()
        }
    }
}

impl Predicate<ManualMovement> for ManualMovementFilter {
    fn matches(&self, m: &ManualMovement) -> bool {
        number_matches(self.month, m.month)
            && number_matches(self.year, m.year)
            && number_matches(self.launch_number, m.launch_number)
            && text_matches(&self.product_code, &m.product_code)
            && text_matches(&self.cosif_code, &m.cosif_code)
            && status_matches(self.status, m.base.status)
    }
}

fn by_period(a: &ManualMovement, b: &ManualMovement) -> Ordering {
    (a.year, a.month, a.launch_number).cmp(&(b.year, b.month, b.launch_number))
}

const MANUAL_MOVEMENT_SORT: &[SortField<ManualMovement>] = &[
    SortField {
        name: "LaunchNumber",
        column: "launch_number",
        compare: |a: &ManualMovement, b: &ManualMovement| a.launch_number.cmp(&b.launch_number),
    },
    SortField {
        name: "Month",
        column: "month",
        compare: |a: &ManualMovement, b: &ManualMovement| a.month.cmp(&b.month),
    },
    SortField {
        name: "Year",
        column: "year",
        compare: |a: &ManualMovement, b: &ManualMovement| a.year.cmp(&b.year),
    },
    SortField {
        name: "Period",
        column: "year, month, launch_number",
        compare: by_period,
    },
    SortField {
        name: "ProductCode",
        column: "product_code",
        compare: |a: &ManualMovement, b: &ManualMovement| a.product_code.cmp(&b.product_code),
    },
    SortField {
        name: "CosifCode",
        column: "cosif_code",
        compare: |a: &ManualMovement, b: &ManualMovement| a.cosif_code.cmp(&b.cosif_code),
    },
    SortField {
        name: "Value",
        column: "value_cents",
        compare: |a: &ManualMovement, b: &ManualMovement| a.value_cents.cmp(&b.value_cents),
    },
    SortField {
        name: "CreatedAt",
        column: "created_at",
        compare: |a: &ManualMovement, b: &ManualMovement| a.base.created_at.cmp(&b.base.created_at),
    },
];

impl Filterable for ManualMovement {
    type Filter = ManualMovementFilter;
}

impl Sortable for ManualMovement {
    const DEFAULT_SORT: &'static str = "LaunchNumber";

    fn sort_fields() -> &'static [SortField<Self>] {
        MANUAL_MOVEMENT_SORT
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
