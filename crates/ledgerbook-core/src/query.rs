//! # Query Primitives
//!
//! Paging, ordering and the in-memory half of the paginated query engine.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 find_with_pagination(filter, request)                   │
//! │                                                                         │
//! │  1. Resolve sort field ── unknown name? ──► CoreError::UnknownSortField │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Apply predicate (AND of optional clauses)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. total_count = |filtered|            (BEFORE windowing)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. Sort by field, tie-break by id, same direction for both             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. skip (page-1)*page_size, take page_size                             │
//! │                                                                         │
//! │  SQL side (ledgerbook-db) runs the same steps with the same registry:   │
//! │  COUNT(*) ... WHERE ...  then  ORDER BY <column> <dir>, id <dir>        │
//! │                                LIMIT ? OFFSET ?                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Field Names
//! Sort field names are resolved through a per-entity allow-list
//! ([`Sortable::sort_fields`]). Matching ignores case and underscores, so
//! `"ProductCode"`, `"productCode"` and `"product_code"` are the same field.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Entity;
use crate::validation::ValidationResult;

// =============================================================================
// Sort Order
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses a caller-supplied direction.
    ///
    /// Only `"desc"` (any case) is descending; anything else, including
    /// `None`, is ascending.
    pub fn parse(order: Option<&str>) -> Self {
        match order {
            Some(o) if o.trim().eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Applies this direction to an ascending comparison result.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

// =============================================================================
// Page Request / Page
// =============================================================================

/// Where to cut the filtered set and how to order it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Items per page (≥ 1).
    pub page_size: u32,
    /// Sort field name; `None` uses the entity default.
    pub field_name: Option<String>,
    pub order: SortOrder,
}

impl PageRequest {
    /// Creates a request, rejecting `page < 1` and `page_size < 1`.
    pub fn new(page: u32, page_size: u32) -> ValidationResult<Self> {
        if page < 1 {
            return Err(ValidationError::MustBePositive {
                field: "page".to_string(),
            });
        }
        if page_size < 1 {
            return Err(ValidationError::MustBePositive {
                field: "pageSize".to_string(),
            });
        }

        Ok(PageRequest {
            page,
            page_size,
            field_name: None,
            order: SortOrder::Asc,
        })
    }

    /// Sets the sort field. Blank names fall back to the entity default.
    pub fn sort_by(mut self, field_name: Option<impl Into<String>>) -> Self {
        self.field_name = field_name
            .map(Into::into)
            .filter(|name: &String| !name.trim().is_empty());
        self
    }

    /// Sets the sort direction.
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Rows to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Rows to take.
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// One window of a filtered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the whole filtered set, independent of the window.
    pub total_count: u64,
}

impl<T> Page<T> {
    /// `([], 0)`.
    pub fn empty() -> Self {
        Page {
            items: Vec::new(),
            total_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maps items, keeping the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }

    /// `ceil(total_count / page_size)`.
    pub fn total_pages(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(page_size))
    }
}

// =============================================================================
// Sort Registry
// =============================================================================

/// One accepted sort field: public name, SQL column, in-memory comparator.
pub struct SortField<E: 'static> {
    /// Name callers pass as `field_name`.
    pub name: &'static str,
    /// Column(s) used in `ORDER BY`, comma-separated for compound keys.
    /// Only ever taken from this registry.
    pub column: &'static str,
    /// Ascending comparison.
    pub compare: fn(&E, &E) -> Ordering,
}

impl<E: 'static> std::fmt::Debug for SortField<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortField")
            .field("name", &self.name)
            .field("column", &self.column)
            .finish()
    }
}

/// Entities that can be ordered by a runtime field name.
pub trait Sortable: Entity {
    /// Field used when the request names none.
    const DEFAULT_SORT: &'static str;

    /// The allow-list.
    fn sort_fields() -> &'static [SortField<Self>];

    /// Resolves a requested field name against the allow-list.
    fn sort_field(name: Option<&str>) -> CoreResult<&'static SortField<Self>> {
        let requested = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(Self::DEFAULT_SORT);
        let wanted = normalize_field_name(requested);

        Self::sort_fields()
            .iter()
            .find(|field| normalize_field_name(field.name) == wanted)
            .ok_or_else(|| CoreError::UnknownSortField {
                entity: Self::KIND,
                field: requested.to_string(),
                allowed: Self::sort_fields().iter().map(|f| f.name).collect(),
            })
    }
}

fn normalize_field_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

// =============================================================================
// In-Memory Engine
// =============================================================================

/// Filters, counts, sorts and windows an in-memory collection.
///
/// The sort field is resolved before anything else, so an unknown name fails
/// even when the predicate matches nothing.
pub fn paginate<E, I, P>(items: I, predicate: P, request: &PageRequest) -> CoreResult<Page<E>>
where
    E: Sortable,
    I: IntoIterator<Item = E>,
    P: Fn(&E) -> bool,
{
    let field = E::sort_field(request.field_name.as_deref())?;

    let mut matched: Vec<E> = items.into_iter().filter(|e| predicate(e)).collect();
    let total_count = matched.len() as u64;

    matched.sort_by(|a, b| {
        let ordering = (field.compare)(a, b).then_with(|| a.id().cmp(b.id()));
        request.order.apply(ordering)
    });

    let items = matched
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.limit() as usize)
        .collect();

    Ok(Page { items, total_count })
}

// =============================================================================
// Unit Tests
// =============================================================================
