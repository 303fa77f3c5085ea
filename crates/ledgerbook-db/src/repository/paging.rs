//! # SQL Paging Engine
//!
//! One implementation of get-by-id / find / count / find-with-pagination
//! shared by every repository.
//!
//! ## Query Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  find_with_pagination(filter, PageRequest { page, size, field, order })│
//! │       │                                                                 │
//! │       ├── 1. resolve field against E::sort_fields()  (fails fast)      │
//! │       │                                                                 │
//! │       ├── 2. SELECT COUNT(*) FROM ... WHERE 1 = 1 AND col = ? ...      │
//! │       │         └── 0? return ([], 0) without the second query         │
//! │       │                                                                 │
//! │       └── 3. SELECT ... WHERE <same clauses>                           │
//! │                ORDER BY <registry column(s)> DIR, id DIR               │
//! │                LIMIT ? OFFSET ?                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Filter values are always bound; only registry columns are spliced into
//! the SQL text.

use ledgerbook_core::filters::clause;
use ledgerbook_core::query::SortField;
use ledgerbook_core::{EntityStatus, Filterable, Page, PageRequest, SortOrder, Sortable};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// How an entity is read from SQLite.
pub trait SqlEntity: Filterable {
    /// Flat row shape; converted into the entity after fetching.
    type Row: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + Into<Self>;

    /// `SELECT <columns> FROM <tables>`, no WHERE clause.
    const SELECT: &'static str;

    /// `SELECT COUNT(*) FROM <tables>`, no WHERE clause.
    const COUNT: &'static str;

    /// Appends one ` AND column = ?` per active filter clause.
    fn push_filter(filter: &Self::Filter, query: &mut QueryBuilder<'_, Sqlite>);
}

// =============================================================================
// Clause Helpers
// =============================================================================

/// Text clause; blank values are skipped.
pub fn push_text(query: &mut QueryBuilder<'_, Sqlite>, column: &str, value: &Option<String>) {
    if let Some(value) = clause(value) {
        query
            .push(" AND ")
            .push(column)
            .push(" = ")
            .push_bind(value.to_string());
    }
}

pub fn push_number(query: &mut QueryBuilder<'_, Sqlite>, column: &str, value: Option<u32>) {
    if let Some(value) = value {
        query
            .push(" AND ")
            .push(column)
            .push(" = ")
            .push_bind(i64::from(value));
    }
}

pub fn push_status(query: &mut QueryBuilder<'_, Sqlite>, column: &str, value: Option<EntityStatus>) {
    if let Some(status) = value {
        query
            .push(" AND ")
            .push(column)
            .push(" = ")
            .push_bind(status.as_str());
    }
}

fn filtered<'a, E: SqlEntity>(head: &str, filter: &E::Filter) -> QueryBuilder<'a, Sqlite> {
    let mut query = QueryBuilder::new(head);
    query.push(" WHERE 1 = 1");
    E::push_filter(filter, &mut query);
    query
}

/// `ORDER BY` with the direction applied to every column of a compound
/// key, then `id` in the same direction.
fn push_order_by<E: Sortable>(
    query: &mut QueryBuilder<'_, Sqlite>,
    field: &SortField<E>,
    order: SortOrder,
) {
    query.push(" ORDER BY ");
    for column in field.column.split(',') {
        query
            .push(column.trim())
            .push(" ")
            .push(order.as_sql())
            .push(", ");
    }
    query.push("id ").push(order.as_sql());
}

// =============================================================================
// Operations
// =============================================================================

pub async fn fetch_by_id<E: SqlEntity>(pool: &SqlitePool, id: &str) -> DbResult<Option<E>> {
    debug!(entity = E::KIND, id = %id, "Fetching by id");

    let mut query = QueryBuilder::<Sqlite>::new(E::SELECT);
    query.push(" WHERE id = ").push_bind(id.to_string());

    let row = query.build_query_as::<E::Row>().fetch_optional(pool).await?;
    Ok(row.map(Into::into))
}

/// Every match in the entity's default sort order.
pub async fn fetch_all<E: SqlEntity>(pool: &SqlitePool, filter: &E::Filter) -> DbResult<Vec<E>> {
    let field = E::sort_field(None)?;

    let mut query = filtered::<E>(E::SELECT, filter);
    push_order_by(&mut query, field, SortOrder::Asc);

    let rows = query.build_query_as::<E::Row>().fetch_all(pool).await?;
    debug!(entity = E::KIND, count = rows.len(), "Find returned rows");
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn count<E: SqlEntity>(pool: &SqlitePool, filter: &E::Filter) -> DbResult<u64> {
    let mut query = filtered::<E>(E::COUNT, filter);
    let total: i64 = query.build_query_scalar().fetch_one(pool).await?;
    Ok(u64::try_from(total).unwrap_or_default())
}

pub async fn fetch_page<E: SqlEntity>(
    pool: &SqlitePool,
    filter: &E::Filter,
    request: &PageRequest,
) -> DbResult<Page<E>> {
    let field = E::sort_field(request.field_name.as_deref())?;

    debug!(
        entity = E::KIND,
        page = request.page,
        page_size = request.page_size,
        sort = field.name,
        order = request.order.as_sql(),
        "Fetching page"
    );

    let total_count = count::<E>(pool, filter).await?;
    if total_count == 0 {
        return Ok(Page::empty());
    }

    let mut query = filtered::<E>(E::SELECT, filter);
    push_order_by(&mut query, field, request.order);
    query
        .push(" LIMIT ")
        .push_bind(i64::try_from(request.limit()).unwrap_or(i64::MAX))
        .push(" OFFSET ")
        .push_bind(i64::try_from(request.offset()).unwrap_or(i64::MAX));

    let rows = query.build_query_as::<E::Row>().fetch_all(pool).await?;

    Ok(Page {
        items: rows.into_iter().map(Into::into).collect(),
        total_count,
    })
}
