//! # Manual Movement Repository
//!
//! Database operations for manual ledger movements, plus launch-number
//! allocation.
//!
//! ## Launch Numbers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  period (06/2024): launch 1, 2, 3          next → 4                    │
//! │  period (07/2024): (none)                  next → 1                    │
//! │                                                                         │
//! │  SELECT COALESCE(MAX(launch_number), 0) + 1                            │
//! │  FROM manual_movements WHERE month = ? AND year = ?                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The read and the following insert are separate statements. Concurrent
//! writers for one period can draw the same number; the natural-key unique
//! index makes the later insert fail with a unique violation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledgerbook_core::filters::ManualMovementFilter;
use ledgerbook_core::{EntityBase, EntityStatus, ManualMovement, Page, PageRequest};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::paging::{self, SqlEntity};
use super::{LaunchNumberSource, ReadRepository, WriteRepository};
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
pub struct ManualMovementRow {
    id: String,
    status: EntityStatus,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
    month: u32,
    year: u32,
    launch_number: u32,
    product_code: String,
    cosif_code: String,
    description: String,
    value_cents: i64,
}

impl From<ManualMovementRow> for ManualMovement {
    fn from(row: ManualMovementRow) -> Self {
        ManualMovement {
            base: EntityBase {
                id: row.id,
                status: row.status,
                created_at: row.created_at,
                created_by: row.created_by,
                updated_at: row.updated_at,
                updated_by: row.updated_by,
            },
            month: row.month,
            year: row.year,
            launch_number: row.launch_number,
            product_code: row.product_code,
            cosif_code: row.cosif_code,
            description: row.description,
            value_cents: row.value_cents,
        }
    }
}

impl SqlEntity for ManualMovement {
    type Row = ManualMovementRow;

    const SELECT: &'static str = "SELECT id, status, created_at, created_by, updated_at, \
         updated_by, month, year, launch_number, product_code, cosif_code, description, \
         value_cents FROM manual_movements";

    const COUNT: &'static str = "SELECT COUNT(*) FROM manual_movements";

    fn push_filter(filter: &ManualMovementFilter, query: &mut QueryBuilder<'_, Sqlite>) {
        paging::push_number(query, "month", filter.month);
        paging::push_number(query, "year", filter.year);
        paging::push_number(query, "launch_number", filter.launch_number);
        paging::push_text(query, "product_code", &filter.product_code);
        paging::push_text(query, "cosif_code", &filter.cosif_code);
        paging::push_status(query, "status", filter.status);
    }
}

/// Repository for manual-movement database operations.
#[derive(Debug, Clone)]
pub struct ManualMovementRepository {
    pool: SqlitePool,
}

impl ManualMovementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ManualMovementRepository { pool }
    }
}

#[async_trait]
impl ReadRepository<ManualMovement> for ManualMovementRepository {
    async fn get_by_id(&self, id: &str) -> DbResult<Option<ManualMovement>> {
        paging::fetch_by_id(&self.pool, id).await
    }

    async fn find(&self, filter: &ManualMovementFilter) -> DbResult<Vec<ManualMovement>> {
        paging::fetch_all(&self.pool, filter).await
    }

    async fn count(&self, filter: &ManualMovementFilter) -> DbResult<u64> {
        paging::count::<ManualMovement>(&self.pool, filter).await
    }

    async fn find_with_pagination(
        &self,
        filter: &ManualMovementFilter,
        request: &PageRequest,
    ) -> DbResult<Page<ManualMovement>> {
        paging::fetch_page(&self.pool, filter, request).await
    }
}

#[async_trait]
impl WriteRepository<ManualMovement> for ManualMovementRepository {
    async fn add(&self, movement: &ManualMovement) -> DbResult<bool> {
        debug!(
            month = movement.month,
            year = movement.year,
            launch_number = movement.launch_number,
            "Inserting manual movement"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO manual_movements (
                id, status, created_at, created_by, updated_at, updated_by,
                month, year, launch_number, product_code, cosif_code,
                description, value_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&movement.base.id)
        .bind(movement.base.status)
        .bind(movement.base.created_at)
        .bind(&movement.base.created_by)
        .bind(movement.base.updated_at)
        .bind(&movement.base.updated_by)
        .bind(movement.month)
        .bind(movement.year)
        .bind(movement.launch_number)
        .bind(&movement.product_code)
        .bind(&movement.cosif_code)
        .bind(&movement.description)
        .bind(movement.value_cents)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, movement: &ManualMovement) -> DbResult<bool> {
        debug!(id = %movement.base.id, "Updating manual movement");

        let result = sqlx::query(
            r#"
            UPDATE manual_movements SET
                status = ?2,
                updated_at = ?3,
                updated_by = ?4,
                month = ?5,
                year = ?6,
                launch_number = ?7,
                product_code = ?8,
                cosif_code = ?9,
                description = ?10,
                value_cents = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&movement.base.id)
        .bind(movement.base.status)
        .bind(movement.base.updated_at)
        .bind(&movement.base.updated_by)
        .bind(movement.month)
        .bind(movement.year)
        .bind(movement.launch_number)
        .bind(&movement.product_code)
        .bind(&movement.cosif_code)
        .bind(&movement.description)
        .bind(movement.value_cents)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting manual movement");

        let result = sqlx::query("DELETE FROM manual_movements WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl LaunchNumberSource for ManualMovementRepository {
    async fn next_launch_number(&self, month: u32, year: u32) -> DbResult<u32> {
        let next: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(launch_number), 0) + 1
            FROM manual_movements
            WHERE month = ?1 AND year = ?2
            "#,
        )
        .bind(month)
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        debug!(month, year, next, "Allocated launch number");

        u32::try_from(next)
            .map_err(|_| DbError::Internal(format!("launch number out of range: {next}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{database, movement, product, product_cosif};
    use crate::Database;
    use ledgerbook_core::{ProductCosif, SortOrder};

    async fn with_cosif() -> (Database, ProductCosif) {
        let db = database().await;
        db.products().add(&product("AB12")).await.unwrap();
        let cosif = product_cosif("AB12", "12345678901");
        db.product_cosifs().add(&cosif).await.unwrap();
        (db, cosif)
    }

    #[tokio::test]
    async fn test_launch_number_sequence_per_period() {
        let (db, cosif) = with_cosif().await;
        let repo = db.manual_movements();

        assert_eq!(repo.next_launch_number(6, 2024).await.unwrap(), 1);

        for n in 1..=3 {
            repo.add(&movement(6, 2024, n, &cosif)).await.unwrap();
        }

        assert_eq!(repo.next_launch_number(6, 2024).await.unwrap(), 4);
        assert_eq!(repo.next_launch_number(7, 2024).await.unwrap(), 1);
        assert_eq!(repo.next_launch_number(6, 2025).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_natural_key_is_unique() {
        let (db, cosif) = with_cosif().await;
        let repo = db.manual_movements();

        repo.add(&movement(6, 2024, 1, &cosif)).await.unwrap();
        let err = repo.add(&movement(6, 2024, 1, &cosif)).await.unwrap_err();

        assert!(err.is_unique_violation_on("launch_number"), "{err:?}");
    }

    #[tokio::test]
    async fn test_unknown_cosif_pair_is_rejected() {
        let (db, cosif) = with_cosif().await;
        let mut orphan = movement(6, 2024, 1, &cosif);
        orphan.cosif_code = "99999999999".to_string();

        let err = db.manual_movements().add(&orphan).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_period_sort_orders_every_column() {
        let (db, cosif) = with_cosif().await;
        let repo = db.manual_movements();

        repo.add(&movement(12, 2023, 1, &cosif)).await.unwrap();
        repo.add(&movement(1, 2024, 2, &cosif)).await.unwrap();
        repo.add(&movement(1, 2024, 1, &cosif)).await.unwrap();

        let request = PageRequest::new(1, 10)
            .unwrap()
            .sort_by(Some("period"))
            .order(SortOrder::Desc);
        let page = repo
            .find_with_pagination(&ManualMovementFilter::default(), &request)
            .await
            .unwrap();

        let keys: Vec<_> = page
            .items
            .iter()
            .map(|m| (m.year, m.month, m.launch_number))
            .collect();
        assert_eq!(keys, [(2024, 1, 2), (2024, 1, 1), (2023, 12, 1)]);
    }

    #[tokio::test]
    async fn test_filter_by_period() {
        let (db, cosif) = with_cosif().await;
        let repo = db.manual_movements();

        repo.add(&movement(6, 2024, 1, &cosif)).await.unwrap();
        repo.add(&movement(6, 2024, 2, &cosif)).await.unwrap();
        repo.add(&movement(7, 2024, 1, &cosif)).await.unwrap();

        let june = ManualMovementFilter {
            month: Some(6),
            year: Some(2024),
            ..Default::default()
        };
        let found = repo.find(&june).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|m| m.month == 6));

        let by_cosif = ManualMovementFilter::by_cosif(&cosif.product_code, &cosif.cosif_code);
        assert_eq!(repo.count(&by_cosif).await.unwrap(), 3);
    }
}
