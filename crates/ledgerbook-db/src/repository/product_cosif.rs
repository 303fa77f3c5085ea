//! # Product Cosif Repository
//!
//! Database operations for product classifications.
//!
//! ## Keys
//! ```text
//! products.product_code ◄── product_cosifs.product_code   (ON UPDATE CASCADE)
//! (product_code, cosif_code)  unique  (ux_product_cosifs_key)
//!        ▲
//!        └── manual_movements (product_code, cosif_code)  (ON UPDATE CASCADE)
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledgerbook_core::filters::ProductCosifFilter;
use ledgerbook_core::{EntityBase, EntityStatus, Page, PageRequest, ProductCosif};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::paging::{self, SqlEntity};
use super::{ReadRepository, WriteRepository};
use crate::error::DbResult;

#[derive(Debug, sqlx::FromRow)]
pub struct ProductCosifRow {
    id: String,
    status: EntityStatus,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
    product_code: String,
    cosif_code: String,
    classification_code: String,
}

impl From<ProductCosifRow> for ProductCosif {
    fn from(row: ProductCosifRow) -> Self {
        ProductCosif {
            base: EntityBase {
                id: row.id,
                status: row.status,
                created_at: row.created_at,
                created_by: row.created_by,
                updated_at: row.updated_at,
                updated_by: row.updated_by,
            },
            product_code: row.product_code,
            cosif_code: row.cosif_code,
            classification_code: row.classification_code,
        }
    }
}

impl SqlEntity for ProductCosif {
    type Row = ProductCosifRow;

    const SELECT: &'static str = "SELECT id, status, created_at, created_by, updated_at, \
         updated_by, product_code, cosif_code, classification_code FROM product_cosifs";

    const COUNT: &'static str = "SELECT COUNT(*) FROM product_cosifs";

    fn push_filter(filter: &ProductCosifFilter, query: &mut QueryBuilder<'_, Sqlite>) {
        paging::push_text(query, "product_code", &filter.product_code);
        paging::push_text(query, "cosif_code", &filter.cosif_code);
        paging::push_text(query, "classification_code", &filter.classification_code);
        paging::push_status(query, "status", filter.status);
    }
}

/// Repository for product-cosif database operations.
#[derive(Debug, Clone)]
pub struct ProductCosifRepository {
    pool: SqlitePool,
}

impl ProductCosifRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductCosifRepository { pool }
    }
}

#[async_trait]
impl ReadRepository<ProductCosif> for ProductCosifRepository {
    async fn get_by_id(&self, id: &str) -> DbResult<Option<ProductCosif>> {
        paging::fetch_by_id(&self.pool, id).await
    }

    async fn find(&self, filter: &ProductCosifFilter) -> DbResult<Vec<ProductCosif>> {
        paging::fetch_all(&self.pool, filter).await
    }

    async fn count(&self, filter: &ProductCosifFilter) -> DbResult<u64> {
        paging::count::<ProductCosif>(&self.pool, filter).await
    }

    async fn find_with_pagination(
        &self,
        filter: &ProductCosifFilter,
        request: &PageRequest,
    ) -> DbResult<Page<ProductCosif>> {
        paging::fetch_page(&self.pool, filter, request).await
    }
}

#[async_trait]
impl WriteRepository<ProductCosif> for ProductCosifRepository {
    /// Inserts a classification.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - pair already exists
    /// * `Err(DbError::ForeignKeyViolation)` - product code unknown
    async fn add(&self, cosif: &ProductCosif) -> DbResult<bool> {
        debug!(
            product_code = %cosif.product_code,
            cosif_code = %cosif.cosif_code,
            "Inserting product cosif"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO product_cosifs (
                id, status, created_at, created_by, updated_at, updated_by,
                product_code, cosif_code, classification_code
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&cosif.base.id)
        .bind(cosif.base.status)
        .bind(cosif.base.created_at)
        .bind(&cosif.base.created_by)
        .bind(cosif.base.updated_at)
        .bind(&cosif.base.updated_by)
        .bind(&cosif.product_code)
        .bind(&cosif.cosif_code)
        .bind(&cosif.classification_code)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, cosif: &ProductCosif) -> DbResult<bool> {
        debug!(id = %cosif.base.id, "Updating product cosif");

        let result = sqlx::query(
            r#"
            UPDATE product_cosifs SET
                status = ?2,
                updated_at = ?3,
                updated_by = ?4,
                product_code = ?5,
                cosif_code = ?6,
                classification_code = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&cosif.base.id)
        .bind(cosif.base.status)
        .bind(cosif.base.updated_at)
        .bind(&cosif.base.updated_by)
        .bind(&cosif.product_code)
        .bind(&cosif.cosif_code)
        .bind(&cosif.classification_code)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting product cosif");

        let result = sqlx::query("DELETE FROM product_cosifs WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{database, product, product_cosif};

    #[tokio::test]
    async fn test_requires_existing_product() {
        let repo = database().await.product_cosifs();

        let err = repo
            .add(&product_cosif("AB12", "12345678901"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_pair_is_unique_and_filterable() {
        let db = database().await;
        db.products().add(&product("AB12")).await.unwrap();
        db.products().add(&product("CD34")).await.unwrap();
        let repo = db.product_cosifs();

        repo.add(&product_cosif("AB12", "12345678901")).await.unwrap();
        repo.add(&product_cosif("AB12", "10987654321")).await.unwrap();
        repo.add(&product_cosif("CD34", "12345678901")).await.unwrap();

        let err = repo
            .add(&product_cosif("AB12", "12345678901"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation_on("cosif_code"));

        let by_key = ProductCosifFilter::by_key("ab12", "12345678901");
        assert_eq!(repo.count(&by_key).await.unwrap(), 1);
        assert_eq!(
            repo.count(&ProductCosifFilter::by_product("AB12")).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_product_code_rename_cascades() {
        let db = database().await;
        let mut p = product("AB12");
        db.products().add(&p).await.unwrap();
        let cosif = product_cosif("AB12", "12345678901");
        db.product_cosifs().add(&cosif).await.unwrap();

        p.product_code = "ZZ99".to_string();
        assert!(db.products().update(&p).await.unwrap());

        let loaded = db
            .product_cosifs()
            .get_by_id(&cosif.base.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.product_code, "ZZ99");
    }

    #[tokio::test]
    async fn test_referenced_product_cannot_be_deleted() {
        let db = database().await;
        let p = product("AB12");
        db.products().add(&p).await.unwrap();
        db.product_cosifs()
            .add(&product_cosif("AB12", "12345678901"))
            .await
            .unwrap();

        let err = db.products().delete(&p.base.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
