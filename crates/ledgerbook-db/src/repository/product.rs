//! # Product Repository
//!
//! Database operations for products.
//!
//! `product_code` is unique (`ux_products_code`) and is the key
//! classifications reference, so renaming a code cascades to
//! `product_cosifs` and, through them, to `manual_movements`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledgerbook_core::filters::ProductFilter;
use ledgerbook_core::{EntityBase, EntityStatus, Page, PageRequest, Product};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::paging::{self, SqlEntity};
use super::{ReadRepository, WriteRepository};
use crate::error::DbResult;

#[derive(Debug, sqlx::FromRow)]
pub struct ProductRow {
    id: String,
    status: EntityStatus,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
    product_code: String,
    description: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            base: EntityBase {
                id: row.id,
                status: row.status,
                created_at: row.created_at,
                created_by: row.created_by,
                updated_at: row.updated_at,
                updated_by: row.updated_by,
            },
            product_code: row.product_code,
            description: row.description,
        }
    }
}

impl SqlEntity for Product {
    type Row = ProductRow;

    const SELECT: &'static str = "SELECT id, status, created_at, created_by, updated_at, \
         updated_by, product_code, description FROM products";

    const COUNT: &'static str = "SELECT COUNT(*) FROM products";

    fn push_filter(filter: &ProductFilter, query: &mut QueryBuilder<'_, Sqlite>) {
        paging::push_text(query, "product_code", &filter.product_code);
        paging::push_text(query, "description", &filter.description);
        paging::push_status(query, "status", filter.status);
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }
}

#[async_trait]
impl ReadRepository<Product> for ProductRepository {
    async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        paging::fetch_by_id(&self.pool, id).await
    }

    async fn find(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        paging::fetch_all(&self.pool, filter).await
    }

    async fn count(&self, filter: &ProductFilter) -> DbResult<u64> {
        paging::count::<Product>(&self.pool, filter).await
    }

    async fn find_with_pagination(
        &self,
        filter: &ProductFilter,
        request: &PageRequest,
    ) -> DbResult<Page<Product>> {
        paging::fetch_page(&self.pool, filter, request).await
    }
}

#[async_trait]
impl WriteRepository<Product> for ProductRepository {
    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - code already exists
    async fn add(&self, product: &Product) -> DbResult<bool> {
        debug!(code = %product.product_code, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                id, status, created_at, created_by, updated_at, updated_by,
                product_code, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.base.id)
        .bind(product.base.status)
        .bind(product.base.created_at)
        .bind(&product.base.created_by)
        .bind(product.base.updated_at)
        .bind(&product.base.updated_by)
        .bind(&product.product_code)
        .bind(&product.description)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, product: &Product) -> DbResult<bool> {
        debug!(id = %product.base.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                status = ?2,
                updated_at = ?3,
                updated_by = ?4,
                product_code = ?5,
                description = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&product.base.id)
        .bind(product.base.status)
        .bind(product.base.updated_at)
        .bind(&product.base.updated_by)
        .bind(&product.product_code)
        .bind(&product.description)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Hard delete. Fails with `ForeignKeyViolation` while classifications
    /// still reference the code.
    async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{base, database, product};
    use ledgerbook_core::{CoreError, SortOrder};

    async fn seeded(codes: &[&str]) -> ProductRepository {
        let repo = database().await.products();
        for (i, code) in codes.iter().enumerate() {
            let mut p = product(code);
            p.base = base(i as i64);
            assert!(repo.add(&p).await.unwrap());
        }
        repo
    }

    #[tokio::test]
    async fn test_add_and_get_by_id() {
        let repo = database().await.products();
        let p = product("AB12");

        assert!(repo.add(&p).await.unwrap());

        let loaded = repo.get_by_id(&p.base.id).await.unwrap().unwrap();
        assert_eq!(loaded.product_code, "AB12");
        assert_eq!(loaded.base.status, EntityStatus::Active);
        assert_eq!(loaded.base.created_by, "test");
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_is_unique_violation() {
        let repo = seeded(&["AB12"]).await;

        let err = repo.add(&product("AB12")).await.unwrap_err();
        assert!(err.is_unique_violation_on("product_code"), "{err:?}");
    }

    #[tokio::test]
    async fn test_update_and_delete_report_affected_rows() {
        let repo = database().await.products();
        let mut p = product("AB12");
        repo.add(&p).await.unwrap();

        p.description = "Renamed".to_string();
        p.base.touch("editor");
        assert!(repo.update(&p).await.unwrap());
        let loaded = repo.get_by_id(&p.base.id).await.unwrap().unwrap();
        assert_eq!(loaded.description, "Renamed");
        assert_eq!(loaded.base.updated_by.as_deref(), Some("editor"));

        assert!(repo.delete(&p.base.id).await.unwrap());
        assert!(!repo.delete(&p.base.id).await.unwrap());
        assert!(!repo.update(&p).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_applies_filter_clauses() {
        let repo = seeded(&["CCCC", "AAAA", "BBBB"]).await;

        let all = repo.find(&ProductFilter::default()).await.unwrap();
        let codes: Vec<_> = all.iter().map(|p| p.product_code.as_str()).collect();
        assert_eq!(codes, ["AAAA", "BBBB", "CCCC"]);

        let one = repo.find(&ProductFilter::by_code("bbbb")).await.unwrap();
        assert_eq!(one.len(), 1);

        let blank = ProductFilter {
            description: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.count(&blank).await.unwrap(), 3);

        let inactive = ProductFilter {
            status: Some(EntityStatus::Inactive),
            ..Default::default()
        };
        assert_eq!(repo.count(&inactive).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_pagination_invariant() {
        let codes: Vec<String> = (0..7).map(|i| format!("P{:03}", i)).collect();
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let repo = seeded(&refs).await;

        let mut seen = Vec::new();
        for page in 1..=3 {
            let request = PageRequest::new(page, 3).unwrap();
            let result = repo
                .find_with_pagination(&ProductFilter::default(), &request)
                .await
                .unwrap();
            assert_eq!(result.total_count, 7);
            assert_eq!(result.total_pages(3), 3);
            seen.extend(result.items.into_iter().map(|p| p.product_code));
        }
        assert_eq!(seen, codes);

        let beyond = PageRequest::new(4, 3).unwrap();
        let result = repo
            .find_with_pagination(&ProductFilter::default(), &beyond)
            .await
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_count, 7);
    }

    #[tokio::test]
    async fn test_descending_is_reverse_of_ascending() {
        let repo = seeded(&["AAAA", "BBBB", "CCCC", "DDDD"]).await;
        let filter = ProductFilter::default();

        let asc = PageRequest::new(1, 10).unwrap().sort_by(Some("CreatedAt"));
        let desc = asc.clone().order(SortOrder::Desc);

        let mut up: Vec<_> = repo
            .find_with_pagination(&filter, &asc)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|p| p.base.id)
            .collect();
        let down: Vec<_> = repo
            .find_with_pagination(&filter, &desc)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|p| p.base.id)
            .collect();

        up.reverse();
        assert_eq!(up, down);
    }

    #[tokio::test]
    async fn test_empty_result_and_unknown_field() {
        let repo = seeded(&["AAAA"]).await;

        let page = repo
            .find_with_pagination(&ProductFilter::by_code("ZZZZ"), &PageRequest::new(1, 5).unwrap())
            .await
            .unwrap();
        assert_eq!(page, Page::empty());

        let bad = PageRequest::new(1, 5).unwrap().sort_by(Some("price"));
        let err = repo
            .find_with_pagination(&ProductFilter::default(), &bad)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Query(CoreError::UnknownSortField { .. })
        ));
    }
}
