//! # Customer Repository
//!
//! Database operations for customers and their one-to-one address.
//!
//! ## Storage
//! ```text
//! ┌─────────────────────────┐        ┌──────────────────────────────┐
//! │ customers               │ 1    1 │ addresses                    │
//! │ id, email (uniq),       │◄───────│ customer_id (PK, FK CASCADE) │
//! │ document_number (uniq)  │        │ street, number, ... zip_code │
//! └─────────────────────────┘        └──────────────────────────────┘
//! ```
//! Reads join the two tables; writes touch both inside one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledgerbook_core::filters::CustomerFilter;
use ledgerbook_core::{Address, Customer, EntityBase, EntityStatus, Page, PageRequest};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::paging::{self, SqlEntity};
use super::{ReadRepository, WriteRepository};
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
pub struct CustomerRow {
    id: String,
    status: EntityStatus,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
    name: String,
    email: String,
    document_number: String,
    phone: Option<String>,
    street: String,
    number: String,
    complement: Option<String>,
    neighborhood: String,
    city: String,
    state: String,
    zip_code: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            base: EntityBase {
                id: row.id,
                status: row.status,
                created_at: row.created_at,
                created_by: row.created_by,
                updated_at: row.updated_at,
                updated_by: row.updated_by,
            },
            name: row.name,
            email: row.email,
            document_number: row.document_number,
            phone: row.phone,
            address: Address {
                street: row.street,
                number: row.number,
                complement: row.complement,
                neighborhood: row.neighborhood,
                city: row.city,
                state: row.state,
                zip_code: row.zip_code,
            },
        }
    }
}

impl SqlEntity for Customer {
    type Row = CustomerRow;

    const SELECT: &'static str = "SELECT id, status, created_at, created_by, updated_at, \
         updated_by, name, email, document_number, phone, street, number, complement, \
         neighborhood, city, state, zip_code \
         FROM customers JOIN addresses ON addresses.customer_id = customers.id";

    const COUNT: &'static str = "SELECT COUNT(*) FROM customers";

    fn push_filter(filter: &CustomerFilter, query: &mut QueryBuilder<'_, Sqlite>) {
        paging::push_text(query, "name", &filter.name);
        paging::push_text(query, "email", &filter.email);
        paging::push_text(query, "document_number", &filter.document_number);
        paging::push_status(query, "status", filter.status);
    }
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }
}

#[async_trait]
impl ReadRepository<Customer> for CustomerRepository {
    async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        paging::fetch_by_id(&self.pool, id).await
    }

    async fn find(&self, filter: &CustomerFilter) -> DbResult<Vec<Customer>> {
        paging::fetch_all(&self.pool, filter).await
    }

    async fn count(&self, filter: &CustomerFilter) -> DbResult<u64> {
        paging::count::<Customer>(&self.pool, filter).await
    }

    async fn find_with_pagination(
        &self,
        filter: &CustomerFilter,
        request: &PageRequest,
    ) -> DbResult<Page<Customer>> {
        paging::fetch_page(&self.pool, filter, request).await
    }
}

#[async_trait]
impl WriteRepository<Customer> for CustomerRepository {
    /// Inserts the customer and its address atomically.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - email or document already taken
    async fn add(&self, customer: &Customer) -> DbResult<bool> {
        debug!(id = %customer.base.id, "Inserting customer");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO customers (
                id, status, created_at, created_by, updated_at, updated_by,
                name, email, document_number, phone
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&customer.base.id)
        .bind(customer.base.status)
        .bind(customer.base.created_at)
        .bind(&customer.base.created_by)
        .bind(customer.base.updated_at)
        .bind(&customer.base.updated_by)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.document_number)
        .bind(&customer.phone)
        .execute(&mut *tx)
        .await?;

        let address = &customer.address;
        sqlx::query(
            r#"
            INSERT INTO addresses (
                customer_id, street, number, complement, neighborhood, city, state, zip_code
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&customer.base.id)
        .bind(&address.street)
        .bind(&address.number)
        .bind(&address.complement)
        .bind(&address.neighborhood)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(inserted.rows_affected() == 1)
    }

    /// Updates the customer row and replaces its address.
    async fn update(&self, customer: &Customer) -> DbResult<bool> {
        debug!(id = %customer.base.id, "Updating customer");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let updated = sqlx::query(
            r#"
            UPDATE customers SET
                status = ?2,
                updated_at = ?3,
                updated_by = ?4,
                name = ?5,
                email = ?6,
                document_number = ?7,
                phone = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&customer.base.id)
        .bind(customer.base.status)
        .bind(customer.base.updated_at)
        .bind(&customer.base.updated_by)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.document_number)
        .bind(&customer.phone)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Ok(false);
        }

        let address = &customer.address;
        sqlx::query(
            r#"
            INSERT INTO addresses (
                customer_id, street, number, complement, neighborhood, city, state, zip_code
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (customer_id) DO UPDATE SET
                street = excluded.street,
                number = excluded.number,
                complement = excluded.complement,
                neighborhood = excluded.neighborhood,
                city = excluded.city,
                state = excluded.state,
                zip_code = excluded.zip_code
            "#,
        )
        .bind(&customer.base.id)
        .bind(&address.street)
        .bind(&address.number)
        .bind(&address.complement)
        .bind(&address.neighborhood)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(true)
    }

    /// Hard delete; the address goes with it (ON DELETE CASCADE).
    async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
