//! In-memory repositories and fixtures for handler tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use ledgerbook_core::query::paginate;
use ledgerbook_core::{
    Address, Customer, Entity, EntityBase, Filterable, ManualMovement, Page, PageRequest, Predicate,
    Product, ProductCosif,
};
use ledgerbook_db::{DbError, DbResult, LaunchNumberSource, ReadRepository, WriteRepository};
use ledgerbook_service::{Ledgerbook, Repositories, ServiceConfig};

/// Vec-backed repository that counts every call.
pub struct InMemoryRepository<E> {
    items: Mutex<Vec<E>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    reject_writes: AtomicBool,
}

impl<E: Filterable> InMemoryRepository<E> {
    pub fn new() -> Self {
        InMemoryRepository {
            items: Mutex::new(Vec::new()),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            reject_writes: AtomicBool::new(false),
        }
    }

    /// Inserts without touching the counters.
    pub fn seed(&self, entity: E) {
        self.items.lock().unwrap().push(entity);
    }

    pub fn all(&self) -> Vec<E> {
        self.items.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes every write report that nothing was written.
    pub fn reject_writes(&self) {
        self.reject_writes.store(true, Ordering::SeqCst);
    }

    fn read(&self) -> Vec<E> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.all()
    }

    fn write(&self) -> bool {
        self.writes.fetch_add(1, Ordering::SeqCst);
        !self.reject_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<E: Filterable> ReadRepository<E> for InMemoryRepository<E> {
    async fn get_by_id(&self, id: &str) -> DbResult<Option<E>> {
        Ok(self.read().into_iter().find(|e| e.id() == id))
    }

    async fn find(&self, filter: &E::Filter) -> DbResult<Vec<E>> {
        Ok(self.read().into_iter().filter(|e| filter.matches(e)).collect())
    }

    async fn count(&self, filter: &E::Filter) -> DbResult<u64> {
        Ok(self.read().iter().filter(|e| filter.matches(e)).count() as u64)
    }

    async fn find_with_pagination(
        &self,
        filter: &E::Filter,
        request: &PageRequest,
    ) -> DbResult<Page<E>> {
        paginate(self.read(), |e| filter.matches(e), request).map_err(DbError::from)
    }
}

#[async_trait]
impl<E: Filterable> WriteRepository<E> for InMemoryRepository<E> {
    async fn add(&self, entity: &E) -> DbResult<bool> {
        if !self.write() {
            return Ok(false);
        }
        self.items.lock().unwrap().push(entity.clone());
        Ok(true)
    }

    async fn update(&self, entity: &E) -> DbResult<bool> {
        if !self.write() {
            return Ok(false);
        }
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|e| e.id() == entity.id()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> DbResult<bool> {
        if !self.write() {
            return Ok(false);
        }
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|e| e.id() != id);
        Ok(items.len() < before)
    }
}

#[async_trait]
impl LaunchNumberSource for InMemoryRepository<ManualMovement> {
    async fn next_launch_number(&self, month: u32, year: u32) -> DbResult<u32> {
        let highest = self
            .read()
            .iter()
            .filter(|m| m.month == month && m.year == year)
            .map(|m| m.launch_number)
            .max()
            .unwrap_or(0);
        Ok(highest + 1)
    }
}

/// A `Ledgerbook` plus direct handles on its repositories.
pub struct Fixture {
    pub ledger: Ledgerbook,
    pub customers: Arc<InMemoryRepository<Customer>>,
    pub products: Arc<InMemoryRepository<Product>>,
    pub product_cosifs: Arc<InMemoryRepository<ProductCosif>>,
    pub manual_movements: Arc<InMemoryRepository<ManualMovement>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        let customers = Arc::new(InMemoryRepository::<Customer>::new());
        let products = Arc::new(InMemoryRepository::<Product>::new());
        let product_cosifs = Arc::new(InMemoryRepository::<ProductCosif>::new());
        let manual_movements = Arc::new(InMemoryRepository::<ManualMovement>::new());

        let repositories = Repositories {
            customers: customers.clone(),
            customer_writer: customers.clone(),
            products: products.clone(),
            product_writer: products.clone(),
            product_cosifs: product_cosifs.clone(),
            product_cosif_writer: product_cosifs.clone(),
            manual_movements: manual_movements.clone(),
            manual_movement_writer: manual_movements.clone(),
            launch_numbers: manual_movements.clone(),
        };

        Fixture {
            ledger: Ledgerbook::new(repositories, config),
            customers,
            products,
            product_cosifs,
            manual_movements,
        }
    }

    pub fn total_reads(&self) -> usize {
        self.customers.reads()
            + self.products.reads()
            + self.product_cosifs.reads()
            + self.manual_movements.reads()
    }

    pub fn total_writes(&self) -> usize {
        self.customers.writes()
            + self.products.writes()
            + self.product_cosifs.writes()
            + self.manual_movements.writes()
    }
}

// =============================================================================
// Entity Builders
// =============================================================================

/// Base whose `created_at` is `offset` seconds in the past.
pub fn base(offset: i64) -> EntityBase {
    let mut base = EntityBase::new("test");
    base.created_at = Utc::now() - Duration::seconds(offset);
    base
}

pub fn product(code: &str) -> Product {
    Product {
        base: base(0),
        product_code: code.to_string(),
        description: format!("Product {code}"),
    }
}

pub fn product_cosif(product_code: &str, cosif_code: &str) -> ProductCosif {
    ProductCosif {
        base: base(0),
        product_code: product_code.to_string(),
        cosif_code: cosif_code.to_string(),
        classification_code: "ATV".to_string(),
    }
}

pub fn movement(month: u32, year: u32, launch_number: u32, cosif: &ProductCosif) -> ManualMovement {
    ManualMovement {
        base: base(0),
        month,
        year,
        launch_number,
        product_code: cosif.product_code.clone(),
        cosif_code: cosif.cosif_code.clone(),
        description: "Adjustment".to_string(),
        value_cents: 1_000,
    }
}

pub fn customer(name: &str, email: &str, document: &str) -> Customer {
    Customer {
        base: base(0),
        name: name.to_string(),
        email: email.to_string(),
        document_number: document.to_string(),
        phone: None,
        address: Address {
            street: "Rua A".to_string(),
            number: "10".to_string(),
            complement: None,
            neighborhood: "Centro".to_string(),
            city: "Recife".to_string(),
            state: "PE".to_string(),
            zip_code: "50000000".to_string(),
        },
    }
}
