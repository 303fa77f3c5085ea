//! Customer rules.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerbook_core::filters::CustomerFilter;
use ledgerbook_core::Customer;
use ledgerbook_db::ReadRepository;

use super::codes::{CUSTOMER_DOCUMENT_ALREADY_EXISTS, CUSTOMER_EMAIL_ALREADY_EXISTS, CUSTOMER_NOT_FOUND};
use super::{MustBeUnique, MustExistById, Specification};
use crate::error::{ServiceError, ServiceResult};

pub fn must_exist(customers: Arc<dyn ReadRepository<Customer>>) -> MustExistById<Customer> {
    MustExistById::new(customers, CUSTOMER_NOT_FOUND)
}

pub fn email_must_be_unique(customers: Arc<dyn ReadRepository<Customer>>) -> MustBeUnique<Customer> {
    MustBeUnique::new(
        customers,
        CUSTOMER_EMAIL_ALREADY_EXISTS,
        "email",
        |c| CustomerFilter::by_email(&c.email),
        |c| c.email.clone(),
    )
}

pub fn document_must_be_unique(
    customers: Arc<dyn ReadRepository<Customer>>,
) -> MustBeUnique<Customer> {
    MustBeUnique::new(
        customers,
        CUSTOMER_DOCUMENT_ALREADY_EXISTS,
        "documentNumber",
        |c| CustomerFilter::by_document(&c.document_number),
        |c| c.document_number.clone(),
    )
}

/// A customer with the candidate document number must exist. Throwing style.
pub struct CustomerMustExistByDocument {
    customers: Arc<dyn ReadRepository<Customer>>,
}

impl CustomerMustExistByDocument {
    pub fn new(customers: Arc<dyn ReadRepository<Customer>>) -> Self {
        CustomerMustExistByDocument { customers }
    }
}

#[async_trait]
impl Specification<str> for CustomerMustExistByDocument {
    async fn is_satisfied_by(&self, document_number: &str) -> ServiceResult<bool> {
        let found = self
            .customers
            .count(&CustomerFilter::by_document(document_number))
            .await?;

        if found == 0 {
            return Err(self.violation(document_number));
        }
        Ok(true)
    }

    fn violation(&self, document_number: &str) -> ServiceError {
        ServiceError::not_found(CUSTOMER_NOT_FOUND, "Customer", document_number)
    }
}
