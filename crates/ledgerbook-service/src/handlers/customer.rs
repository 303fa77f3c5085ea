//! Customer commands and queries.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerbook_core::filters::CustomerFilter;
use ledgerbook_core::validation::{validate_document_number, validate_uuid};
use ledgerbook_core::Customer;
use ledgerbook_db::{DbError, ReadRepository, WriteRepository};
use tracing::info;

use super::{ensure_written, load, CommandHandler, Repositories};
use crate::config::ServiceConfig;
use crate::dto::customer::{AddCustomerRequest, ChangeCustomerRequest, CustomerDto, CustomerQuery};
use crate::dto::{ensure_valid, RemoveRequest};
use crate::error::{ServiceError, ServiceResult};
use crate::response::{CommandResponse, PagedResult, QueryResponse};
use crate::specification::codes::{
    CUSTOMER_DOCUMENT_ALREADY_EXISTS, CUSTOMER_EMAIL_ALREADY_EXISTS, CUSTOMER_NOT_FOUND,
};
use crate::specification::customer::{
    document_must_be_unique, email_must_be_unique, must_exist, CustomerMustExistByDocument,
};
use crate::specification::{validate, validate_all, Specification};

#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn ReadRepository<Customer>>,
    writer: Arc<dyn WriteRepository<Customer>>,
    config: Arc<ServiceConfig>,
}

impl CustomerService {
    pub fn new(repositories: &Repositories, config: Arc<ServiceConfig>) -> Self {
        CustomerService {
            customers: repositories.customers.clone(),
            writer: repositories.customer_writer.clone(),
            config,
        }
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<QueryResponse<CustomerDto>> {
        validate_uuid(id)?;
        let customer = load(self.customers.as_ref(), CUSTOMER_NOT_FOUND, id).await?;
        Ok(QueryResponse::ok(customer.into()))
    }

    /// Looks a customer up by natural key.
    pub async fn get_by_document(
        &self,
        document_number: &str,
    ) -> ServiceResult<QueryResponse<CustomerDto>> {
        validate_document_number(document_number)?;
        let document_number = document_number.trim();

        validate(&CustomerMustExistByDocument::new(self.customers.clone()), document_number).await?;

        self.customers
            .find(&CustomerFilter::by_document(document_number))
            .await?
            .into_iter()
            .next()
            .map(|customer| QueryResponse::ok(customer.into()))
            .ok_or_else(|| ServiceError::not_found(CUSTOMER_NOT_FOUND, "Customer", document_number))
    }

    pub async fn find(
        &self,
        query: CustomerQuery,
    ) -> ServiceResult<QueryResponse<PagedResult<CustomerDto>>> {
        let request = query.paging.page_request(&self.config.paging)?;
        let page = self
            .customers
            .find_with_pagination(&query.filter(), &request)
            .await?;
        Ok(QueryResponse::page(PagedResult::from_page(page, &request)))
    }

    /// Email and document uniqueness, optionally ignoring one record.
    async fn check_unique(&self, customer: &Customer, excluding: Option<&str>) -> ServiceResult<()> {
        let mut email = email_must_be_unique(self.customers.clone());
        let mut document = document_must_be_unique(self.customers.clone());
        if let Some(id) = excluding {
            email = email.excluding(id);
            document = document.excluding(id);
        }

        let specs: [&dyn Specification<Customer>; 2] = [&email, &document];
        validate_all(&specs, customer).await?;
        Ok(())
    }

    fn write_error(err: DbError, customer: &Customer) -> ServiceError {
        if err.is_unique_violation_on("email") {
            return ServiceError::already_exists(
                CUSTOMER_EMAIL_ALREADY_EXISTS,
                "Customer",
                "email",
                &customer.email,
                None,
            );
        }
        if err.is_unique_violation_on("document_number") {
            return ServiceError::already_exists(
                CUSTOMER_DOCUMENT_ALREADY_EXISTS,
                "Customer",
                "documentNumber",
                &customer.document_number,
                None,
            );
        }
        err.into()
    }
}

#[async_trait]
impl CommandHandler<AddCustomerRequest> for CustomerService {
    type Output = CustomerDto;

    async fn handle(
        &self,
        request: AddCustomerRequest,
    ) -> ServiceResult<CommandResponse<CustomerDto>> {
        ensure_valid(&request)?;
        let customer = request.into_entity(&self.config.actor);

        self.check_unique(&customer, None).await?;

        let written = self
            .writer
            .add(&customer)
            .await
            .map_err(|e| Self::write_error(e, &customer))?;
        ensure_written(written, "Failed to add customer")?;

        info!(id = %customer.base.id, "Customer added");
        Ok(CommandResponse::created(customer.into(), "Customer added"))
    }
}

#[async_trait]
impl CommandHandler<ChangeCustomerRequest> for CustomerService {
    type Output = CustomerDto;

    async fn handle(
        &self,
        request: ChangeCustomerRequest,
    ) -> ServiceResult<CommandResponse<CustomerDto>> {
        ensure_valid(&request)?;
        validate(&must_exist(self.customers.clone()), request.id.as_str()).await?;

        let mut customer = load(self.customers.as_ref(), CUSTOMER_NOT_FOUND, &request.id).await?;
        request.apply_to(&mut customer, &self.config.actor);

        self.check_unique(&customer, Some(&customer.base.id)).await?;

        let written = self
            .writer
            .update(&customer)
            .await
            .map_err(|e| Self::write_error(e, &customer))?;
        ensure_written(written, "Failed to update customer")?;

        info!(id = %customer.base.id, "Customer updated");
        Ok(CommandResponse::ok(customer.into(), "Customer updated"))
    }
}

#[async_trait]
impl CommandHandler<RemoveRequest> for CustomerService {
    type Output = String;

    async fn handle(&self, request: RemoveRequest) -> ServiceResult<CommandResponse<String>> {
        ensure_valid(&request)?;
        validate(&must_exist(self.customers.clone()), request.id.as_str()).await?;

        let removed = self.writer.delete(&request.id).await?;
        ensure_written(removed, "Failed to remove customer")?;

        info!(id = %request.id, "Customer removed");
        Ok(CommandResponse::ok(request.id, "Customer removed"))
    }
}
