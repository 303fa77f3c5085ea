//! Customer requests and DTO.

use chrono::{DateTime, Utc};
use ledgerbook_core::filters::{normalize_email, CustomerFilter};
use ledgerbook_core::validation::{
    validate_document_number, validate_email, validate_phone, validate_state, validate_text,
    validate_uuid, validate_zip_code, Validate, Validator,
};
use ledgerbook_core::{Address, Customer, EntityBase, EntityStatus, ValidationError};
use serde::{Deserialize, Serialize};

use super::{trimmed, Paging};

/// Address as sent by callers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl AddressInput {
    fn check(&self, validator: Validator) -> Validator {
        validator
            .check(validate_text("street", &self.street, 150))
            .check(validate_text("number", &self.number, 10))
            .check_optional(trimmed(&self.complement), |c| {
                validate_text("complement", &c, 100)
            })
            .check(validate_text("neighborhood", &self.neighborhood, 100))
            .check(validate_text("city", &self.city, 100))
            .check(validate_state(&self.state))
            .check(validate_zip_code(&self.zip_code))
    }

    fn into_address(self) -> Address {
        Address {
            street: self.street.trim().to_string(),
            number: self.number.trim().to_string(),
            complement: trimmed(&self.complement),
            neighborhood: self.neighborhood.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_ascii_uppercase(),
            zip_code: self.zip_code.trim().to_string(),
        }
    }
}

fn check_customer(
    name: &str,
    email: &str,
    document_number: &str,
    phone: &Option<String>,
    address: &AddressInput,
) -> Validator {
    let validator = Validator::new()
        .check(validate_text("name", name, 150))
        .check(validate_email(email))
        .check(validate_document_number(document_number))
        .check_optional(trimmed(phone), |p| validate_phone(&p));
    address.check(validator)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCustomerRequest {
    pub name: String,
    pub email: String,
    pub document_number: String,
    pub phone: Option<String>,
    pub address: AddressInput,
}

impl Validate for AddCustomerRequest {
    fn validate(&self) -> Vec<ValidationError> {
        check_customer(
            &self.name,
            &self.email,
            &self.document_number,
            &self.phone,
            &self.address,
        )
        .finish()
    }
}

impl AddCustomerRequest {
    pub fn into_entity(self, actor: &str) -> Customer {
        Customer {
            base: EntityBase::new(actor),
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            document_number: self.document_number.trim().to_string(),
            phone: trimmed(&self.phone),
            address: self.address.into_address(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCustomerRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub document_number: String,
    pub phone: Option<String>,
    pub address: AddressInput,
    pub status: Option<EntityStatus>,
}

impl Validate for ChangeCustomerRequest {
    fn validate(&self) -> Vec<ValidationError> {
        check_customer(
            &self.name,
            &self.email,
            &self.document_number,
            &self.phone,
            &self.address,
        )
        .check(validate_uuid(&self.id))
        .finish()
    }
}

impl ChangeCustomerRequest {
    pub fn apply_to(self, customer: &mut Customer, actor: &str) {
        customer.name = self.name.trim().to_string();
        customer.email = normalize_email(&self.email);
        customer.document_number = self.document_number.trim().to_string();
        customer.phone = trimmed(&self.phone);
        customer.address = self.address.into_address();
        if let Some(status) = self.status {
            customer.base.status = status;
        }
        customer.base.touch(actor);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    #[serde(flatten)]
    pub paging: Paging,
    pub name: Option<String>,
    pub email: Option<String>,
    pub document_number: Option<String>,
    pub status: Option<EntityStatus>,
}

impl CustomerQuery {
    pub fn filter(&self) -> CustomerFilter {
        CustomerFilter {
            name: trimmed(&self.name),
            email: trimmed(&self.email).map(|e| normalize_email(&e)),
            document_number: trimmed(&self.document_number),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub document_number: String,
    pub phone: Option<String>,
    pub address: Address,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        CustomerDto {
            id: c.base.id,
            name: c.name,
            email: c.email,
            document_number: c.document_number,
            phone: c.phone,
            address: c.address,
            status: c.base.status,
            created_at: c.base.created_at,
            created_by: c.base.created_by,
            updated_at: c.base.updated_at,
            updated_by: c.base.updated_by,
        }
    }
}
