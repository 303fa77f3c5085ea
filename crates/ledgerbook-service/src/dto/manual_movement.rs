//! Manual movement requests and DTO.
//!
//! Callers never send a launch number on Add; the handler allocates it.

use chrono::{DateTime, Utc};
use ledgerbook_core::filters::{normalize_code, ManualMovementFilter};
use ledgerbook_core::validation::{
    validate_cosif_code, validate_month, validate_product_code, validate_text, validate_uuid,
    validate_value_cents, validate_year, Validate, Validator,
};
use ledgerbook_core::{EntityBase, EntityStatus, ManualMovement, ValidationError};
use serde::{Deserialize, Serialize};

use super::{trimmed, Paging};

fn check_movement(
    month: u32,
    year: u32,
    product_code: &str,
    cosif_code: &str,
    description: &str,
    value_cents: i64,
) -> Validator {
    Validator::new()
        .check(validate_month(month))
        .check(validate_year(year))
        .check(validate_product_code(product_code))
        .check(validate_cosif_code(cosif_code))
        .check(validate_text("description", description, 200))
        .check(validate_value_cents(value_cents))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddManualMovementRequest {
    pub month: u32,
    pub year: u32,
    pub product_code: String,
    pub cosif_code: String,
    pub description: String,
    pub value_cents: i64,
}

impl Validate for AddManualMovementRequest {
    fn validate(&self) -> Vec<ValidationError> {
        check_movement(
            self.month,
            self.year,
            &self.product_code,
            &self.cosif_code,
            &self.description,
            self.value_cents,
        )
        .finish()
    }
}

impl AddManualMovementRequest {
    /// `(product_code, cosif_code)`, normalized.
    pub fn cosif_key(&self) -> (String, String) {
        (
            normalize_code(&self.product_code),
            self.cosif_code.trim().to_string(),
        )
    }

    pub fn into_entity(self, launch_number: u32, actor: &str) -> ManualMovement {
        let (product_code, cosif_code) = self.cosif_key();
        ManualMovement {
            base: EntityBase::new(actor),
            month: self.month,
            year: self.year,
            launch_number,
            product_code,
            cosif_code,
            description: self.description.trim().to_string(),
            value_cents: self.value_cents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeManualMovementRequest {
    pub id: String,
    pub month: u32,
    pub year: u32,
    pub product_code: String,
    pub cosif_code: String,
    pub description: String,
    pub value_cents: i64,
    pub status: Option<EntityStatus>,
}

impl Validate for ChangeManualMovementRequest {
    fn validate(&self) -> Vec<ValidationError> {
        check_movement(
            self.month,
            self.year,
            &self.product_code,
            &self.cosif_code,
            &self.description,
            self.value_cents,
        )
        .check(validate_uuid(&self.id))
        .finish()
    }
}

impl ChangeManualMovementRequest {
    pub fn cosif_key(&self) -> (String, String) {
        (
            normalize_code(&self.product_code),
            self.cosif_code.trim().to_string(),
        )
    }

    /// Whether the movement moves to another `(month, year)`.
    pub fn changes_period(&self, movement: &ManualMovement) -> bool {
        self.month != movement.month || self.year != movement.year
    }

    pub fn apply_to(self, movement: &mut ManualMovement, launch_number: u32, actor: &str) {
        let (product_code, cosif_code) = self.cosif_key();
        movement.month = self.month;
        movement.year = self.year;
        movement.launch_number = launch_number;
        movement.product_code = product_code;
        movement.cosif_code = cosif_code;
        movement.description = self.description.trim().to_string();
        movement.value_cents = self.value_cents;
        if let Some(status) = self.status {
            movement.base.status = status;
        }
        movement.base.touch(actor);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualMovementQuery {
    #[serde(flatten)]
    pub paging: Paging,
    pub month: Option<u32>,
    pub year: Option<u32>,
    pub launch_number: Option<u32>,
    pub product_code: Option<String>,
    pub cosif_code: Option<String>,
    pub status: Option<EntityStatus>,
}

impl ManualMovementQuery {
    pub fn filter(&self) -> ManualMovementFilter {
        ManualMovementFilter {
            month: self.month,
            year: self.year,
            launch_number: self.launch_number,
            product_code: trimmed(&self.product_code).map(|c| normalize_code(&c)),
            cosif_code: trimmed(&self.cosif_code),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualMovementDto {
    pub id: String,
    pub month: u32,
    pub year: u32,
    pub launch_number: u32,
    pub product_code: String,
    pub cosif_code: String,
    pub description: String,
    pub value_cents: i64,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl From<ManualMovement> for ManualMovementDto {
    fn from(m: ManualMovement) -> Self {
        ManualMovementDto {
            id: m.base.id,
            month: m.month,
            year: m.year,
            launch_number: m.launch_number,
            product_code: m.product_code,
            cosif_code: m.cosif_code,
            description: m.description,
            value_cents: m.value_cents,
            status: m.base.status,
            created_at: m.base.created_at,
            created_by: m.base.created_by,
            updated_at: m.base.updated_at,
            updated_by: m.base.updated_by,
        }
    }
}
