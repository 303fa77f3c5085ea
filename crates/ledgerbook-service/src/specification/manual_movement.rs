//! Manual movement rules.

use std::sync::Arc;

use ledgerbook_core::filters::ManualMovementFilter;
use ledgerbook_core::ManualMovement;
use ledgerbook_db::ReadRepository;

use super::codes::{MANUAL_MOVEMENT_ALREADY_EXISTS, MANUAL_MOVEMENT_NOT_FOUND};
use super::{MustBeUnique, MustExistById};

pub fn must_exist(
    manual_movements: Arc<dyn ReadRepository<ManualMovement>>,
) -> MustExistById<ManualMovement> {
    MustExistById::new(manual_movements, MANUAL_MOVEMENT_NOT_FOUND)
}

/// `(month, year, launch_number, product_code, cosif_code)` must be free.
pub fn natural_key_must_be_unique(
    manual_movements: Arc<dyn ReadRepository<ManualMovement>>,
) -> MustBeUnique<ManualMovement> {
    MustBeUnique::new(
        manual_movements,
        MANUAL_MOVEMENT_ALREADY_EXISTS,
        "launchNumber",
        ManualMovementFilter::by_natural_key,
        natural_key,
    )
}

/// `06/2024 #3 AB12/12345678901`
pub fn natural_key(m: &ManualMovement) -> String {
    format!(
        "{:02}/{} #{} {}/{}",
        m.month, m.year, m.launch_number, m.product_code, m.cosif_code
    )
}
