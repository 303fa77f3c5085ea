//! Manual movement handlers: reference checks and launch-number allocation.

mod support;

use ledgerbook_core::generate_id;
use ledgerbook_service::dto::manual_movement::{
    AddManualMovementRequest, ChangeManualMovementRequest,
};
use ledgerbook_service::dto::RemoveRequest;
use ledgerbook_service::{CommandHandler, ServiceError};
use support::{movement, product, product_cosif, Fixture};

const COSIF: &str = "11110000001";

fn add_movement(month: u32, year: u32, product_code: &str) -> AddManualMovementRequest {
    AddManualMovementRequest {
        month,
        year,
        product_code: product_code.to_string(),
        cosif_code: COSIF.to_string(),
        description: "Monthly adjustment".to_string(),
        value_cents: 12_500,
    }
}

fn change_movement(id: &str, month: u32, year: u32) -> ChangeManualMovementRequest {
    ChangeManualMovementRequest {
        id: id.to_string(),
        month,
        year,
        product_code: "AB12".to_string(),
        cosif_code: COSIF.to_string(),
        description: "Corrected adjustment".to_string(),
        value_cents: 9_900,
        status: None,
    }
}

/// Fixture with product AB12 and its classification already stored.
fn ledger_with_references() -> Fixture {
    let fx = Fixture::new();
    fx.products.seed(product("AB12"));
    fx.product_cosifs.seed(product_cosif("AB12", COSIF));
    fx
}

#[tokio::test]
async fn test_unknown_product_stops_everything() {
    let fx = Fixture::new();

    let err = fx
        .ledger
        .manual_movements
        .handle(add_movement(6, 2024, "ZZZZ"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "PRODUCT_NOT_FOUND");
    assert_eq!(err.status_code(), 404);
    // Neither the classification lookup nor launch-number allocation ran.
    assert_eq!(fx.product_cosifs.reads(), 0);
    assert_eq!(fx.manual_movements.reads(), 0);
    assert_eq!(fx.total_writes(), 0);
}

#[tokio::test]
async fn test_unknown_classification_is_not_found() {
    let fx = Fixture::new();
    fx.products.seed(product("AB12"));

    let err = fx
        .ledger
        .manual_movements
        .handle(add_movement(6, 2024, "AB12"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "PRODUCT_COSIF_NOT_FOUND");
    match err {
        ServiceError::NotFound { key, .. } => assert_eq!(key, "AB12/11110000001"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fx.manual_movements.writes(), 0);
}

#[tokio::test]
async fn test_first_movement_of_a_period_gets_launch_number_one() {
    let fx = ledger_with_references();

    let response = fx
        .ledger
        .manual_movements
        .handle(add_movement(6, 2024, "ab12"))
        .await
        .unwrap();

    assert_eq!(response.status_code, 201);
    assert_eq!(response.data.launch_number, 1);
    assert_eq!(response.data.product_code, "AB12");
    assert_eq!(fx.manual_movements.len(), 1);
}

#[tokio::test]
async fn test_launch_number_follows_highest_in_period() {
    let fx = ledger_with_references();
    let cosif = product_cosif("AB12", COSIF);
    for n in 1..=3 {
        fx.manual_movements.seed(movement(6, 2024, n, &cosif));
    }
    fx.manual_movements.seed(movement(7, 2024, 9, &cosif));
    fx.manual_movements.seed(movement(6, 2023, 9, &cosif));

    let response = fx
        .ledger
        .manual_movements
        .handle(add_movement(6, 2024, "AB12"))
        .await
        .unwrap();

    assert_eq!(response.data.launch_number, 4);
}

#[tokio::test]
async fn test_change_within_period_keeps_launch_number() {
    let fx = ledger_with_references();
    let cosif = product_cosif("AB12", COSIF);
    let existing = movement(6, 2024, 2, &cosif);
    fx.manual_movements.seed(movement(6, 2024, 1, &cosif));
    fx.manual_movements.seed(existing.clone());
    fx.manual_movements.seed(movement(6, 2024, 3, &cosif));

    let response = fx
        .ledger
        .manual_movements
        .handle(change_movement(&existing.base.id, 6, 2024))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.data.launch_number, 2);
    assert_eq!(response.data.value_cents, 9_900);
    assert_eq!(response.data.description, "Corrected adjustment");
}

#[tokio::test]
async fn test_change_to_another_period_reallocates_launch_number() {
    let fx = ledger_with_references();
    let cosif = product_cosif("AB12", COSIF);
    let existing = movement(6, 2024, 1, &cosif);
    fx.manual_movements.seed(existing.clone());
    fx.manual_movements.seed(movement(7, 2024, 5, &cosif));

    let response = fx
        .ledger
        .manual_movements
        .handle(change_movement(&existing.base.id, 7, 2024))
        .await
        .unwrap();

    assert_eq!(response.data.month, 7);
    assert_eq!(response.data.launch_number, 6);

    let stored = fx
        .manual_movements
        .all()
        .into_iter()
        .find(|m| m.base.id == existing.base.id)
        .unwrap();
    assert_eq!((stored.month, stored.launch_number), (7, 6));
}

#[tokio::test]
async fn test_change_unknown_movement_is_not_found() {
    let fx = ledger_with_references();

    let err = fx
        .ledger
        .manual_movements
        .handle(change_movement(&generate_id(), 6, 2024))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "MANUAL_MOVEMENT_NOT_FOUND");
    assert_eq!(fx.total_writes(), 0);
}

#[tokio::test]
async fn test_invalid_movement_never_reaches_repositories() {
    let fx = ledger_with_references();
    let mut request = add_movement(13, 2024, "AB12");
    request.value_cents = 0;

    let err = fx
        .ledger
        .manual_movements
        .handle(request)
        .await
        .unwrap_err();

    match &err {
        ServiceError::ValidationFailed(errors) => assert_eq!(errors.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status_code(), 400);
    assert_eq!(fx.total_reads(), 0);
}

#[tokio::test]
async fn test_remove_movement() {
    let fx = ledger_with_references();
    let existing = movement(6, 2024, 1, &product_cosif("AB12", COSIF));
    fx.manual_movements.seed(existing.clone());

    let response = fx
        .ledger
        .manual_movements
        .handle(RemoveRequest::new(&existing.base.id))
        .await
        .unwrap();

    assert_eq!(response.message, "Manual movement removed");
    assert_eq!(fx.manual_movements.len(), 0);
}
