//! Product and product-cosif handlers over in-memory repositories.

mod support;

use ledgerbook_core::generate_id;
use ledgerbook_service::dto::product::{AddProductRequest, ChangeProductRequest};
use ledgerbook_service::dto::product_cosif::{AddProductCosifRequest, ChangeProductCosifRequest};
use ledgerbook_service::dto::RemoveRequest;
use ledgerbook_service::{CommandHandler, ErrorKind, ServiceError};
use support::{movement, product, product_cosif, Fixture};

fn add_product(code: &str) -> AddProductRequest {
    AddProductRequest {
        product_code: code.to_string(),
        description: "Cash and equivalents".to_string(),
    }
}

fn change_product(id: &str, code: &str, description: &str) -> ChangeProductRequest {
    ChangeProductRequest {
        id: id.to_string(),
        product_code: code.to_string(),
        description: description.to_string(),
        status: None,
    }
}

fn add_cosif(product_code: &str, cosif_code: &str) -> AddProductCosifRequest {
    AddProductCosifRequest {
        product_code: product_code.to_string(),
        cosif_code: cosif_code.to_string(),
        classification_code: "atv".to_string(),
    }
}

// =============================================================================
// Product
// =============================================================================

#[tokio::test]
async fn test_add_product_returns_created() {
    let fx = Fixture::new();

    let response = fx.ledger.products.handle(add_product("ab12")).await.unwrap();

    assert_eq!(response.status_code, 201);
    assert_eq!(response.data.product_code, "AB12");
    assert_eq!(response.data.created_by, "system");
    assert!(uuid_like(&response.data.id));
    assert_eq!(fx.products.len(), 1);
}

#[tokio::test]
async fn test_add_duplicate_code_reports_existing_holder() {
    let fx = Fixture::new();
    let existing = product("AB12");
    fx.products.seed(existing.clone());

    let err = fx.ledger.products.handle(add_product("ab12")).await.unwrap_err();

    assert_eq!(err.code(), "PRODUCT_CODE_ALREADY_EXISTS");
    assert_eq!(err.status_code(), 409);
    match err {
        ServiceError::AlreadyExists { existing_id, .. } => {
            assert_eq!(existing_id.as_deref(), Some(existing.base.id.as_str()))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fx.products.writes(), 0);
}

#[tokio::test]
async fn test_invalid_product_never_reaches_repositories() {
    let fx = Fixture::new();

    let err = fx
        .ledger
        .products
        .handle(AddProductRequest {
            product_code: "TOOLONG".to_string(),
            description: "  ".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(err.status_code(), 400);
    match err {
        ServiceError::ValidationFailed(errors) => assert_eq!(errors.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fx.total_reads(), 0);
    assert_eq!(fx.total_writes(), 0);
}

#[tokio::test]
async fn test_change_keeping_own_code_is_allowed() {
    let fx = Fixture::new();
    let existing = product("AB12");
    fx.products.seed(existing.clone());

    let response = fx
        .ledger
        .products
        .handle(change_product(&existing.base.id, "AB12", "Renamed"))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.data.description, "Renamed");
    assert_eq!(response.data.updated_by.as_deref(), Some("system"));
    assert_eq!(fx.products.all()[0].description, "Renamed");
}

#[tokio::test]
async fn test_change_to_another_products_code_conflicts() {
    let fx = Fixture::new();
    let first = product("AB12");
    fx.products.seed(first.clone());
    fx.products.seed(product("CD34"));

    let err = fx
        .ledger
        .products
        .handle(change_product(&first.base.id, "CD34", "Taken"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "PRODUCT_CODE_ALREADY_EXISTS");
    assert_eq!(fx.products.writes(), 0);
}

#[tokio::test]
async fn test_change_unknown_product_is_not_found() {
    let fx = Fixture::new();

    let err = fx
        .ledger
        .products
        .handle(change_product(&generate_id(), "AB12", "Ghost"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "PRODUCT_NOT_FOUND");
    assert_eq!(err.status_code(), 404);
    assert_eq!(fx.total_writes(), 0);
}

#[tokio::test]
async fn test_remove_product_in_use_conflicts() {
    let fx = Fixture::new();
    let existing = product("AB12");
    fx.products.seed(existing.clone());
    fx.product_cosifs.seed(product_cosif("AB12", "11110000001"));

    let err = fx
        .ledger
        .products
        .handle(RemoveRequest::new(&existing.base.id))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "PRODUCT_IN_USE");
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.status_code(), 409);
    assert_eq!(fx.products.len(), 1);
    assert_eq!(fx.products.writes(), 0);
}

#[tokio::test]
async fn test_remove_unused_product() {
    let fx = Fixture::new();
    let existing = product("AB12");
    fx.products.seed(existing.clone());

    let response = fx
        .ledger
        .products
        .handle(RemoveRequest::new(&existing.base.id))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.data, existing.base.id);
    assert_eq!(fx.products.len(), 0);
}

#[tokio::test]
async fn test_remove_unknown_product_is_not_found() {
    let fx = Fixture::new();

    let err = fx
        .ledger
        .products
        .handle(RemoveRequest::new(generate_id()))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "PRODUCT_NOT_FOUND");
    assert_eq!(fx.total_writes(), 0);
}

#[tokio::test]
async fn test_rejected_write_is_persistence_failure() {
    let fx = Fixture::new();
    fx.products.reject_writes();

    let err = fx.ledger.products.handle(add_product("AB12")).await.unwrap_err();

    assert_eq!(err.code(), "PERSISTENCE_FAILED");
    assert_eq!(err.status_code(), 500);
    assert_eq!(fx.products.len(), 0);
}

#[tokio::test]
async fn test_get_product_by_id() {
    let fx = Fixture::new();
    let existing = product("AB12");
    fx.products.seed(existing.clone());

    let found = fx.ledger.products.get_by_id(&existing.base.id).await.unwrap();
    assert_eq!(found.status_code, 200);
    assert_eq!(found.data.product_code, "AB12");

    let missing = fx.ledger.products.get_by_id(&generate_id()).await.unwrap_err();
    assert_eq!(missing.code(), "PRODUCT_NOT_FOUND");

    let malformed = fx.ledger.products.get_by_id("not-a-uuid").await.unwrap_err();
    assert_eq!(malformed.code(), "VALIDATION_FAILED");
}

// =============================================================================
// Product Cosif
// =============================================================================

#[tokio::test]
async fn test_add_cosif_normalizes_codes() {
    let fx = Fixture::new();
    fx.products.seed(product("AB12"));

    let response = fx
        .ledger
        .product_cosifs
        .handle(add_cosif("ab12", "11110000001"))
        .await
        .unwrap();

    assert_eq!(response.status_code, 201);
    assert_eq!(response.data.product_code, "AB12");
    assert_eq!(response.data.classification_code, "ATV");
    assert_eq!(fx.product_cosifs.len(), 1);
}

#[tokio::test]
async fn test_add_cosif_for_unknown_product_stops_before_uniqueness() {
    let fx = Fixture::new();

    let err = fx
        .ledger
        .product_cosifs
        .handle(add_cosif("ZZZZ", "11110000001"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "PRODUCT_NOT_FOUND");
    assert_eq!(fx.product_cosifs.reads(), 0);
    assert_eq!(fx.product_cosifs.writes(), 0);
}

#[tokio::test]
async fn test_add_duplicate_cosif_pair_conflicts() {
    let fx = Fixture::new();
    fx.products.seed(product("AB12"));
    fx.product_cosifs.seed(product_cosif("AB12", "11110000001"));

    let err = fx
        .ledger
        .product_cosifs
        .handle(add_cosif("AB12", "11110000001"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "PRODUCT_COSIF_ALREADY_EXISTS");
    assert_eq!(err.status_code(), 409);
    assert_eq!(fx.product_cosifs.writes(), 0);
}

#[tokio::test]
async fn test_same_cosif_code_under_another_product_is_allowed() {
    let fx = Fixture::new();
    fx.products.seed(product("AB12"));
    fx.products.seed(product("CD34"));
    fx.product_cosifs.seed(product_cosif("AB12", "11110000001"));

    let response = fx
        .ledger
        .product_cosifs
        .handle(add_cosif("CD34", "11110000001"))
        .await
        .unwrap();

    assert_eq!(response.status_code, 201);
    assert_eq!(fx.product_cosifs.len(), 2);
}

#[tokio::test]
async fn test_change_cosif_excludes_itself() {
    let fx = Fixture::new();
    fx.products.seed(product("AB12"));
    let existing = product_cosif("AB12", "11110000001");
    fx.product_cosifs.seed(existing.clone());

    let response = fx
        .ledger
        .product_cosifs
        .handle(ChangeProductCosifRequest {
            id: existing.base.id.clone(),
            product_code: "AB12".to_string(),
            cosif_code: "11110000001".to_string(),
            classification_code: "psv".to_string(),
            status: None,
        })
        .await
        .unwrap();

    assert_eq!(response.data.classification_code, "PSV");
    assert_eq!(fx.product_cosifs.all()[0].classification_code, "PSV");
}

#[tokio::test]
async fn test_remove_cosif_in_use_conflicts() {
    let fx = Fixture::new();
    let cosif = product_cosif("AB12", "11110000001");
    fx.product_cosifs.seed(cosif.clone());
    fx.manual_movements.seed(movement(1, 2024, 1, &cosif));

    let err = fx
        .ledger
        .product_cosifs
        .handle(RemoveRequest::new(&cosif.base.id))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "PRODUCT_COSIF_IN_USE");
    assert_eq!(err.status_code(), 409);
    assert_eq!(fx.product_cosifs.len(), 1);
}

fn uuid_like(id: &str) -> bool {
    id.len() == 36 && id.chars().filter(|c| *c == '-').count() == 4
}
