//! Paged queries: windowing, ordering, empty pages and sort-field checks.

mod support;

use ledgerbook_core::EntityStatus;
use ledgerbook_service::dto::customer::CustomerQuery;
use ledgerbook_service::dto::manual_movement::ManualMovementQuery;
use ledgerbook_service::dto::product::ProductQuery;
use ledgerbook_service::dto::Paging;
use ledgerbook_service::{PagingLimits, ServiceConfig, ServiceError};
use support::{customer, movement, product, product_cosif, Fixture};

/// Seven products, P001..P007, inserted out of order.
fn catalog() -> Fixture {
    let fx = Fixture::new();
    for n in [4, 1, 7, 3, 6, 2, 5] {
        fx.products.seed(product(&format!("P{n:03}")));
    }
    fx
}

fn products_query(paging: Paging) -> ProductQuery {
    ProductQuery {
        paging,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_pages_cover_the_whole_set() {
    let fx = catalog();

    let mut seen = Vec::new();
    for page in 1..=3 {
        let response = fx
            .ledger
            .products
            .find(products_query(Paging::new(page, 3)))
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.data.total_count, 7);
        assert_eq!(response.data.total_pages, 3);
        assert_eq!(response.data.page, page);
        assert_eq!(response.data.page_size, 3);
        seen.extend(response.data.items.into_iter().map(|p| p.product_code));
    }

    assert_eq!(
        seen,
        vec!["P001", "P002", "P003", "P004", "P005", "P006", "P007"]
    );
}

#[tokio::test]
async fn test_last_page_holds_the_remainder() {
    let fx = catalog();

    let response = fx
        .ledger
        .products
        .find(products_query(Paging::new(3, 3)))
        .await
        .unwrap();

    assert_eq!(response.data.items.len(), 1);
    assert_eq!(response.data.items[0].product_code, "P007");
}

#[tokio::test]
async fn test_descending_is_reverse_of_ascending() {
    let fx = catalog();

    let ascending = fx
        .ledger
        .products
        .find(products_query(
            Paging::new(1, 10).sorted_by("productCode", "asc"),
        ))
        .await
        .unwrap();
    let descending = fx
        .ledger
        .products
        .find(products_query(
            Paging::new(1, 10).sorted_by("productCode", "DESC"),
        ))
        .await
        .unwrap();

    let mut reversed: Vec<String> = descending
        .data
        .items
        .into_iter()
        .map(|p| p.product_code)
        .collect();
    reversed.reverse();
    let forward: Vec<String> = ascending
        .data
        .items
        .into_iter()
        .map(|p| p.product_code)
        .collect();

    assert_eq!(forward, reversed);
}

#[tokio::test]
async fn test_empty_result_is_no_content() {
    let fx = catalog();

    let response = fx
        .ledger
        .products
        .find(ProductQuery {
            product_code: Some("zzzz".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.status_code, 204);
    assert_eq!(response.data.total_count, 0);
    assert_eq!(response.data.total_pages, 0);
    assert!(response.data.items.is_empty());
}

#[tokio::test]
async fn test_page_past_the_end_is_no_content_with_total() {
    let fx = catalog();

    let response = fx
        .ledger
        .products
        .find(products_query(Paging::new(4, 3)))
        .await
        .unwrap();

    assert_eq!(response.status_code, 204);
    assert_eq!(response.data.total_count, 7);
}

#[tokio::test]
async fn test_unknown_sort_field_is_rejected() {
    let fx = catalog();

    let err = fx
        .ledger
        .products
        .find(products_query(Paging::new(1, 10).sorted_by("Price", "asc")))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_SORT_FIELD");
    assert_eq!(err.status_code(), 400);
    match err {
        ServiceError::InvalidSortField { field, allowed, .. } => {
            assert_eq!(field, "Price");
            assert!(allowed.contains(&"ProductCode"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_sort_field_fails_even_when_nothing_matches() {
    let fx = Fixture::new();

    let err = fx
        .ledger
        .products
        .find(products_query(Paging::new(1, 10).sorted_by("Price", "asc")))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_SORT_FIELD");
}

#[tokio::test]
async fn test_oversized_page_fails_before_querying() {
    let fx = catalog();

    let err = fx
        .ledger
        .products
        .find(products_query(Paging::new(1, 500)))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "VALIDATION_FAILED");
    assert_eq!(fx.total_reads(), 0);
}

#[tokio::test]
async fn test_page_limits_come_from_config() {
    let config = ServiceConfig {
        paging: PagingLimits {
            default_page_size: 2,
            max_page_size: 5,
        },
        ..ServiceConfig::default()
    };
    let fx = Fixture::with_config(config);
    for n in 1..=7 {
        fx.products.seed(product(&format!("P{n:03}")));
    }

    let defaulted = fx
        .ledger
        .products
        .find(ProductQuery::default())
        .await
        .unwrap();
    assert_eq!(defaulted.data.page_size, 2);
    assert_eq!(defaulted.data.items.len(), 2);
    assert_eq!(defaulted.data.total_pages, 4);

    let err = fx
        .ledger
        .products
        .find(products_query(Paging::new(1, 6)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_sort_field_names_are_matched_loosely() {
    let fx = Fixture::new();
    fx.customers
        .seed(customer("Carla", "carla@example.com", "33333333333"));
    fx.customers
        .seed(customer("Ana", "ana@example.com", "22222222222"));
    fx.customers
        .seed(customer("Bruno", "bruno@example.com", "11111111111"));

    let response = fx
        .ledger
        .customers
        .find(CustomerQuery {
            paging: Paging::new(1, 10).sorted_by("document_number", "asc"),
            ..Default::default()
        })
        .await
        .unwrap();

    let names: Vec<String> = response.data.items.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Bruno", "Ana", "Carla"]);
}

#[tokio::test]
async fn test_filters_combine_with_paging() {
    let fx = Fixture::new();
    let cosif = product_cosif("AB12", "11110000001");
    for n in 1..=4 {
        fx.manual_movements.seed(movement(6, 2024, n, &cosif));
    }
    let mut inactive = movement(6, 2024, 5, &cosif);
    inactive.base.status = EntityStatus::Inactive;
    fx.manual_movements.seed(inactive);
    fx.manual_movements.seed(movement(7, 2024, 1, &cosif));

    let response = fx
        .ledger
        .manual_movements
        .find(ManualMovementQuery {
            paging: Paging::new(1, 2).sorted_by("LaunchNumber", "desc"),
            month: Some(6),
            year: Some(2024),
            status: Some(EntityStatus::Active),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.data.total_count, 4);
    assert_eq!(response.data.total_pages, 2);
    let numbers: Vec<u32> = response
        .data
        .items
        .iter()
        .map(|m| m.launch_number)
        .collect();
    assert_eq!(numbers, vec![4, 3]);
}
