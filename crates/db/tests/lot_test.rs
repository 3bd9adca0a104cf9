//! Integration tests for the lot ledger.
//!
//! Covers landed-cost registration, guarded consumption, FIFO drawdown,
//! deletion rules and concurrent drawdown of the same lot.

#![allow(clippy::uninlined_format_args)]

mod common;

use futures::future::join_all;
use rust_decimal_macros::dec;

use stockwise_core::lot::{CreateLotInput, LandedCost, LotError, LotFilter, StorageLocation};
use stockwise_db::repositories::LotRepository;
use stockwise_shared::types::{LotId, PageRequest, ProductId};

use common::{create_product, date, receipt, setup};

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_create_lot_computes_landed_unit_cost() {
    let db = setup().await.unwrap();
    let product_id = create_product(&db).await.unwrap();
    let repo = LotRepository::new(db);

    let lot = repo
        .create_lot(CreateLotInput {
            product_id,
            lot_code: Some("BL-2024-001".to_string()),
            source_transaction_id: None,
            received_date: date(2024, 1, 15),
            quantity_received: dec!(100),
            costs: LandedCost {
                goods_amount: dec!(1000000),
                duty_amount: dec!(50000),
                domestic_freight: dec!(30000),
                other_cost: dec!(0),
            },
            storage_location: StorageLocation::Warehouse,
            memo: None,
        })
        .await
        .unwrap();

    assert_eq!(lot.unit_cost, dec!(10800));
    assert_eq!(lot.quantity_remaining, dec!(100));

    let stored = repo.find_lot(lot.id).await.unwrap();
    assert_eq!(stored.unit_cost, dec!(10800));
    assert_eq!(stored.accumulated_warehouse_fee, dec!(0));
    assert_eq!(stored.lot_code.as_deref(), Some("BL-2024-001"));
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_create_lot_rejects_unknown_product() {
    let db = setup().await.unwrap();
    let repo = LotRepository::new(db);

    let result = repo
        .create_lot(receipt(ProductId::new(), date(2024, 1, 1), dec!(1), dec!(1)))
        .await;
    assert!(matches!(result, Err(LotError::ProductNotFound(_))));
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_over_consumption_leaves_lot_unchanged() {
    let db = setup().await.unwrap();
    let product_id = create_product(&db).await.unwrap();
    let repo = LotRepository::new(db);

    let lot = repo
        .create_lot(receipt(product_id, date(2024, 2, 1), dec!(10), dec!(5)))
        .await
        .unwrap();

    let result = repo.consume_lot(lot.id, dec!(11)).await;
    assert!(matches!(result, Err(LotError::InsufficientQuantity { .. })));
    assert_eq!(repo.find_lot(lot.id).await.unwrap().quantity_remaining, dec!(10));

    let plan = repo.consume_lot(lot.id, dec!(10)).await.unwrap();
    assert_eq!(plan.cost_of_goods(), dec!(50));
    assert_eq!(repo.find_lot(lot.id).await.unwrap().quantity_remaining, dec!(0));
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_consume_product_draws_fifo() {
    let db = setup().await.unwrap();
    let product_id = create_product(&db).await.unwrap();
    let repo = LotRepository::new(db);

    let l2 = repo
        .create_lot(receipt(product_id, date(2024, 2, 1), dec!(10), dec!(200)))
        .await
        .unwrap();
    let l1 = repo
        .create_lot(receipt(product_id, date(2024, 1, 1), dec!(10), dec!(100)))
        .await
        .unwrap();

    let plan = repo.consume_product(product_id, dec!(15)).await.unwrap();
    assert_eq!(plan.draws.len(), 2);
    assert_eq!(plan.draws[0].lot_id, l1.id);
    assert_eq!(plan.cost_of_goods(), dec!(2000));

    assert_eq!(repo.find_lot(l1.id).await.unwrap().quantity_remaining, dec!(0));
    assert_eq!(repo.find_lot(l2.id).await.unwrap().quantity_remaining, dec!(5));

    // All-or-nothing: 6 > 5 available.
    let result = repo.consume_product(product_id, dec!(6)).await;
    assert!(matches!(result, Err(LotError::InsufficientQuantity { .. })));
    assert_eq!(repo.find_lot(l2.id).await.unwrap().quantity_remaining, dec!(5));
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_concurrent_consumption_never_overdraws() {
    let db = setup().await.unwrap();
    let product_id = create_product(&db).await.unwrap();
    let repo = LotRepository::new(db);

    let lot = repo
        .create_lot(receipt(product_id, date(2024, 3, 1), dec!(50), dec!(1)))
        .await
        .unwrap();

    let attempts = (0..10).map(|_| {
        let repo = repo.clone();
        async move { repo.consume_lot(lot.id, dec!(10)).await }
    });
    let results = join_all(attempts).await;

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 5, "results: {:?}", results);
    assert_eq!(repo.find_lot(lot.id).await.unwrap().quantity_remaining, dec!(0));
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_delete_lot_without_distributions() {
    let db = setup().await.unwrap();
    let product_id = create_product(&db).await.unwrap();
    let repo = LotRepository::new(db);

    let lot = repo
        .create_lot(receipt(product_id, date(2024, 4, 1), dec!(1), dec!(1)))
        .await
        .unwrap();

    repo.delete_lot(lot.id).await.unwrap();
    assert!(matches!(
        repo.find_lot(lot.id).await,
        Err(LotError::LotNotFound(_))
    ));
    assert!(matches!(
        repo.delete_lot(LotId::new()).await,
        Err(LotError::LotNotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_change_storage_location_and_filter() {
    let db = setup().await.unwrap();
    let product_id = create_product(&db).await.unwrap();
    let repo = LotRepository::new(db);

    let lot = repo
        .create_lot(receipt(product_id, date(2024, 5, 1), dec!(3), dec!(7)))
        .await
        .unwrap();

    let moved = repo
        .change_storage_location(lot.id, StorageLocation::Office)
        .await
        .unwrap();
    assert_eq!(moved.storage_location, StorageLocation::Office);
    assert_eq!(moved.unit_cost, lot.unit_cost);

    let page = repo
        .list_lots(
            &LotFilter {
                product_id: Some(product_id),
                storage_location: Some(StorageLocation::Office),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].id, lot.id);
}
