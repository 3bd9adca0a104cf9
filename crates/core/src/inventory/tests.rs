//! Tests for inventory aggregation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use stockwise_shared::types::{LotId, ProductId};
use uuid::Uuid;

use super::service::InventoryAggregator;
use crate::lot::{LandedCost, Lot, StorageLocation};

fn lot(
    product_id: ProductId,
    n: u128,
    day: u32,
    remaining: Decimal,
    unit_cost: Decimal,
    fee: Decimal,
) -> Lot {
    Lot {
        id: LotId::from_uuid(Uuid::from_u128(n)),
        product_id,
        lot_code: Some(format!("BL-{n}")),
        source_transaction_id: None,
        received_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        quantity_received: remaining.max(dec!(1)),
        quantity_remaining: remaining,
        costs: LandedCost::default(),
        unit_cost,
        accumulated_warehouse_fee: fee,
        storage_location: StorageLocation::Warehouse,
        memo: None,
    }
}

fn product(n: u128) -> ProductId {
    ProductId::from_uuid(Uuid::from_u128(n))
}

#[test]
fn test_weighted_average_cost() {
    let p = product(1);
    let lots = vec![
        lot(p, 1, 1, dec!(10), dec!(100), dec!(0)),
        lot(p, 2, 2, dec!(20), dec!(200), dec!(0)),
    ];

    let summary = InventoryAggregator::product_summary(p, &lots);
    assert_eq!(summary.quantity, dec!(30));
    assert_eq!(summary.landed_value, dec!(5000));
    assert_eq!(summary.avg_unit_cost.round_dp(2), dec!(166.67));
    assert_eq!(summary.lot_count, 2);
}

#[test]
fn test_current_value_includes_fees() {
    let p = product(1);
    let lots = vec![
        lot(p, 1, 1, dec!(10), dec!(100), dec!(50)),
        lot(p, 2, 2, dec!(0), dec!(200), dec!(30)),
    ];

    let summary = InventoryAggregator::product_summary(p, &lots);
    assert_eq!(summary.quantity, dec!(10));
    assert_eq!(summary.avg_unit_cost, dec!(100));
    assert_eq!(summary.accumulated_warehouse_fee, dec!(80));
    assert_eq!(summary.current_value, dec!(1080));
    assert_eq!(summary.lot_count, 2);
    assert_eq!(summary.open_lot_count, 1);
}

#[test]
fn test_summary_without_stock() {
    let p = product(1);
    let summary = InventoryAggregator::product_summary(p, &[]);
    assert_eq!(summary.quantity, dec!(0));
    assert_eq!(summary.avg_unit_cost, dec!(0));
    assert_eq!(summary.current_value, dec!(0));
}

#[test]
fn test_summary_ignores_other_products() {
    let p = product(1);
    let lots = vec![
        lot(p, 1, 1, dec!(5), dec!(10), dec!(0)),
        lot(product(2), 2, 1, dec!(500), dec!(10), dec!(0)),
    ];
    assert_eq!(InventoryAggregator::product_summary(p, &lots).quantity, dec!(5));
}

#[test]
fn test_lot_detail_fifo_and_current_cost() {
    let p = product(1);
    let lots = vec![
        lot(p, 3, 9, dec!(4), dec!(100), dec!(40)),
        lot(p, 2, 5, dec!(0), dec!(80), dec!(10)),
        lot(p, 1, 9, dec!(2), dec!(90), dec!(0)),
    ];

    let detail = InventoryAggregator::lot_detail(p, &lots);
    let ids: Vec<u128> = detail.iter().map(|d| d.lot_id.into_inner().as_u128()).collect();
    assert_eq!(ids, vec![2, 1, 3]);

    // Exhausted lot keeps its landed cost.
    assert_eq!(detail[0].current_unit_cost, dec!(80));
    assert_eq!(detail[2].current_unit_cost, dec!(110));
    assert_eq!(detail[2].landed_value, dec!(400));
}

#[test]
fn test_overview_groups_by_product() {
    let lots = vec![
        lot(product(2), 1, 1, dec!(1), dec!(10), dec!(0)),
        lot(product(1), 2, 1, dec!(2), dec!(10), dec!(0)),
        lot(product(2), 3, 2, dec!(3), dec!(10), dec!(0)),
    ];

    let overview = InventoryAggregator::overview(&lots);
    assert_eq!(overview.len(), 2);
    assert_eq!(overview[0].product_id, product(1));
    assert_eq!(overview[1].quantity, dec!(4));
}

proptest! {
    /// Quantity equals the sum of remaining stock and current value never
    /// falls below landed value.
    #[test]
    fn prop_summary_totals(
        specs in prop::collection::vec((0i64..10_000, 0i64..100_000, 0i64..100_000), 0..20),
    ) {
        let p = product(7);
        let lots: Vec<Lot> = specs
            .iter()
            .enumerate()
            .map(|(i, (qty, cost, fee))| {
                lot(
                    p,
                    i as u128 + 1,
                    1,
                    Decimal::new(*qty, 1),
                    Decimal::new(*cost, 2),
                    Decimal::new(*fee, 2),
                )
            })
            .collect();

        let summary = InventoryAggregator::product_summary(p, &lots);
        let expected: Decimal = lots.iter().map(|l| l.quantity_remaining).sum();
        prop_assert_eq!(summary.quantity, expected);
        prop_assert!(summary.current_value >= summary.landed_value);
        prop_assert_eq!(summary.lot_count as usize, lots.len());
    }
}
