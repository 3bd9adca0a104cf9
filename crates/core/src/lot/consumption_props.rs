//! Property-based tests for FIFO consumption.
//!
//! Quantity invariants: a plan never drives a lot below zero, draws sum to
//! the request, and lots are touched strictly in FIFO order.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use stockwise_shared::types::{LotId, ProductId};
use uuid::Uuid;

use super::consumption::plan_fifo;
use super::error::LotError;
use super::types::{LandedCost, Lot, StorageLocation};

/// Strategy for lot quantities from 0.00 to 1,000.00.
fn quantity() -> impl Strategy<Value = Decimal> {
    (0i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a set of lots of one product with random dates and stock.
fn lots() -> impl Strategy<Value = Vec<Lot>> {
    prop::collection::vec((0u32..365, quantity()), 1..12).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (day, remaining))| Lot {
                id: LotId::from_uuid(Uuid::from_u128(i as u128 + 1)),
                product_id: ProductId::from_uuid(Uuid::nil()),
                lot_code: None,
                source_transaction_id: None,
                received_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(u64::from(day)),
                quantity_received: remaining + Decimal::ONE,
                quantity_remaining: remaining,
                costs: LandedCost::default(),
                unit_cost: Decimal::ONE,
                accumulated_warehouse_fee: Decimal::ZERO,
                storage_location: StorageLocation::Warehouse,
                memo: None,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A successful plan draws exactly the requested quantity and never
    /// leaves a lot negative or above its received quantity.
    #[test]
    fn prop_plan_conserves_quantity(lots in lots(), request in quantity()) {
        let available: Decimal = lots.iter().map(|l| l.quantity_remaining).sum();

        match plan_fifo(&lots, request) {
            Ok(plan) => {
                prop_assert_eq!(plan.drawn(), request);
                for draw in &plan.draws {
                    prop_assert!(draw.quantity > Decimal::ZERO);
                    prop_assert!(draw.remaining_after >= Decimal::ZERO);
                    prop_assert_eq!(draw.remaining_before - draw.quantity, draw.remaining_after);
                }
            }
            Err(LotError::NonPositiveQuantity(_)) => prop_assert!(request.is_zero()),
            Err(LotError::InsufficientQuantity { available: reported, .. }) => {
                prop_assert!(request > available);
                prop_assert_eq!(reported, available);
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    /// Only the last lot touched may be partially drawn, and every lot
    /// touched is no newer than any open lot left untouched.
    #[test]
    fn prop_plan_follows_fifo(lots in lots(), request in quantity()) {
        if let Ok(plan) = plan_fifo(&lots, request) {
            let touched: Vec<&Lot> = plan
                .draws
                .iter()
                .map(|d| lots.iter().find(|l| l.id == d.lot_id).unwrap())
                .collect();

            for pair in touched.windows(2) {
                prop_assert!(pair[0].fifo_key() < pair[1].fifo_key());
            }

            if let Some((_, rest)) = plan.draws.split_last() {
                for draw in rest {
                    prop_assert!(draw.remaining_after.is_zero());
                }
            }

            if let Some(newest_touched) = touched.last() {
                for lot in lots.iter().filter(|l| l.is_open()) {
                    if !touched.iter().any(|t| t.id == lot.id) {
                        prop_assert!(lot.fifo_key() > newest_touched.fifo_key());
                    }
                }
            }
        }
    }
}
