//! Property-based tests for fee distribution.
//!
//! Conservation: distributed fees always sum to the total fee.
//! Non-negativity: no lot ever receives a negative share.
//! Proportionality: every line other than the residual holder sits within
//! one rounding unit below its exact share.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use stockwise_shared::types::{LotId, WarehouseFeeId};
use uuid::Uuid;

use super::distributor::FeeDistributor;
use super::types::{DistributionCandidate, FeeState, WarehouseFee, YearMonth};

/// Strategy for fee totals from 0.00 to 10,000,000.00.
fn total_fee() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for candidate lots with positive stock and cost.
fn candidates() -> impl Strategy<Value = Vec<DistributionCandidate>> {
    prop::collection::vec((0u32..60, 1i64..100_000i64, 1i64..10_000_000i64), 1..15).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (day, qty, cost))| DistributionCandidate {
                    lot_id: LotId::from_uuid(Uuid::from_u128(i as u128 + 1)),
                    received_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Days::new(u64::from(day)),
                    quantity_remaining: Decimal::new(qty, 2),
                    unit_cost: Decimal::new(cost, 2),
                })
                .collect()
        },
    )
}

fn pending(total_fee: Decimal) -> WarehouseFee {
    WarehouseFee {
        id: WarehouseFeeId::from_uuid(Uuid::nil()),
        year_month: YearMonth::new(2024, 6).unwrap(),
        total_fee,
        state: FeeState::Pending,
        memo: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_distribution_conserves_total(
        total in total_fee(),
        lots in candidates(),
        places in 0u32..3,
    ) {
        let plan = FeeDistributor::plan(&pending(total), &lots, places).unwrap();
        prop_assert_eq!(plan.distributed_total(), total);
        prop_assert_eq!(plan.lines.len(), lots.len());
    }

    #[test]
    fn prop_distribution_never_negative(
        total in total_fee(),
        lots in candidates(),
        places in 0u32..3,
    ) {
        let plan = FeeDistributor::plan(&pending(total), &lots, places).unwrap();
        prop_assert!(plan.residual >= Decimal::ZERO);
        for line in &plan.lines {
            prop_assert!(line.distributed_fee >= Decimal::ZERO);
        }
    }

    #[test]
    fn prop_shares_within_one_unit_of_exact(
        total in total_fee(),
        lots in candidates(),
    ) {
        let plan = FeeDistributor::plan(&pending(total), &lots, 0).unwrap();
        for line in plan.lines.iter().filter(|l| l.lot_id != plan.residual_lot_id) {
            let exact = total * line.value_at_time / plan.total_value;
            let gap = exact - line.distributed_fee;
            prop_assert!(gap >= Decimal::ZERO);
            prop_assert!(gap < Decimal::ONE);
        }
    }

    #[test]
    fn prop_distribution_is_deterministic(
        total in total_fee(),
        lots in candidates(),
    ) {
        let mut reversed = lots.clone();
        reversed.reverse();
        let a = FeeDistributor::plan(&pending(total), &lots, 0).unwrap();
        let b = FeeDistributor::plan(&pending(total), &reversed, 0).unwrap();
        prop_assert_eq!(a, b);
    }
}
