//! Value-weighted warehouse fee distribution.
//!
//! Every lot with stock absorbs a share of the month's fee proportional to
//! `quantity_remaining × unit_cost`. Accumulated fees never feed back into
//! the value basis.

use rust_decimal::Decimal;

use super::allocation::{AllocationError, AllocationUtil, checked_sum};
use super::error::FeeError;
use super::service::FeeService;
use super::types::{DistributionCandidate, DistributionLine, DistributionPlan, WarehouseFee};

/// Precision of `value_ratio` (percent).
pub const VALUE_RATIO_DECIMAL_PLACES: u32 = 4;

/// Plans fee distributions.
pub struct FeeDistributor;

impl FeeDistributor {
    /// Computes the distribution of a pending fee over candidate lots.
    ///
    /// Lots without stock are skipped. Lines come out in FIFO order and
    /// `distributed_fee` sums to `total_fee` exactly; the rounding residual
    /// lands on the largest-value lot (earliest in FIFO order on ties).
    ///
    /// # Errors
    ///
    /// - `FeeError::AlreadyDistributed` if the fee is not pending
    /// - `FeeError::NoEligibleInventory` if no lot has positive value
    /// - `FeeError::AmountOutOfRange` if a value, the total value or a
    ///   share overflows
    pub fn plan(
        fee: &WarehouseFee,
        candidates: &[DistributionCandidate],
        fee_decimal_places: u32,
    ) -> Result<DistributionPlan, FeeError> {
        FeeService::ensure_pending(fee)?;

        let mut eligible: Vec<DistributionCandidate> = candidates
            .iter()
            .filter(|c| c.quantity_remaining > Decimal::ZERO)
            .copied()
            .collect();
        eligible.sort_by_key(|c| (c.received_date, c.lot_id));

        let out_of_range = || FeeError::AmountOutOfRange(fee.year_month);
        let values = eligible
            .iter()
            .map(|c| c.value().ok_or_else(out_of_range))
            .collect::<Result<Vec<Decimal>, _>>()?;
        let total_value = checked_sum(values.iter().copied()).map_err(|_| out_of_range())?;

        let allocation =
            AllocationUtil::allocate_by_weights(fee.total_fee, &values, fee_decimal_places)
                .map_err(|e| match e {
                    AllocationError::NoWeight => FeeError::NoEligibleInventory(fee.year_month),
                    AllocationError::Overflow => out_of_range(),
                })?;

        let hundred = Decimal::ONE_HUNDRED;
        let lines = eligible
            .iter()
            .zip(values.iter().zip(allocation.amounts.iter()))
            .map(|(candidate, (value, fee_share))| DistributionLine {
                lot_id: candidate.lot_id,
                quantity_at_time: candidate.quantity_remaining,
                value_at_time: *value,
                value_ratio: (*value / total_value * hundred).round_dp(VALUE_RATIO_DECIMAL_PLACES),
                distributed_fee: *fee_share,
            })
            .collect::<Vec<_>>();

        let residual_lot_id = lines[allocation.residual_index].lot_id;

        Ok(DistributionPlan {
            year_month: fee.year_month,
            total_fee: fee.total_fee,
            total_value,
            lines,
            residual: allocation.residual,
            residual_lot_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fee::types::{CreateFeeInput, YearMonth};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use stockwise_shared::types::{LotId, WarehouseFeeId};
    use uuid::Uuid;

    fn fee(total: Decimal) -> WarehouseFee {
        FeeService::build_fee(
            WarehouseFeeId::new(),
            CreateFeeInput {
                year_month: YearMonth::new(2024, 3).unwrap(),
                total_fee: total,
                memo: None,
            },
        )
        .unwrap()
    }

    fn candidate(n: u128, day: u32, quantity: Decimal, unit_cost: Decimal) -> DistributionCandidate {
        DistributionCandidate {
            lot_id: LotId::from_uuid(Uuid::from_u128(n)),
            received_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            quantity_remaining: quantity,
            unit_cost,
        }
    }

    #[test]
    fn test_two_lot_scenario() {
        let lots = [
            candidate(1, 1, dec!(30), dec!(10000)),
            candidate(2, 2, dec!(70), dec!(10000)),
        ];
        let plan = FeeDistributor::plan(&fee(dec!(500000)), &lots, 0).unwrap();

        assert_eq!(plan.total_value, dec!(1000000));
        assert_eq!(plan.lines[0].distributed_fee, dec!(150000));
        assert_eq!(plan.lines[1].distributed_fee, dec!(350000));
        assert_eq!(plan.lines[0].value_ratio, dec!(30));
        assert_eq!(plan.lines[1].value_ratio, dec!(70));
        assert_eq!(plan.residual, dec!(0));
        assert_eq!(plan.lot_count(), 2);
    }

    #[test]
    fn test_conservation_with_residual() {
        let lots = [
            candidate(1, 1, dec!(1), dec!(1)),
            candidate(2, 2, dec!(1), dec!(1)),
            candidate(3, 3, dec!(1), dec!(1)),
        ];
        let plan = FeeDistributor::plan(&fee(dec!(100)), &lots, 0).unwrap();

        assert_eq!(plan.distributed_total(), dec!(100));
        assert_eq!(plan.residual, dec!(1));
        // Equal values: earliest lot takes the residual.
        assert_eq!(plan.residual_lot_id, lots[0].lot_id);
        assert_eq!(plan.lines[0].distributed_fee, dec!(34));
        assert_eq!(plan.lines[0].value_ratio, dec!(33.3333));
    }

    #[test]
    fn test_residual_goes_to_largest_value() {
        let lots = [
            candidate(1, 1, dec!(1), dec!(1)),
            candidate(2, 2, dec!(5), dec!(1)),
            candidate(3, 3, dec!(1), dec!(1)),
        ];
        let plan = FeeDistributor::plan(&fee(dec!(100)), &lots, 0).unwrap();
        assert_eq!(plan.residual_lot_id, lots[1].lot_id);
        assert_eq!(plan.distributed_total(), dec!(100));
    }

    #[test]
    fn test_proportionality() {
        let lots = [
            candidate(1, 1, dec!(20), dec!(1000)),
            candidate(2, 2, dec!(10), dec!(1000)),
        ];
        let plan = FeeDistributor::plan(&fee(dec!(90001)), &lots, 0).unwrap();
        let diff = plan.lines[0].distributed_fee - dec!(2) * plan.lines[1].distributed_fee;
        assert!(diff.abs() <= dec!(2));
    }

    #[test]
    fn test_lines_are_fifo_ordered() {
        let lots = [
            candidate(9, 20, dec!(1), dec!(1)),
            candidate(5, 3, dec!(1), dec!(1)),
            candidate(4, 3, dec!(1), dec!(1)),
        ];
        let plan = FeeDistributor::plan(&fee(dec!(3)), &lots, 0).unwrap();
        let order: Vec<LotId> = plan.lines.iter().map(|l| l.lot_id).collect();
        assert_eq!(order, vec![lots[2].lot_id, lots[1].lot_id, lots[0].lot_id]);
    }

    #[test]
    fn test_empty_lots_are_skipped() {
        let lots = [
            candidate(1, 1, dec!(0), dec!(500)),
            candidate(2, 2, dec!(10), dec!(500)),
        ];
        let plan = FeeDistributor::plan(&fee(dec!(1000)), &lots, 0).unwrap();
        assert_eq!(plan.lot_count(), 1);
        assert_eq!(plan.lines[0].distributed_fee, dec!(1000));
    }

    #[test]
    fn test_no_eligible_inventory() {
        let result = FeeDistributor::plan(&fee(dec!(1000)), &[], 0);
        assert!(matches!(result, Err(FeeError::NoEligibleInventory(_))));

        let zero_cost = [candidate(1, 1, dec!(10), dec!(0))];
        let result = FeeDistributor::plan(&fee(dec!(1000)), &zero_cost, 0);
        assert!(matches!(result, Err(FeeError::NoEligibleInventory(_))));
    }

    #[test]
    fn test_oversized_fee_is_rejected() {
        let lots = [candidate(1, 1, dec!(1000), dec!(1000000))];
        let result = FeeDistributor::plan(&fee(dec!(100000000000000000000)), &lots, 0);
        assert!(matches!(result, Err(FeeError::AmountOutOfRange(_))));
    }

    #[test]
    fn test_oversized_lot_value_is_rejected() {
        let lots = [candidate(1, 1, dec!(1000000000000000), dec!(1000000000000000))];
        let result = FeeDistributor::plan(&fee(dec!(1)), &lots, 0);
        assert!(matches!(result, Err(FeeError::AmountOutOfRange(_))));
    }

    #[test]
    fn test_distributed_fee_is_rejected() {
        let lots = [candidate(1, 1, dec!(1), dec!(1))];
        let pending = fee(dec!(10));
        let plan = FeeDistributor::plan(&pending, &lots, 0).unwrap();
        let distributed = FeeService::mark_distributed(pending, &plan, Utc::now()).unwrap();

        let result = FeeDistributor::plan(&distributed, &lots, 0);
        assert!(matches!(result, Err(FeeError::AlreadyDistributed(_))));
    }

    #[test]
    fn test_cent_precision() {
        let lots = [
            candidate(1, 1, dec!(3), dec!(1)),
            candidate(2, 2, dec!(3), dec!(1)),
            candidate(3, 3, dec!(3), dec!(1)),
        ];
        let plan = FeeDistributor::plan(&fee(dec!(10.00)), &lots, 2).unwrap();
        assert_eq!(plan.lines[1].distributed_fee, dec!(3.33));
        assert_eq!(plan.lines[0].distributed_fee, dec!(3.34));
        assert_eq!(plan.distributed_total(), dec!(10.00));
    }
}
