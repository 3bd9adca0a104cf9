//! Warehouse fee lifecycle rules.
//!
//! A fee moves PENDING → DISTRIBUTED exactly once. Only pending fees may be
//! edited, deleted, or distributed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use stockwise_shared::types::WarehouseFeeId;

use super::error::FeeError;
use super::types::{
    CreateFeeInput, DistributionPlan, DistributionSnapshot, FeeState, UpdateFeeInput, WarehouseFee,
};

/// Stateless service for the fee lifecycle.
pub struct FeeService;

impl FeeService {
    /// Builds a new pending fee.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::NegativeFee` if the total is below zero.
    pub fn build_fee(id: WarehouseFeeId, input: CreateFeeInput) -> Result<WarehouseFee, FeeError> {
        Self::validate_total(input.total_fee)?;

        Ok(WarehouseFee {
            id,
            year_month: input.year_month,
            total_fee: input.total_fee,
            state: FeeState::Pending,
            memo: input.memo,
        })
    }

    /// Checks that a fee may still change.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::AlreadyDistributed` if the fee was distributed.
    pub fn ensure_pending(fee: &WarehouseFee) -> Result<(), FeeError> {
        if fee.state.is_pending() {
            Ok(())
        } else {
            Err(FeeError::AlreadyDistributed(fee.year_month))
        }
    }

    /// Applies changes to a pending fee.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::AlreadyDistributed` for a distributed fee and
    /// `FeeError::NegativeFee` for a negative new total.
    pub fn apply_update(
        mut fee: WarehouseFee,
        input: UpdateFeeInput,
    ) -> Result<WarehouseFee, FeeError> {
        Self::ensure_pending(&fee)?;

        if let Some(total_fee) = input.total_fee {
            Self::validate_total(total_fee)?;
            fee.total_fee = total_fee;
        }
        if let Some(memo) = input.memo {
            fee.memo = memo;
        }

        Ok(fee)
    }

    /// The only transition out of PENDING.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::AlreadyDistributed` if the fee is not pending.
    pub fn mark_distributed(
        mut fee: WarehouseFee,
        plan: &DistributionPlan,
        distributed_at: DateTime<Utc>,
    ) -> Result<WarehouseFee, FeeError> {
        Self::ensure_pending(&fee)?;

        fee.state = FeeState::Distributed(DistributionSnapshot {
            distributed_at,
            total_value: plan.total_value,
            lot_count: plan.lot_count(),
        });
        Ok(fee)
    }

    fn validate_total(total_fee: Decimal) -> Result<(), FeeError> {
        if total_fee < Decimal::ZERO {
            return Err(FeeError::NegativeFee(total_fee));
        }
        Ok(())
    }
}
