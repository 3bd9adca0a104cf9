//! Value-weighted allocation with exact reconciliation.
//!
//! Allocating a total across weights works in three steps:
//! 1. Compute each exact share `total × weight / Σweight`
//! 2. Round each share down to the target precision
//! 3. Add the residual (`total − Σrounded`) to the single heaviest recipient
//!
//! Rounding down keeps the residual non-negative, so no recipient can be
//! pushed below zero and the sum always equals the total exactly.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use thiserror::Error;

/// Why a weighted allocation could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// No weights, or they sum to zero.
    #[error("no positive weight to allocate against")]
    NoWeight,
    /// An intermediate product or sum exceeds the decimal range.
    #[error("allocation overflowed the decimal range")]
    Overflow,
}

/// Result of a weighted allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedAllocation {
    /// Allocated amounts, index-aligned with the weights.
    pub amounts: Vec<Decimal>,
    /// Amount added to the heaviest recipient during reconciliation.
    pub residual: Decimal,
    /// Index of the recipient that absorbed the residual.
    pub residual_index: usize,
}

/// Allocation utility for distributing amounts by weight.
pub struct AllocationUtil;

impl AllocationUtil {
    /// Allocates `total` proportionally to `weights`.
    ///
    /// Ensures the sum of allocations EXACTLY equals `total`, even when
    /// `total` carries more precision than `decimal_places`. Among equal
    /// heaviest weights, the first one absorbs the residual, so callers
    /// control the tie-break through the order of `weights`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::NoWeight` when there are no weights or they
    /// sum to zero, and `AllocationError::Overflow` when `total × weight`
    /// or a sum leaves the decimal range.
    pub fn allocate_by_weights(
        total: Decimal,
        weights: &[Decimal],
        decimal_places: u32,
    ) -> Result<WeightedAllocation, AllocationError> {
        let weight_sum = checked_sum(weights.iter().copied())?;
        if weights.is_empty() || weight_sum <= Decimal::ZERO {
            return Err(AllocationError::NoWeight);
        }

        let mut amounts = weights
            .iter()
            .map(|w| {
                total
                    .checked_mul(*w)
                    .and_then(|product| product.checked_div(weight_sum))
                    .map(|share| {
                        share.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero)
                    })
                    .ok_or(AllocationError::Overflow)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let allocated = checked_sum(amounts.iter().copied())?;
        let residual = total
            .checked_sub(allocated)
            .ok_or(AllocationError::Overflow)?;

        // First index holding the maximum weight.
        let residual_index = weights
            .iter()
            .enumerate()
            .fold(0, |best, (i, w)| if *w > weights[best] { i } else { best });

        amounts[residual_index] = amounts[residual_index]
            .checked_add(residual)
            .ok_or(AllocationError::Overflow)?;

        Ok(WeightedAllocation {
            amounts,
            residual,
            residual_index,
        })
    }
}

/// Sums decimals, failing instead of panicking on overflow.
pub(crate) fn checked_sum(
    values: impl IntoIterator<Item = Decimal>,
) -> Result<Decimal, AllocationError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .ok_or(AllocationError::Overflow)
}
