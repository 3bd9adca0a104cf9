//! Landed unit cost calculation.

use rust_decimal::Decimal;

use super::error::LotError;
use super::types::LandedCost;

/// Computes the landed unit cost of a receipt.
///
/// `unit_cost = (goods + duty + freight + other) / quantity_received`
///
/// The result is not rounded: it feeds further multiplication and any
/// rounding belongs to presentation.
///
/// # Errors
///
/// Returns `LotError::NonPositiveQuantity` if `quantity_received <= 0`,
/// `LotError::NegativeCost` if any component is negative and
/// `LotError::AmountOutOfRange` if the total or the quotient overflows.
pub fn compute_unit_cost(
    goods_amount: Decimal,
    duty_amount: Decimal,
    domestic_freight: Decimal,
    other_cost: Decimal,
    quantity_received: Decimal,
) -> Result<Decimal, LotError> {
    if quantity_received <= Decimal::ZERO {
        return Err(LotError::NonPositiveQuantity(quantity_received));
    }

    for (component, amount) in [
        ("goods_amount", goods_amount),
        ("duty_amount", duty_amount),
        ("domestic_freight", domestic_freight),
        ("other_cost", other_cost),
    ] {
        if amount < Decimal::ZERO {
            return Err(LotError::NegativeCost { component, amount });
        }
    }

    let total = LandedCost {
        goods_amount,
        duty_amount,
        domestic_freight,
        other_cost,
    }
    .total()
    .ok_or(LotError::AmountOutOfRange("landed cost total"))?;

    total
        .checked_div(quantity_received)
        .ok_or(LotError::AmountOutOfRange("unit cost"))
}

impl LandedCost {
    /// Landed unit cost of these components over `quantity_received`.
    ///
    /// # Errors
    ///
    /// See [`compute_unit_cost`].
    pub fn unit_cost(&self, quantity_received: Decimal) -> Result<Decimal, LotError> {
        compute_unit_cost(
            self.goods_amount,
            self.duty_amount,
            self.domestic_freight,
            self.other_cost,
            quantity_received,
        )
    }
}
