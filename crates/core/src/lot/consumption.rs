//! Outbound allocation: deterministic FIFO drawdown of lots.
//!
//! Stock is always drawn from the earliest-received lot that still has
//! quantity remaining; lots received on the same day are drawn in
//! ascending id order. The planner is pure: it never mutates the lots it
//! is given, the caller applies the returned draws inside one database
//! transaction so that either every draw is committed or none is.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockwise_shared::types::LotId;

use super::error::LotError;
use super::types::Lot;

/// One lot's share of an outbound movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    /// Lot drawn from.
    pub lot_id: LotId,
    /// Quantity taken from the lot.
    pub quantity: Decimal,
    /// Lot quantity before the draw.
    pub remaining_before: Decimal,
    /// Lot quantity after the draw.
    pub remaining_after: Decimal,
    /// Landed unit cost of the lot.
    pub unit_cost: Decimal,
}

impl Draw {
    /// Landed cost of the drawn quantity.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.quantity * self.unit_cost
    }
}

/// Result of planning a consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionPlan {
    /// Quantity requested.
    pub requested: Decimal,
    /// Draws in the order they are applied.
    pub draws: Vec<Draw>,
}

impl ConsumptionPlan {
    /// Landed cost of goods leaving stock.
    #[must_use]
    pub fn cost_of_goods(&self) -> Decimal {
        self.draws.iter().map(Draw::cost).sum()
    }

    /// Total quantity drawn (equals `requested` for a valid plan).
    #[must_use]
    pub fn drawn(&self) -> Decimal {
        self.draws.iter().map(|d| d.quantity).sum()
    }
}

/// Sorts lots into FIFO consumption order.
pub fn order_fifo(lots: &mut [Lot]) {
    lots.sort_by_key(Lot::fifo_key);
}

/// Plans a FIFO consumption of `quantity` across `lots`.
///
/// The input does not need to be sorted. Lots without remaining stock are
/// skipped.
///
/// # Errors
///
/// Returns `LotError::NonPositiveQuantity` for a zero or negative request
/// and `LotError::InsufficientQuantity` if the lots together hold less
/// than `quantity`. No plan is produced in either case.
pub fn plan_fifo(lots: &[Lot], quantity: Decimal) -> Result<ConsumptionPlan, LotError> {
    if quantity <= Decimal::ZERO {
        return Err(LotError::NonPositiveQuantity(quantity));
    }

    let mut open: Vec<&Lot> = lots.iter().filter(|l| l.is_open()).collect();
    open.sort_by_key(|l| l.fifo_key());

    let available: Decimal = open.iter().map(|l| l.quantity_remaining).sum();
    if available < quantity {
        return Err(LotError::InsufficientQuantity {
            requested: quantity,
            available,
        });
    }

    let mut outstanding = quantity;
    let mut draws = Vec::new();
    for lot in open {
        if outstanding.is_zero() {
            break;
        }
        let take = outstanding.min(lot.quantity_remaining);
        draws.push(Draw {
            lot_id: lot.id,
            quantity: take,
            remaining_before: lot.quantity_remaining,
            remaining_after: lot.quantity_remaining - take,
            unit_cost: lot.unit_cost,
        });
        outstanding -= take;
    }

    Ok(ConsumptionPlan {
        requested: quantity,
        draws,
    })
}

/// Plans a consumption against one specific lot.
///
/// # Errors
///
/// Same as [`plan_fifo`], restricted to the single lot.
pub fn plan_single(lot: &Lot, quantity: Decimal) -> Result<ConsumptionPlan, LotError> {
    plan_fifo(std::slice::from_ref(lot), quantity)
}
