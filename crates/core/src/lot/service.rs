//! Lot service: validation and construction rules for the lot ledger.

use rust_decimal::Decimal;
use stockwise_shared::types::LotId;

use super::error::LotError;
use super::types::{CreateLotInput, Lot};

/// Stateless service for lot ledger rules.
///
/// The database layer checks existence of referenced rows, then calls into
/// this service so every rule lives in one place.
pub struct LotService;

impl LotService {
    /// Builds a new lot from a receipt.
    ///
    /// Computes the landed unit cost, starts the lot full
    /// (`quantity_remaining = quantity_received`) with no absorbed fees.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive quantity or a negative
    /// cost component.
    pub fn build_lot(id: LotId, input: CreateLotInput) -> Result<Lot, LotError> {
        let unit_cost = input.costs.unit_cost(input.quantity_received)?;

        Ok(Lot {
            id,
            product_id: input.product_id,
            lot_code: input.lot_code.filter(|c| !c.trim().is_empty()),
            source_transaction_id: input.source_transaction_id,
            received_date: input.received_date,
            quantity_received: input.quantity_received,
            quantity_remaining: input.quantity_received,
            costs: input.costs,
            unit_cost,
            accumulated_warehouse_fee: Decimal::ZERO,
            storage_location: input.storage_location,
            memo: input.memo,
        })
    }

    /// Checks that a lot may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `LotError::HasDistributions` if any warehouse fee
    /// distribution references the lot.
    pub fn ensure_deletable(lot_id: LotId, distributions: u64) -> Result<(), LotError> {
        if distributions > 0 {
            return Err(LotError::HasDistributions {
                lot_id,
                distributions,
            });
        }
        Ok(())
    }
}
