//! Dispatches inventory events to the lot ledger.

use sea_orm::{DatabaseConnection, TransactionTrait};
use stockwise_core::events::{ConsumptionTarget, EventOutcome, InventoryEvent};
use stockwise_core::lot::LotError;
use tracing::info;

use super::lot::{consume_lot_in, consume_product_in, create_lot_in};

/// Applies `InventoryEvent`s published by trade and sales modules.
///
/// Each event is handled in its own transaction.
#[derive(Debug, Clone)]
pub struct InventoryEventHandler {
    db: DatabaseConnection,
}

impl InventoryEventHandler {
    /// Creates a new event handler.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies one event.
    ///
    /// # Errors
    ///
    /// Returns the ledger error of the underlying operation; nothing is
    /// written in that case.
    pub async fn handle(&self, event: InventoryEvent) -> Result<EventOutcome, LotError> {
        info!(event = event.name(), "Handling inventory event");

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        let outcome = match event {
            InventoryEvent::LotReceived(input) => EventOutcome::LotCreated {
                lot: create_lot_in(&txn, input).await?,
            },
            InventoryEvent::StockConsumed(consume) => {
                let plan = match consume.target {
                    ConsumptionTarget::Lot(lot_id) => {
                        consume_lot_in(&txn, lot_id, consume.quantity).await?
                    }
                    ConsumptionTarget::Product(product_id) => {
                        consume_product_in(&txn, product_id, consume.quantity).await?
                    }
                };
                EventOutcome::StockConsumed {
                    plan,
                    reference: consume.reference,
                }
            }
        };

        txn.commit()
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        Ok(outcome)
    }
}
