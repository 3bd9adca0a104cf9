//! Domain events consumed by the costing engine.
//!
//! Trade and sales modules never touch lots directly. A registered import
//! publishes `LotReceived`; an outbound shipment or sale publishes
//! `StockConsumed`. The database layer dispatches each event to the lot
//! ledger inside a single transaction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockwise_shared::types::{LotId, ProductId};

use crate::lot::{ConsumptionPlan, CreateLotInput, Lot};

/// An event affecting stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum InventoryEvent {
    /// Goods arrived and form a new lot.
    LotReceived(CreateLotInput),
    /// Goods left stock.
    StockConsumed(ConsumeStock),
}

impl InventoryEvent {
    /// Event name as used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LotReceived(_) => "lot_received",
            Self::StockConsumed(_) => "stock_consumed",
        }
    }
}

/// What an outbound movement draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ConsumptionTarget {
    /// One specific lot.
    Lot(LotId),
    /// Any lots of the product, FIFO.
    Product(ProductId),
}

/// Payload of `StockConsumed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeStock {
    /// Lot or product to draw from.
    pub target: ConsumptionTarget,
    /// Quantity leaving stock.
    pub quantity: Decimal,
    /// Outbound document reference (sales order, shipment number).
    #[serde(default)]
    pub reference: Option<String>,
}

/// Result of handling an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    /// A lot was registered.
    LotCreated {
        /// The new lot.
        lot: Lot,
    },
    /// Stock was drawn down.
    StockConsumed {
        /// The applied draws.
        plan: ConsumptionPlan,
        /// Echo of the outbound reference.
        reference: Option<String>,
    },
}
