//! Inventory rollup types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockwise_shared::types::{LotId, ProductId};

use crate::lot::StorageLocation;

/// Stock position and valuation of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product.
    pub product_id: ProductId,
    /// Sum of remaining quantity across lots.
    pub quantity: Decimal,
    /// Landed value divided by quantity, zero without stock.
    pub avg_unit_cost: Decimal,
    /// Sum of `quantity_remaining × unit_cost`.
    pub landed_value: Decimal,
    /// Sum of absorbed warehouse fees across all lots.
    pub accumulated_warehouse_fee: Decimal,
    /// Landed value plus absorbed fees.
    pub current_value: Decimal,
    /// Number of lots, exhausted ones included.
    pub lot_count: u32,
    /// Number of lots with stock.
    pub open_lot_count: u32,
}

/// One lot as seen by inventory queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotDetail {
    /// Lot ID.
    pub lot_id: LotId,
    /// Human label, if any.
    pub lot_code: Option<String>,
    /// Receipt date.
    pub received_date: NaiveDate,
    /// Quantity received.
    pub quantity_received: Decimal,
    /// Quantity on hand.
    pub quantity_remaining: Decimal,
    /// Landed unit cost.
    pub unit_cost: Decimal,
    /// Sum of fees distributed to the lot.
    pub accumulated_warehouse_fee: Decimal,
    /// Unit cost including absorbed fees.
    pub current_unit_cost: Decimal,
    /// `quantity_remaining × unit_cost`.
    pub landed_value: Decimal,
    /// Where the stock is held.
    pub storage_location: StorageLocation,
}
