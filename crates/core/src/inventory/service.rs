//! Inventory aggregation service.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use stockwise_shared::types::ProductId;

use super::types::{LotDetail, ProductSummary};
use crate::lot::{Lot, order_fifo};

/// Service deriving inventory views from lots.
///
/// Nothing is cached: callers pass the lots as currently committed.
pub struct InventoryAggregator;

impl InventoryAggregator {
    /// Summarizes the lots of one product.
    ///
    /// Lots of other products are ignored. Exhausted lots still contribute
    /// their absorbed fees to `accumulated_warehouse_fee` and `current_value`.
    #[must_use]
    pub fn product_summary(product_id: ProductId, lots: &[Lot]) -> ProductSummary {
        let mut summary = ProductSummary {
            product_id,
            quantity: Decimal::ZERO,
            avg_unit_cost: Decimal::ZERO,
            landed_value: Decimal::ZERO,
            accumulated_warehouse_fee: Decimal::ZERO,
            current_value: Decimal::ZERO,
            lot_count: 0,
            open_lot_count: 0,
        };

        for lot in lots.iter().filter(|l| l.product_id == product_id) {
            summary.quantity += lot.quantity_remaining;
            summary.landed_value += lot.landed_value();
            summary.accumulated_warehouse_fee += lot.accumulated_warehouse_fee;
            summary.lot_count += 1;
            if lot.is_open() {
                summary.open_lot_count += 1;
            }
        }

        if summary.quantity > Decimal::ZERO {
            summary.avg_unit_cost = summary.landed_value / summary.quantity;
        }
        summary.current_value = summary.landed_value + summary.accumulated_warehouse_fee;

        summary
    }

    /// Lists the lots of one product in FIFO order.
    #[must_use]
    pub fn lot_detail(product_id: ProductId, lots: &[Lot]) -> Vec<LotDetail> {
        let mut own: Vec<Lot> = lots
            .iter()
            .filter(|l| l.product_id == product_id)
            .cloned()
            .collect();
        order_fifo(&mut own);

        own.iter().map(Self::detail).collect()
    }

    /// Summarizes every product that has at least one lot, ordered by id.
    #[must_use]
    pub fn overview(lots: &[Lot]) -> Vec<ProductSummary> {
        let mut by_product: BTreeMap<ProductId, Vec<Lot>> = BTreeMap::new();
        for lot in lots {
            by_product.entry(lot.product_id).or_default().push(lot.clone());
        }

        by_product
            .into_iter()
            .map(|(product_id, lots)| Self::product_summary(product_id, &lots))
            .collect()
    }

    fn detail(lot: &Lot) -> LotDetail {
        LotDetail {
            lot_id: lot.id,
            lot_code: lot.lot_code.clone(),
            received_date: lot.received_date,
            quantity_received: lot.quantity_received,
            quantity_remaining: lot.quantity_remaining,
            unit_cost: lot.unit_cost,
            accumulated_warehouse_fee: lot.accumulated_warehouse_fee,
            current_unit_cost: lot.current_unit_cost(),
            landed_value: lot.landed_value(),
            storage_location: lot.storage_location,
        }
    }
}
