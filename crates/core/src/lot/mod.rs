//! Lot ledger: receipts, landed unit cost, FIFO consumption.

pub mod consumption;
pub mod error;
pub mod service;
pub mod types;
pub mod unit_cost;

#[cfg(test)]
mod consumption_props;

pub use consumption::{ConsumptionPlan, Draw, order_fifo, plan_fifo, plan_single};
pub use error::LotError;
pub use service::LotService;
pub use types::{CreateLotInput, LandedCost, Lot, LotFilter, StorageLocation};
pub use unit_cost::compute_unit_cost;
