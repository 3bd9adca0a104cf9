//! Read-only inventory rollups.
//!
//! This module derives, from lots alone:
//! - Per-product summary (quantity, weighted average cost, current value)
//! - Per-lot detail with fee-inclusive unit cost
//! - Overview across every product

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::InventoryAggregator;
pub use types::*;
