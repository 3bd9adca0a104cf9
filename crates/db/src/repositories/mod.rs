//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod inventory;
pub mod inventory_event;
pub mod lot;
pub mod product;
pub mod warehouse_fee;

pub use inventory::InventoryRepository;
pub use inventory_event::InventoryEventHandler;
pub use lot::LotRepository;
pub use product::{CreateProductInput, ProductRepository};
pub use warehouse_fee::{DistributionResult, WarehouseFeeRepository};
