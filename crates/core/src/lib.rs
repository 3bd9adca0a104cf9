//! Core costing logic for Stockwise.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; the `db`
//! crate loads rows, calls into these services, and persists the results
//! inside a single database transaction.
//!
//! # Modules
//!
//! - `lot` - Lot ledger: landed unit cost, FIFO consumption, deletion rules
//! - `fee` - Monthly warehouse fee lifecycle and value-weighted distribution
//! - `inventory` - Read-only rollups per product and per lot
//! - `events` - Domain events emitted by trade and sales modules

pub mod events;
pub mod fee;
pub mod inventory;
pub mod lot;
