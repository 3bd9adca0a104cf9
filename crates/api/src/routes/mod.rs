//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod events;
pub mod health;
pub mod inventory;
pub mod lots;
pub mod warehouse_fees;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(lots::routes())
        .merge(inventory::routes())
        .merge(warehouse_fees::routes())
        .merge(events::routes())
}
