//! Inventory event intake.

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use serde_json::json;
use stockwise_core::events::InventoryEvent;
use stockwise_db::InventoryEventHandler;

use crate::AppState;
use crate::error::lot_error_response;

/// Creates the event routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/inventory-events", post(handle_event))
}

/// POST `/inventory-events` - Apply a `lot_received` or `stock_consumed` event.
async fn handle_event(
    State(state): State<AppState>,
    Json(event): Json<InventoryEvent>,
) -> impl IntoResponse {
    let handler = InventoryEventHandler::new((*state.db).clone());

    match handler.handle(event).await {
        Ok(outcome) => (StatusCode::OK, Json(json!(outcome))).into_response(),
        Err(e) => lot_error_response(e),
    }
}
