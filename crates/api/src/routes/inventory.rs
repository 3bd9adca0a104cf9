//! Inventory query and product drawdown routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use stockwise_db::{InventoryRepository, LotRepository};
use stockwise_shared::types::ProductId;
use uuid::Uuid;

use crate::AppState;
use crate::error::lot_error_response;
use crate::routes::lots::ConsumeRequest;

/// Creates the inventory routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(overview))
        .route("/products/{product_id}/inventory", get(product_summary))
        .route("/products/{product_id}/lots", get(lot_detail))
        .route("/products/{product_id}/consume", post(consume_product))
}

/// GET `/inventory` - Summary of every product with lots.
async fn overview(State(state): State<AppState>) -> impl IntoResponse {
    let repo = InventoryRepository::new((*state.db).clone());

    match repo.overview().await {
        Ok(summaries) => (StatusCode::OK, Json(json!({ "data": summaries }))).into_response(),
        Err(e) => lot_error_response(e),
    }
}

/// GET `/products/{product_id}/inventory` - Stock and valuation of a product.
async fn product_summary(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InventoryRepository::new((*state.db).clone());

    match repo.product_summary(ProductId::from_uuid(product_id)).await {
        Ok(summary) => (StatusCode::OK, Json(json!(summary))).into_response(),
        Err(e) => lot_error_response(e),
    }
}

/// GET `/products/{product_id}/lots` - Lots of a product, FIFO.
async fn lot_detail(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InventoryRepository::new((*state.db).clone());

    match repo.lot_detail(ProductId::from_uuid(product_id)).await {
        Ok(lots) => (StatusCode::OK, Json(json!({ "data": lots }))).into_response(),
        Err(e) => lot_error_response(e),
    }
}

/// POST `/products/{product_id}/consume` - Draw a product down FIFO.
async fn consume_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<ConsumeRequest>,
) -> impl IntoResponse {
    let repo = LotRepository::new((*state.db).clone());

    match repo
        .consume_product(ProductId::from_uuid(product_id), payload.quantity)
        .await
    {
        Ok(plan) => (
            StatusCode::OK,
            Json(json!({
                "draws": plan.draws,
                "quantity": plan.drawn(),
                "cost_of_goods": plan.cost_of_goods()
            })),
        )
            .into_response(),
        Err(e) => lot_error_response(e),
    }
}
