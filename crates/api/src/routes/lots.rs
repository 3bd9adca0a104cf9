//! Lot ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use stockwise_core::lot::{CreateLotInput, LotFilter, StorageLocation};
use stockwise_db::LotRepository;
use stockwise_shared::AppError;
use stockwise_shared::types::{LotId, PageRequest, ProductId, SourceTransactionId};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{app_error_response, error_response, lot_error_response};

/// Creates the lot routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lots", get(list_lots).post(create_lot))
        .route("/lots/{lot_id}", get(get_lot).delete(delete_lot))
        .route(
            "/lots/{lot_id}/storage-location",
            patch(change_storage_location),
        )
        .route("/lots/{lot_id}/consume", post(consume_lot))
}

/// Query parameters for listing lots.
#[derive(Debug, Deserialize)]
pub struct ListLotsQuery {
    /// Filter by product.
    pub product_id: Option<Uuid>,
    /// Received on or after (YYYY-MM-DD).
    pub received_from: Option<NaiveDate>,
    /// Received on or before (YYYY-MM-DD).
    pub received_to: Option<NaiveDate>,
    /// Filter by storage location.
    pub storage_location: Option<String>,
    /// Filter by originating import/export record.
    pub source_transaction_id: Option<Uuid>,
    /// Only lots with stock remaining.
    #[serde(default)]
    pub open_only: bool,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for moving a lot.
#[derive(Debug, Deserialize)]
pub struct ChangeStorageLocationRequest {
    /// New location.
    pub storage_location: StorageLocation,
}

/// Request body for a drawdown.
#[derive(Debug, Deserialize)]
pub struct ConsumeRequest {
    /// Quantity leaving stock.
    pub quantity: Decimal,
}

/// GET `/lots` - List lots in FIFO order.
async fn list_lots(
    State(state): State<AppState>,
    Query(query): Query<ListLotsQuery>,
) -> impl IntoResponse {
    let storage_location = match query.storage_location.as_deref() {
        None => None,
        Some(s) => match StorageLocation::parse(s) {
            Some(location) => Some(location),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "INVALID_STORAGE_LOCATION",
                    format!("Unknown storage location: {s}"),
                );
            }
        },
    };

    if let (Some(from), Some(to)) = (query.received_from, query.received_to) {
        if from > to {
            return app_error_response(AppError::Validation(
                "received_from must not be after received_to".to_string(),
            ));
        }
    }

    let filter = LotFilter {
        product_id: query.product_id.map(ProductId::from_uuid),
        received_from: query.received_from,
        received_to: query.received_to,
        storage_location,
        source_transaction_id: query.source_transaction_id.map(SourceTransactionId::from_uuid),
        open_only: query.open_only,
    };
    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(50),
    };

    let repo = LotRepository::new((*state.db).clone());
    match repo.list_lots(&filter, page).await {
        Ok(lots) => (StatusCode::OK, Json(json!(lots))).into_response(),
        Err(e) => lot_error_response(e),
    }
}

/// POST `/lots` - Register a receipt.
async fn create_lot(
    State(state): State<AppState>,
    Json(payload): Json<CreateLotInput>,
) -> impl IntoResponse {
    let repo = LotRepository::new((*state.db).clone());

    match repo.create_lot(payload).await {
        Ok(lot) => (StatusCode::CREATED, Json(json!(lot))).into_response(),
        Err(e) => lot_error_response(e),
    }
}

/// GET `/lots/{lot_id}` - Get a lot.
async fn get_lot(State(state): State<AppState>, Path(lot_id): Path<Uuid>) -> impl IntoResponse {
    let repo = LotRepository::new((*state.db).clone());

    match repo.find_lot(LotId::from_uuid(lot_id)).await {
        Ok(lot) => (StatusCode::OK, Json(json!(lot))).into_response(),
        Err(e) => lot_error_response(e),
    }
}

/// DELETE `/lots/{lot_id}` - Delete a lot without fee history.
async fn delete_lot(State(state): State<AppState>, Path(lot_id): Path<Uuid>) -> impl IntoResponse {
    let repo = LotRepository::new((*state.db).clone());

    match repo.delete_lot(LotId::from_uuid(lot_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => lot_error_response(e),
    }
}

/// PATCH `/lots/{lot_id}/storage-location` - Move a lot.
async fn change_storage_location(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
    Json(payload): Json<ChangeStorageLocationRequest>,
) -> impl IntoResponse {
    let repo = LotRepository::new((*state.db).clone());

    match repo
        .change_storage_location(LotId::from_uuid(lot_id), payload.storage_location)
        .await
    {
        Ok(lot) => {
            info!(lot_id = %lot.id, location = %lot.storage_location, "Lot moved");
            (StatusCode::OK, Json(json!(lot))).into_response()
        }
        Err(e) => lot_error_response(e),
    }
}

/// POST `/lots/{lot_id}/consume` - Draw from one lot.
async fn consume_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
    Json(payload): Json<ConsumeRequest>,
) -> impl IntoResponse {
    let repo = LotRepository::new((*state.db).clone());

    match repo
        .consume_lot(LotId::from_uuid(lot_id), payload.quantity)
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
