//! Warehouse fee routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use stockwise_core::fee::{CreateFeeInput, FeeStatus, UpdateFeeInput, YearMonth};
use stockwise_db::WarehouseFeeRepository;
use tracing::info;

use crate::AppState;
use crate::error::{error_response, fee_error_response};

/// Creates the warehouse fee routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/warehouse-fees", get(list_fees).post(create_fee))
        .route(
            "/warehouse-fees/{year_month}",
            get(get_fee).put(update_fee).delete(delete_fee),
        )
        .route("/warehouse-fees/{year_month}/distribute", post(distribute))
        .route(
            "/warehouse-fees/{year_month}/distributions",
            get(list_distributions),
        )
}

/// Query parameters for listing fees.
#[derive(Debug, Deserialize)]
pub struct ListFeesQuery {
    /// Filter by status: "pending" or "distributed".
    pub status: Option<String>,
}

/// Request body for updating a pending fee.
#[derive(Debug, Deserialize)]
pub struct UpdateFeeRequest {
    /// New total.
    pub total_fee: Option<Decimal>,
    /// New memo; `null` clears it.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub memo: Option<Option<String>>,
}

/// Distinguishes an explicit `null` from an absent field.
fn deserialize_some<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn parse_year_month(raw: &str) -> Result<YearMonth, Response> {
    raw.parse::<YearMonth>().map_err(fee_error_response)
}

/// GET `/warehouse-fees` - List fees, newest month first.
async fn list_fees(
    State(state): State<AppState>,
    Query(query): Query<ListFeesQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        None => None,
        Some(s) => match FeeStatus::parse(s) {
            Some(status) => Some(status),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "INVALID_STATUS",
                    format!("Unknown fee status: {s}"),
                );
            }
        },
    };

    let repo = WarehouseFeeRepository::new((*state.db).clone());
    match repo.list_fees(status).await {
        Ok(fees) => (StatusCode::OK, Json(json!({ "data": fees }))).into_response(),
        Err(e) => fee_error_response(e),
    }
}

/// POST `/warehouse-fees` - Declare a monthly fee.
async fn create_fee(
    State(state): State<AppState>,
    Json(payload): Json<CreateFeeInput>,
) -> impl IntoResponse {
    let repo = WarehouseFeeRepository::new((*state.db).clone());

    match repo.create_fee(payload).await {
        Ok(fee) => (StatusCode::CREATED, Json(json!(fee))).into_response(),
        Err(e) => fee_error_response(e),
    }
}

/// GET `/warehouse-fees/{year_month}` - Get the fee of a month.
async fn get_fee(State(state): State<AppState>, Path(raw): Path<String>) -> impl IntoResponse {
    let year_month = match parse_year_month(&raw) {
        Ok(ym) => ym,
        Err(response) => return response,
    };
    let repo = WarehouseFeeRepository::new((*state.db).clone());

    match repo.find_fee(year_month).await {
        Ok(fee) => (StatusCode::OK, Json(json!(fee))).into_response(),
        Err(e) => fee_error_response(e),
    }
}

/// PUT `/warehouse-fees/{year_month}` - Edit a pending fee.
async fn update_fee(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Json(payload): Json<UpdateFeeRequest>,
) -> impl IntoResponse {
    let year_month = match parse_year_month(&raw) {
        Ok(ym) => ym,
        Err(response) => return response,
    };
    let repo = WarehouseFeeRepository::new((*state.db).clone());

    let input = UpdateFeeInput {
        total_fee: payload.total_fee,
        memo: payload.memo,
    };
    match repo.update_fee(year_month, input).await {
        Ok(fee) => (StatusCode::OK, Json(json!(fee))).into_response(),
        Err(e) => fee_error_response(e),
    }
}

/// DELETE `/warehouse-fees/{year_month}` - Delete a pending fee.
async fn delete_fee(State(state): State<AppState>, Path(raw): Path<String>) -> impl IntoResponse {
    let year_month = match parse_year_month(&raw) {
        Ok(ym) => ym,
        Err(response) => return response,
    };
    let repo = WarehouseFeeRepository::new((*state.db).clone());

    match repo.delete_fee(year_month).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => fee_error_response(e),
    }
}

/// POST `/warehouse-fees/{year_month}/distribute` - Run the distribution.
async fn distribute(State(state): State<AppState>, Path(raw): Path<String>) -> impl IntoResponse {
    let year_month = match parse_year_month(&raw) {
        Ok(ym) => ym,
        Err(response) => return response,
    };
    let repo = WarehouseFeeRepository::new((*state.db).clone());

    match repo
        .distribute(year_month, state.costing.fee_decimal_places)
        .await
    {
        Ok(result) => {
            info!(
                year_month = %year_month,
                lots = result.plan.lot_count(),
                "Distribution committed"
            );
            (StatusCode::OK, Json(json!(result))).into_response()
        }
        Err(e) => fee_error_response(e),
    }
}

/// GET `/warehouse-fees/{year_month}/distributions` - Allocation rows.
async fn list_distributions(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> impl IntoResponse {
    let year_month = match parse_year_month(&raw) {
        Ok(ym) => ym,
        Err(response) => return response,
    };
    let repo = WarehouseFeeRepository::new((*state.db).clone());

    match repo.list_distributions(year_month).await {
        Ok(rows) => (StatusCode::OK, Json(json!({ "data": rows }))).into_response(),
        Err(e) => fee_error_response(e),
    }
}
