//! Mapping of domain errors to HTTP responses.
//!
//! Every error body has the shape `{"error": CODE, "message": text}`.
//! Server-side failures are logged and their details withheld.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use stockwise_core::fee::FeeError;
use stockwise_core::lot::LotError;
use stockwise_shared::AppError;
use tracing::error;

/// Builds an error response.
pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into()
        })),
    )
        .into_response()
}

fn from_parts(status_code: u16, code: &str, message: String) -> Response {
    let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(code, error = %message, "Request failed");
        return error_response(status, "INTERNAL_ERROR", "An error occurred");
    }
    error_response(status, code, message)
}

/// Converts a lot ledger error into a response.
pub fn lot_error_response(e: LotError) -> Response {
    from_parts(e.status_code(), e.error_code(), e.to_string())
}

/// Converts a warehouse fee error into a response.
pub fn fee_error_response(e: FeeError) -> Response {
    from_parts(e.status_code(), e.error_code(), e.to_string())
}

/// Converts a generic application error into a response.
pub fn app_error_response(e: AppError) -> Response {
    from_parts(e.status_code(), e.error_code(), e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use stockwise_core::fee::YearMonth;
    use stockwise_shared::types::LotId;

    async fn body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[rstest]
    #[case(LotError::NonPositiveQuantity(Decimal::ZERO), StatusCode::BAD_REQUEST)]
    #[case(LotError::AmountOutOfRange("unit cost"), StatusCode::BAD_REQUEST)]
    #[case(LotError::LotNotFound(LotId::new()), StatusCode::NOT_FOUND)]
    #[case(
        LotError::InsufficientQuantity { requested: Decimal::TEN, available: Decimal::ONE },
        StatusCode::UNPROCESSABLE_ENTITY
    )]
    #[case(
        LotError::HasDistributions { lot_id: LotId::new(), distributions: 2 },
        StatusCode::CONFLICT
    )]
    #[tokio::test]
    async fn test_lot_error_status(#[case] err: LotError, #[case] status: StatusCode) {
        let code = err.error_code();
        let response = lot_error_response(err);
        assert_eq!(response.status(), status);
        assert_eq!(body(response).await["error"], code);
    }

    #[tokio::test]
    async fn test_fee_error_already_distributed() {
        let month = YearMonth::new(2024, 3).unwrap();
        let response = fee_error_response(FeeError::AlreadyDistributed(month));
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body(response).await;
        assert_eq!(body["error"], "ALREADY_DISTRIBUTED");
        assert_eq!(
            body["message"],
            "Warehouse fee for 2024-03 has already been distributed"
        );
    }

    #[tokio::test]
    async fn test_database_error_is_masked() {
        let response = fee_error_response(FeeError::Database("connection refused".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body(response).await;
        assert_eq!(body["error"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_app_error_validation() {
        let response = app_error_response(AppError::Validation("bad".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
