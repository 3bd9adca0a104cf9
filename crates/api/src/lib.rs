//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for lots, inventory, warehouse fees and events
//! - Error-to-response mapping
//! - Shared application state

pub mod error;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use stockwise_shared::CostingConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Costing settings (fee rounding).
    pub costing: CostingConfig,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            costing: CostingConfig::default(),
        })
    }

    async fn call(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(
            Request::get("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_invalid_year_month_is_rejected_before_storage() {
        let (status, body) = call(
            Request::post("/api/v1/warehouse-fees/2024-13/distribute")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_YEAR_MONTH");
    }

    #[tokio::test]
    async fn test_invalid_storage_location_filter() {
        let (status, body) = call(
            Request::get("/api/v1/lots?storage_location=basement")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_STORAGE_LOCATION");
    }

    #[tokio::test]
    async fn test_invalid_fee_status_filter() {
        let (status, body) = call(
            Request::get("/api/v1/warehouse-fees?status=archived")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_STATUS");
    }

    #[tokio::test]
    async fn test_readiness_without_database() {
        let (status, body) = call(
            Request::get("/api/v1/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_inverted_date_range_is_rejected() {
        let (status, body) = call(
            Request::get("/api/v1/lots?received_from=2024-03-01&received_to=2024-01-01")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
}
