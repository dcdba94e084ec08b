use crate::{error::AppError, health::HealthService, server::Server};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HealthCheckQuery {
    /// `all` runs every registered check; a component name runs only that one
    #[serde(default)]
    pub check: Option<String>,
}

/// Create health check routes
///
/// `/health` reports through the shared health service; `/db/health` is the
/// plain-text database probe used by container orchestration.
pub fn create_health_routes() -> Router<Server> {
    Router::new()
        .route("/health", get(health_check))
        .route("/db/health", get(db_health_check))
}

/// Service health
#[utoipa::path(
    get,
    path = "/health",
    summary = "Health Check",
    tags = ["Health"],
    params(HealthCheckQuery),
    responses(
        (status = 200, description = "Overall health report")
    )
)]
pub async fn health_check(
    State(health_service): State<Arc<HealthService>>,
    Query(params): Query<HealthCheckQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = params.check.as_deref();
    let health_response = health_service.check_health(filter).await;

    let response_json = serde_json::to_value(&health_response)
        .map_err(|e| AppError::Internal(format!("Failed to serialize health response: {}", e)))?;

    Ok(Json(response_json))
}

/// Database connectivity probe
#[utoipa::path(
    get,
    path = "/db/health",
    summary = "Database Health",
    tags = ["Health"],
    responses(
        (status = 200, description = "Database reachable", body = String),
        (status = 500, description = "Database unreachable", body = String)
    )
)]
pub async fn db_health_check(State(server): State<Server>) -> (StatusCode, String) {
    match server.database.health_check().await {
        Ok(()) => (StatusCode::OK, "db ok".to_string()),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("db not ok: {}", err),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestServerBuilder;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let server = TestServerBuilder::new().build().await;
        create_health_routes().with_state(server)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check_basic() {
        let (status, body) = get_json(test_app().await, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Healthy");
        assert_eq!(body["summary"]["total_checks"], 0);
    }

    #[tokio::test]
    async fn test_health_check_with_all_query() {
        let (status, body) = get_json(test_app().await, "/health?check=all").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["database"]["status"], "Healthy");
    }

    #[tokio::test]
    async fn test_health_check_with_unknown_query() {
        let (status, body) = get_json(test_app().await, "/health?check=unknown").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["total_checks"], 0);
    }

    #[tokio::test]
    async fn test_db_health_check() {
        let app = test_app().await;
        let request = Request::builder()
            .uri("/db/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"db ok");
    }
}
