use crate::{
    routes::{create_docs_routes, create_health_routes, create_subscription_routes},
    server::Server,
};
use axum::Router;

/// Versioned prefix of the public API
pub const API_V1_PREFIX: &str = "/api/v1";

/// Assemble every route group, still awaiting the `Server` state
pub fn build_routes() -> Router<Server> {
    Router::new()
        .merge(create_health_routes())
        .merge(create_docs_routes())
        .nest(API_V1_PREFIX, create_subscription_routes())
}

/// Middleware factory functions for common patterns
pub mod middleware_factories {
    use axum::{body::Body, extract::Request, middleware::Next, response::Response};
    use std::time::Instant;
    use tracing::info;

    /// Request/response logging middleware
    pub async fn request_response_logger(req: Request<Body>, next: Next) -> Response {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        info!(method = %method, path = %path, "API request");

        let start = Instant::now();
        let response = next.run(req).await;
        let duration = start.elapsed();

        info!(
            method = %method,
            path = %path,
            status = %response.status().as_u16(),
            latency_ms = %duration.as_millis(),
            "API response"
        );

        response
    }
}
