use crate::server::Server;
use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Subscriptions Service API",
        version = "1.0.0",
        description = "Stores users' online subscriptions and sums their cost over a month range"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::db_health_check,
        crate::routes::subscriptions::create_subscription,
        crate::routes::subscriptions::list_subscriptions,
        crate::routes::subscriptions::get_total,
        crate::routes::subscriptions::get_subscription,
        crate::routes::subscriptions::update_subscription,
        crate::routes::subscriptions::delete_subscription,
    ),
    components(
        schemas(
            crate::routes::health::HealthCheckQuery,
            crate::error::ApiErrorResponse,
            crate::subscription::SubscriptionRequest,
            crate::subscription::TotalQuery,
            crate::subscription::ListQuery,
            crate::routes::subscriptions::SubscriptionResponse,
            crate::routes::subscriptions::TotalResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Subscriptions", description = "Subscription records and cost totals"),
    )
)]
pub struct ApiDoc;

/// Create documentation routes
pub fn create_docs_routes() -> Router<Server> {
    Router::new().route("/api/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
