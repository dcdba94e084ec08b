use crate::{
    error::{ApiErrorResponse, AppError},
    server::Server,
    subscription::{
        ListQuery, Subscription, SubscriptionRequest, TotalQuery, validate_list_query,
        validate_subscription, validate_total_query,
    },
};
use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Create subscription CRUD and aggregation routes
pub fn create_subscription_routes() -> Router<Server> {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route("/subscriptions/total", get(get_total))
        .route(
            "/subscriptions/{id}",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
}

/// Subscription as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: String,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    /// First billed month, `MM-YYYY`
    pub start_date: String,
    /// Last billed month, `MM-YYYY`; null while active
    pub end_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            service_name: subscription.service_name,
            price: subscription.price,
            user_id: subscription.user_id,
            start_date: subscription.start_month.to_string(),
            end_date: subscription.end_month.map(|m| m.to_string()),
            created_at: subscription.created_at,
            updated_at: subscription.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TotalResponse {
    /// Sum of monthly prices over the billable months of the period
    pub total: i64,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Create a subscription
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions",
    summary = "Create Subscription",
    tags = ["Subscriptions"],
    request_body = SubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Invalid request body", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    )
)]
pub async fn create_subscription(
    State(server): State<Server>,
    payload: Result<Json<SubscriptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    let input = validate_subscription(&body(payload)?)?;
    let created = server.subscriptions.create(&input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List subscriptions, newest first
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions",
    summary = "List Subscriptions",
    tags = ["Subscriptions"],
    params(ListQuery),
    responses(
        (status = 200, description = "Matching subscriptions", body = Vec<SubscriptionResponse>),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    )
)]
pub async fn list_subscriptions(
    State(server): State<Server>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<SubscriptionResponse>>, AppError> {
    let filter = validate_list_query(&query(params)?);
    let subscriptions = server.subscriptions.list(&filter).await?;
    Ok(Json(subscriptions.into_iter().map(Into::into).collect()))
}

/// Total cost of a user's subscriptions over a month range
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/total",
    summary = "Total Subscription Cost",
    description = "Sum of monthly prices over every month of the inclusive period in which a matching subscription is active",
    tags = ["Subscriptions"],
    params(TotalQuery),
    responses(
        (status = 200, description = "Total cost", body = TotalResponse),
        (status = 400, description = "Missing or malformed query parameter", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    )
)]
pub async fn get_total(
    State(server): State<Server>,
    params: Result<Query<TotalQuery>, QueryRejection>,
) -> Result<Json<TotalResponse>, AppError> {
    let (filter, period) = validate_total_query(&query(params)?)?;
    let total = server.subscriptions.total(&filter, &period).await?;
    Ok(Json(TotalResponse { total }))
}

/// Get a subscription by id
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/{id}",
    summary = "Get Subscription",
    tags = ["Subscriptions"],
    params(("id" = String, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription", body = SubscriptionResponse),
        (status = 404, description = "Subscription not found", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    )
)]
pub async fn get_subscription(
    State(server): State<Server>,
    Path(id): Path<String>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let subscription = server.subscriptions.get(&id).await?;
    Ok(Json(subscription.into()))
}

/// Replace every field of a subscription
#[utoipa::path(
    put,
    path = "/api/v1/subscriptions/{id}",
    summary = "Update Subscription",
    tags = ["Subscriptions"],
    params(("id" = String, Path, description = "Subscription id")),
    request_body = SubscriptionRequest,
    responses(
        (status = 200, description = "Updated subscription", body = SubscriptionResponse),
        (status = 400, description = "Invalid request body", body = ApiErrorResponse),
        (status = 404, description = "Subscription not found", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    )
)]
pub async fn update_subscription(
    State(server): State<Server>,
    Path(id): Path<String>,
    payload: Result<Json<SubscriptionRequest>, JsonRejection>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let input = validate_subscription(&body(payload)?)?;
    let updated = server.subscriptions.update(&id, &input).await?;
    Ok(Json(updated.into()))
}

/// Delete a subscription
#[utoipa::path(
    delete,
    path = "/api/v1/subscriptions/{id}",
    summary = "Delete Subscription",
    tags = ["Subscriptions"],
    params(("id" = String, Path, description = "Subscription id")),
    responses(
        (status = 204, description = "Subscription deleted"),
        (status = 404, description = "Subscription not found", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    )
)]
pub async fn delete_subscription(
    State(server): State<Server>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    server.subscriptions.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
