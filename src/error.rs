use crate::database::DatabaseError;
use crate::subscription::SubscriptionError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug)]
pub enum AppError {
    Config(config::ConfigError),
    Database(DatabaseError),
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error category
    pub error: String,
    /// Human-readable detail
    pub message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "Configuration error: {}", err),
            AppError::Database(err) => write!(f, "{}", err),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<SubscriptionError> for AppError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::InvalidFormat(_)
            | SubscriptionError::Validation { .. }
            | SubscriptionError::TotalOverflow => AppError::BadRequest(err.to_string()),
            SubscriptionError::NotFound(_) => AppError::NotFound("subscription not found".to_string()),
            SubscriptionError::Repository(msg) => AppError::Database(DatabaseError::Database(msg)),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            AppError::Config(_) => "Configuration error",
            AppError::Database(_) => "Database error",
            AppError::BadRequest(_) => "Bad request",
            AppError::NotFound(_) => "Not found",
            AppError::Internal(_) => "Internal server error",
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let config_err = AppError::Config(config::ConfigError::NotFound("test".to_string()));
        assert!(config_err.to_string().contains("Configuration error"));

        let internal_err = AppError::Internal("test message".to_string());
        assert_eq!(internal_err.to_string(), "Internal error: test message");

        let bad_request = AppError::BadRequest("price: must be >= 0".to_string());
        assert_eq!(bad_request.to_string(), "Bad request: price: must be >= 0");
    }

    #[test]
    fn test_subscription_errors_map_to_status() {
        let cases = [
            (
                SubscriptionError::InvalidFormat("x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                SubscriptionError::validation("user_id", "is required"),
                StatusCode::BAD_REQUEST,
            ),
            (
                SubscriptionError::NotFound("abc".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (SubscriptionError::TotalOverflow, StatusCode::BAD_REQUEST),
            (
                SubscriptionError::Repository("down".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = AppError::from(SubscriptionError::validation("start_date", "must be MM-YYYY"));
        assert_eq!(err.to_string(), "Bad request: start_date: must be MM-YYYY");
    }

    #[test]
    fn test_app_error_into_response() {
        let config_err = AppError::Config(config::ConfigError::NotFound("test".to_string()));
        assert_eq!(
            config_err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let db_err = AppError::Database(DatabaseError::Migration("boom".to_string()));
        assert_eq!(
            db_err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
