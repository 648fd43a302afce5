use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::external::auth_admin::AuthAdminError;
use crate::external::quote_provider::QuoteProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not enough coins: need {needed}, have {available}")]
    InsufficientCoins { needed: i64, available: i64 },
    #[error("Rate limited by external provider")]
    RateLimited,
    #[error("External error: {0}")]
    External(String),
    #[error("Unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let message = self.to_string();
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response(),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, Json(json!({ "error": msg }))).into_response(),
            AppError::InsufficientCoins { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": message }))).into_response()
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response(),
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (StatusCode::TOO_MANY_REQUESTS, headers, Json(json!({ "error": "Rate limited" }))).into_response()
            },
            AppError::External(msg) => (StatusCode::BAD_GATEWAY, Json(json!({ "error": msg }))).into_response(),
            AppError::Db(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Internal server error" }))).into_response()
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Db(value)
    }
}

impl From<QuoteProviderError> for AppError {
    fn from(value: QuoteProviderError) -> Self {
        match value {
            QuoteProviderError::RateLimited => AppError::RateLimited,
            QuoteProviderError::NotFound(symbol) => AppError::NotFound(format!("No quote for {}", symbol)),
            other => AppError::External(other.to_string()),
        }
    }
}

impl From<AuthAdminError> for AppError {
    fn from(value: AuthAdminError) -> Self {
        match value {
            AuthAdminError::Rejected(msg) => AppError::Validation(msg),
            AuthAdminError::NotConfigured => AppError::External("Auth provider is not configured".into()),
            other => AppError::External(other.to_string()),
        }
    }
}
