use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::CreateUser;
use crate::services::profile_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = state.admin_api_token.as_deref() else {
        warn!("Admin request rejected: ADMIN_API_TOKEN is not configured");
        return Err(AppError::Unauthorized);
    };
    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match provided {
        Some(token) if token == expected => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    info!("POST /admin/users - Creating user");
    authorize(&state, &headers)?;
    let input: CreateUser = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;

    let (user, profile) = profile_service::create_user(&state.pool, &state.auth_admin, input).await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            e
        })?;
    Ok(Json(json!({ "user": user, "profile": profile })))
}
