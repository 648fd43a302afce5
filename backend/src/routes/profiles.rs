use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Profile;
use crate::services::profile_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:user_id", get(get_profile))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Profile>, AppError> {
    info!("GET /profiles/{} - Fetching profile", user_id);
    let profile = profile_service::fetch_one(&state.pool, user_id).await
        .map_err(|e| {
            error!("Failed to fetch profile {}: {}", user_id, e);
            e
        })?;
    Ok(Json(profile))
}
