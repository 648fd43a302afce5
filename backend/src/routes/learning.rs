use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CompletedModule, LearningModule, LearningOverview};
use crate::services::learning_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/modules", get(list_modules))
        .route("/:user_id", get(get_progress))
        .route("/:user_id/complete/:module_id", post(complete_module))
}

pub async fn list_modules() -> Json<Vec<LearningModule>> {
    info!("GET /learning/modules - Listing modules");
    Json(learning_service::catalog())
}

pub async fn get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<LearningOverview>, AppError> {
    info!("GET /learning/{} - Fetching progress", user_id);
    let overview = learning_service::overview(&state.pool, user_id).await
        .map_err(|e| {
            error!("Failed to fetch learning progress for {}: {}", user_id, e);
            e
        })?;
    Ok(Json(overview))
}

pub async fn complete_module(
    State(state): State<AppState>,
    Path((user_id, module_id)): Path<(Uuid, String)>,
) -> Result<Json<CompletedModule>, AppError> {
    info!("POST /learning/{}/complete/{} - Completing module", user_id, module_id);
    let completed = learning_service::complete_module(&state.pool, user_id, &module_id).await
        .map_err(|e| {
            error!("Failed to complete module {} for {}: {}", module_id, user_id, e);
            e
        })?;
    Ok(Json(completed))
}
