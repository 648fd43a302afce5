use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{Leaderboard, LeaderboardParams};
use crate::services::leaderboard_service;
use crate::state::AppState;

const MAX_LIMIT: usize = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_leaderboard))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<Leaderboard>, AppError> {
    info!("GET /leaderboard - Ranking for user {}", params.user_id);
    if params.limit == Some(0) {
        return Err(AppError::Validation("limit must be at least 1".into()));
    }
    let limit = params.limit.map(|l| l.min(MAX_LIMIT));
    let group = params.group.filter(|g| !g.trim().is_empty());

    let leaderboard = leaderboard_service::fetch_leaderboard(&state.pool, params.user_id, group, limit)
        .await
        .map_err(|e| {
            error!("Failed to build leaderboard for {}: {}", params.user_id, e);
            e
        })?;
    Ok(Json(leaderboard))
}
