use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    info!("GET /health - Health check");
    Json(json!({
        "status": "ok",
        "quote_provider": state.quote_provider.name(),
        "cached_quotes": state.last_known_prices.len(),
    }))
}
