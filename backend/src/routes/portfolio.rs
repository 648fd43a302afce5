use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{BuyStock, Transaction};
use crate::services::portfolio_service::{self, PortfolioSummary};
use crate::services::trading_service::{self, Purchase};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:user_id", get(get_portfolio))
        .route("/:user_id/buy", post(buy_stock))
        .route("/:user_id/refresh", post(refresh_prices))
        .route("/:user_id/transactions", get(list_transactions))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PortfolioSummary>, AppError> {
    info!("GET /portfolio/{} - Valuing portfolio", user_id);
    let summary = portfolio_service::fetch_summary(&state.pool, user_id).await
        .map_err(|e| {
            error!("Failed to value portfolio for {}: {}", user_id, e);
            e
        })?;
    Ok(Json(summary))
}

pub async fn buy_stock(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(input): Json<BuyStock>,
) -> Result<Json<Purchase>, AppError> {
    info!("POST /portfolio/{}/buy - Buying {}", user_id, input.symbol);
    let purchase = trading_service::buy_stock(&state.pool, user_id, input).await
        .map_err(|e| {
            error!("Failed to buy stock for {}: {}", user_id, e);
            e
        })?;
    Ok(Json(purchase))
}

pub async fn refresh_prices(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    info!("POST /portfolio/{}/refresh - Refreshing prices", user_id);
    let updated = trading_service::refresh_prices(&state.pool, state.quote_provider.as_ref(), user_id)
        .await
        .map_err(|e| {
            error!("Failed to refresh prices for {}: {}", user_id, e);
            e
        })?;
    Ok(Json(json!({ "updated": updated })))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    info!("GET /portfolio/{}/transactions - Listing transactions", user_id);
    let transactions = trading_service::list_transactions(&state.pool, user_id).await
        .map_err(|e| {
            error!("Failed to list transactions for {}: {}", user_id, e);
            e
        })?;
    Ok(Json(transactions))
}
