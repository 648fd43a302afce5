use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{Stock, StockQuery};
use crate::services::quote_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_stocks))
        .route("/popular", get(get_popular_stocks))
}

pub async fn get_popular_stocks(
    State(state): State<AppState>,
) -> Result<Json<Vec<Stock>>, AppError> {
    info!("GET /stocks/popular - Fetching popular stocks");
    let symbols: Vec<String> = quote_service::POPULAR_SYMBOLS.iter().map(|s| s.to_string()).collect();
    let stocks = quote_service::get_stocks(state.quote_provider.as_ref(), &symbols).await;
    if stocks.len() < symbols.len() {
        warn!("Only {} of {} popular stocks could be quoted", stocks.len(), symbols.len());
    }
    Ok(Json(stocks))
}

pub async fn get_stocks(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Result<Json<Vec<Stock>>, AppError> {
    info!("GET /stocks?symbols={} - Fetching quotes", query.symbols);
    let symbols = quote_service::parse_symbol_list(&query.symbols)?;
    let stocks = quote_service::get_stocks(state.quote_provider.as_ref(), &symbols).await;
    Ok(Json(stocks))
}
