use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{CategoryAllocation, HeldStock, PortfolioValuation, Position, PositionValuation};
use crate::services::valuation_service;

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSummary {
    pub user_id: Uuid,
    pub virtual_coins: i64,
    pub holdings: Vec<HeldStock>,
    pub valuation: PortfolioValuation,
    pub positions: Vec<PositionValuation>,
    pub allocation: Vec<CategoryAllocation>,
}

pub fn summarize(user_id: Uuid, virtual_coins: i64, holdings: Vec<HeldStock>) -> Result<PortfolioSummary, AppError> {
    let positions: Vec<Position> = holdings.iter().map(Position::from).collect();
    Ok(PortfolioSummary {
        user_id,
        virtual_coins,
        valuation: valuation_service::valuate(&positions)?,
        positions: valuation_service::breakdown(&positions)?,
        allocation: valuation_service::category_allocation(&positions)?,
        holdings,
    })
}

/// Valued fresh from the stored holdings on every call.
pub async fn fetch_summary(pool: &PgPool, user_id: Uuid) -> Result<PortfolioSummary, AppError> {
    let profile = db::profile_queries::fetch_one(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user_id)))?;
    let holdings = db::holding_queries::fetch_for_user(pool, user_id).await?;
    summarize(user_id, profile.virtual_coins, holdings)
}
