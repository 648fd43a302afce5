use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// A row of the `portfolios` table: one user's holding of one stock symbol.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HeldStock {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stock_symbol: String,
    pub stock_name: String,
    pub shares: i32,
    pub buy_price: f64,
    pub current_price: f64,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Valuation input. Shares of zero mark a closed position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub shares: i64,
    pub buy_price: f64,
    pub current_price: f64,
    pub category: Option<String>,
}

impl Position {
    pub fn new(symbol: impl Into<String>, shares: i64, buy_price: f64, current_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            shares,
            buy_price,
            current_price,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_closed(&self) -> bool {
        self.shares == 0
    }
}

impl From<&HeldStock> for Position {
    fn from(held: &HeldStock) -> Self {
        Self {
            symbol: held.stock_symbol.clone(),
            shares: i64::from(held.shares),
            buy_price: held.buy_price,
            current_price: held.current_price,
            category: held.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyStock {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub symbol: String,
    pub price: f64,
}
