use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub total_value: f64,
    pub total_cost: f64,
    pub gain_loss: f64,
    pub gain_loss_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionValuation {
    pub symbol: String,
    pub shares: i64,
    pub market_value: f64,
    pub cost_basis: f64,
    pub gain_loss: f64,
    pub gain_loss_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub category: String,
    pub market_value: f64,
    pub percent_of_total: f64,
}
