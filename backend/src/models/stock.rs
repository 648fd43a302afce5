use serde::{Deserialize, Serialize};

/// Display-ready quote with kid-friendly catalog information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockQuery {
    pub symbols: String,
}
