use futures::future::join_all;
use tracing::error;

use crate::errors::AppError;
use crate::external::quote_provider::{Quote, QuoteProvider};
use crate::models::Stock;

pub const POPULAR_SYMBOLS: &[&str] = &["AAPL", "GOOGL", "MSFT", "TSLA", "DIS", "MCD", "NKE", "NFLX"];

const MAX_SYMBOL_LEN: usize = 10;
const DEFAULT_DESCRIPTION: &str = "A great company to learn about investing!";
const DEFAULT_CATEGORY: &str = "Business";

// (symbol, description, category)
const CATALOG: &[(&str, &str, &str)] = &[
    ("AAPL", "Makes iPhones, iPads, and Mac computers that kids love!", "Technology"),
    ("GOOGL", "The company behind Google search and YouTube!", "Technology"),
    ("MSFT", "Creates Xbox games and Windows computers!", "Technology"),
    ("TSLA", "Makes cool electric cars and rockets!", "Technology"),
    ("DIS", "Home of Mickey Mouse, Marvel heroes, and Disney movies!", "Entertainment"),
    ("MCD", "The famous golden arches restaurant everyone knows!", "Food"),
    ("NKE", "Makes the coolest sneakers and sports gear!", "Sports"),
    ("NFLX", "Your favorite streaming service for movies and shows!", "Entertainment"),
];

pub fn describe(symbol: &str) -> (&'static str, &'static str) {
    CATALOG
        .iter()
        .find(|(s, _, _)| *s == symbol)
        .map(|(_, description, category)| (*description, *category))
        .unwrap_or((DEFAULT_DESCRIPTION, DEFAULT_CATEGORY))
}

/// Trims and upper-cases a ticker, rejecting anything that doesn't look like one.
pub fn normalize_symbol(raw: &str) -> Result<String, AppError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::Validation("Ticker cannot be empty".into()));
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(AppError::Validation(format!("Ticker too long: {}", symbol)));
    }
    if !symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-') {
        return Err(AppError::Validation(format!("Invalid ticker: {}", symbol)));
    }
    Ok(symbol)
}

/// Comma separated list, duplicates removed, order kept.
pub fn parse_symbol_list(raw: &str) -> Result<Vec<String>, AppError> {
    let mut symbols: Vec<String> = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let symbol = normalize_symbol(part)?;
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    if symbols.is_empty() {
        return Err(AppError::Validation("At least one ticker is required".into()));
    }
    Ok(symbols)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub async fn get_quote(provider: &dyn QuoteProvider, symbol: &str) -> Result<Quote, AppError> {
    provider.fetch_quote(symbol).await.map_err(|e| {
        error!("Quote fetch for {} failed: {}", symbol, e);
        AppError::from(e)
    })
}

pub fn to_stock(quote: &Quote) -> Stock {
    let (description, category) = describe(&quote.symbol);
    let change = quote.price - quote.previous_close;
    let change_percent = if quote.previous_close > 0.0 {
        change / quote.previous_close * 100.0
    } else {
        0.0
    };

    Stock {
        id: quote.symbol.to_lowercase(),
        symbol: quote.symbol.clone(),
        name: quote.name.clone(),
        price: round2(quote.price),
        change: round2(change),
        change_percent: round2(change_percent),
        description: description.to_string(),
        category: category.to_string(),
    }
}

pub async fn get_stock(provider: &dyn QuoteProvider, symbol: &str) -> Result<Stock, AppError> {
    let quote = get_quote(provider, symbol).await?;
    Ok(to_stock(&quote))
}

/// Fetches all symbols concurrently. Symbols that fail are left out.
pub async fn get_stocks(provider: &dyn QuoteProvider, symbols: &[String]) -> Vec<Stock> {
    let results = join_all(symbols.iter().map(|s| get_stock(provider, s))).await;
    results.into_iter().filter_map(Result::ok).collect()
}
