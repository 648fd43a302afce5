use std::sync::Arc;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::external::quote_provider::Quote;

#[derive(Debug, Clone)]
pub struct KnownQuote {
    pub quote: Quote,
    pub seen_at: DateTime<Utc>,
}

/// Thread-safe record of the last quote successfully fetched per symbol.
/// Served when every provider fails so prices don't drop to zero.
#[derive(Clone, Default)]
pub struct LastKnownPrices {
    cache: Arc<DashMap<String, KnownQuote>>,
}

impl LastKnownPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, quote: &Quote) {
        self.cache.insert(
            quote.symbol.clone(),
            KnownQuote {
                quote: quote.clone(),
                seen_at: Utc::now(),
            },
        );
    }

    pub fn get(&self, symbol: &str) -> Option<KnownQuote> {
        self.cache.get(symbol).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(symbol: &str, price: f64) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price,
            previous_close: price,
        }
    }

    #[test]
    fn test_records_and_overwrites() {
        let prices = LastKnownPrices::new();
        assert!(prices.is_empty());

        prices.record(&quote("AAPL", 170.0));
        prices.record(&quote("AAPL", 171.5));

        assert_eq!(prices.len(), 1);
        assert_eq!(prices.get("AAPL").unwrap().quote.price, 171.5);
        assert!(prices.get("MSFT").is_none());
    }

    #[test]
    fn test_clones_share_storage() {
        let prices = LastKnownPrices::new();
        let other = prices.clone();
        other.record(&quote("DIS", 95.0));
        assert!(prices.get("DIS").is_some());
    }
}
