use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::external::quote_provider::{Quote, QuoteProvider, QuoteProviderError};

const DEFAULT_BASE_PRICE: f64 = 125.50;
// +/- 3% swing over the day
const MARKET_SWING: f64 = 0.03;

const BASE_PRICES: &[(&str, f64)] = &[
    ("AAPL", 175.23),
    ("GOOGL", 138.45),
    ("MSFT", 424.67),
    ("TSLA", 248.89),
    ("DIS", 95.12),
    ("MCD", 289.34),
    ("NKE", 108.76),
    ("NFLX", 457.23),
];

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn base_price(symbol: &str) -> f64 {
    BASE_PRICES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, p)| *p)
        .unwrap_or(DEFAULT_BASE_PRICE)
}

/// Offline quote source used when live data is unavailable.
///
/// Prices drift with the time of day of the injected clock. Extra random
/// jitter is off unless configured, and its RNG is seeded so runs can be
/// reproduced.
pub struct SimulatedProvider {
    clock: Box<dyn Clock>,
    rng: Mutex<StdRng>,
    jitter: f64,
}

impl SimulatedProvider {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            rng: Mutex::new(StdRng::seed_from_u64(0)),
            jitter: 0.0,
        }
    }

    /// Adds up to `+/- jitter` (fraction of price) of noise per quote.
    pub fn with_jitter(mut self, jitter: f64, seed: u64) -> Self {
        self.jitter = jitter.abs();
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn price_for(&self, symbol: &str) -> f64 {
        let now = self.clock.now();
        let seed = (now.hour() as f64 * 0.1 + now.minute() as f64 * 0.01).sin();
        let mut variation = seed * MARKET_SWING;

        if self.jitter > 0.0 {
            variation += self.rng.lock().random_range(-self.jitter..=self.jitter);
        }

        base_price(symbol) * (1.0 + variation)
    }
}

#[async_trait]
impl QuoteProvider for SimulatedProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        Ok(Quote {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price: self.price_for(symbol),
            previous_close: base_price(symbol),
        })
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock_at(hour: u32, minute: u32) -> Box<dyn Clock> {
        Box::new(FixedClock(Utc.with_ymd_and_hms(2025, 1, 6, hour, minute, 0).unwrap()))
    }

    #[test]
    fn test_midnight_price_is_base_price() {
        let provider = SimulatedProvider::new(clock_at(0, 0));
        assert_eq!(provider.price_for("AAPL"), 175.23);
        assert_eq!(provider.price_for("UNKNOWN"), DEFAULT_BASE_PRICE);
    }

    #[test]
    fn test_price_is_deterministic_for_fixed_clock() {
        let a = SimulatedProvider::new(clock_at(14, 30));
        let b = SimulatedProvider::new(clock_at(14, 30));
        assert_eq!(a.price_for("MSFT"), b.price_for("MSFT"));
    }

    #[test]
    fn test_price_stays_within_swing() {
        for hour in 0..24 {
            let provider = SimulatedProvider::new(clock_at(hour, 45));
            let price = provider.price_for("TSLA");
            let base = base_price("TSLA");
            assert!(price >= base * (1.0 - MARKET_SWING) - 1e-9);
            assert!(price <= base * (1.0 + MARKET_SWING) + 1e-9);
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let a = SimulatedProvider::new(clock_at(9, 0)).with_jitter(0.05, 42);
        let b = SimulatedProvider::new(clock_at(9, 0)).with_jitter(0.05, 42);
        for _ in 0..5 {
            assert_eq!(a.price_for("NKE"), b.price_for("NKE"));
        }
    }

    #[tokio::test]
    async fn test_quote_reports_base_as_previous_close() {
        let provider = SimulatedProvider::new(clock_at(10, 0));
        let quote = provider.fetch_quote("DIS").await.unwrap();
        assert_eq!(quote.previous_close, 95.12);
        assert!(quote.price > 0.0);
    }
}
