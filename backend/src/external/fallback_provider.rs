use async_trait::async_trait;
use tracing::{info, warn};

use crate::external::quote_provider::{Quote, QuoteProvider, QuoteProviderError};
use crate::services::last_known_prices::LastKnownPrices;

/// Live provider first, then the last price it reported, then a secondary
/// source (normally the simulated one).
///
/// Only quotes from the primary are recorded as last known.
pub struct FallbackProvider {
    primary: Box<dyn QuoteProvider>,
    last_known: LastKnownPrices,
    fallback: Box<dyn QuoteProvider>,
}

impl FallbackProvider {
    pub fn new(
        primary: Box<dyn QuoteProvider>,
        last_known: LastKnownPrices,
        fallback: Box<dyn QuoteProvider>,
    ) -> Self {
        Self { primary, last_known, fallback }
    }
}

#[async_trait]
impl QuoteProvider for FallbackProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        match self.primary.fetch_quote(symbol).await {
            Ok(quote) => {
                self.last_known.record(&quote);
                return Ok(quote);
            }
            Err(QuoteProviderError::RateLimited) => {
                info!("⚠️ {} rate limited for {}", self.primary.name(), symbol);
            }
            Err(e) => {
                warn!("{} failed for {}: {}", self.primary.name(), symbol, e);
            }
        }

        if let Some(known) = self.last_known.get(symbol) {
            info!("Serving last known price of {} from {}", symbol, known.seen_at);
            return Ok(known.quote);
        }

        info!("No known price for {}, using {}", symbol, self.fallback.name());
        self.fallback.fetch_quote(symbol).await
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
