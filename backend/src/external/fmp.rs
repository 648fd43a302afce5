use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::external::quote_provider::{Quote, QuoteProvider, QuoteProviderError};

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3/quote";

/// Financial Modeling Prep quote endpoint. The free `demo` key only serves a
/// handful of symbols; everything else comes back as an empty array.
pub struct FmpProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl FmpProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, QuoteProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| QuoteProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// Only the fields we read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpQuote {
    symbol: String,
    name: Option<String>,
    price: Option<f64>,
    previous_close: Option<f64>,
}

#[async_trait]
impl QuoteProvider for FmpProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), symbol);

        let resp = self
            .client
            .get(url)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| QuoteProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteProviderError::RateLimited);
        }
        if !resp.status().is_success() {
            return Err(QuoteProviderError::BadResponse(format!("HTTP {}", resp.status())));
        }

        let body: Vec<FmpQuote> = resp
            .json()
            .await
            .map_err(|e| QuoteProviderError::Parse(e.to_string()))?;

        let quote = body
            .into_iter()
            .next()
            .ok_or_else(|| QuoteProviderError::NotFound(symbol.to_string()))?;

        let price = quote
            .price
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| QuoteProviderError::BadResponse(format!("missing price for {}", symbol)))?;

        Ok(Quote {
            name: quote.name.unwrap_or_else(|| quote.symbol.clone()),
            symbol: quote.symbol,
            price,
            previous_close: quote.previous_close.unwrap_or(price),
        })
    }

    fn name(&self) -> &'static str {
        "financialmodelingprep"
    }
}
