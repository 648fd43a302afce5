use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSource {
    /// Financial Modeling Prep, falling back to simulated prices.
    Fmp,
    Simulated,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub quote_source: QuoteSource,
    pub fmp_api_key: String,
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,
    pub admin_api_token: Option<String>,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = var("DATABASE_URL").ok_or_else(|| "DATABASE_URL is not set".to_string())?;

        let db_max_connections = var("DB_MAX_CONNECTIONS")
            .map(|v| v.parse::<u32>().map_err(|e| format!("Invalid DB_MAX_CONNECTIONS: {}", e)))
            .transpose()?
            .unwrap_or(10);

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid BIND_ADDR: {}", e))?;

        let quote_source = match var("QUOTE_PROVIDER").unwrap_or_else(|| "fmp".to_string()).to_lowercase().as_str() {
            "fmp" => QuoteSource::Fmp,
            "simulated" => QuoteSource::Simulated,
            other => {
                return Err(format!("Invalid QUOTE_PROVIDER: {}. Must be 'fmp' or 'simulated'", other));
            }
        };

        let config = Self {
            database_url,
            db_max_connections,
            bind_addr,
            quote_source,
            fmp_api_key: var("FMP_API_KEY").unwrap_or_else(|| "demo".to_string()),
            supabase_url: var("SUPABASE_URL"),
            supabase_service_role_key: var("SUPABASE_SERVICE_ROLE_KEY"),
            admin_api_token: var("ADMIN_API_TOKEN"),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.db_max_connections == 0 {
            return Err("DB_MAX_CONNECTIONS must be at least 1".to_string());
        }
        if self.supabase_url.is_some() != self.supabase_service_role_key.is_some() {
            return Err("SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY must be set together".to_string());
        }
        Ok(())
    }
}
