use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "kidvest_backend=info,tower_http=info,sqlx=warn";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    pub service_name: String,
    pub environment: String,
    /// Loki push endpoint; shipping is on only when this is set and
    /// `LOKI_ENABLED` is true.
    pub loki: Option<String>,
    pub loki_requested: bool,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            filter: env("RUST_LOG").unwrap_or_else(|| DEFAULT_FILTER.to_string()),
            service_name: env("SERVICE_NAME").unwrap_or_else(|| "kidvest".to_string()),
            environment: env("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            loki: env("LOKI_URL"),
            loki_requested: env("LOKI_ENABLED")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.loki_requested && self.loki.is_none() {
            return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string());
        }
        EnvFilter::try_new(&self.filter).map_err(|e| format!("Invalid RUST_LOG '{}': {}", self.filter, e))?;
        Ok(())
    }
}

/// Installs the global subscriber. Must run inside the tokio runtime when
/// Loki shipping is enabled, since the push task is spawned onto it.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    config.validate().map_err(anyhow::Error::msg)?;

    #[cfg(feature = "loki")]
    {
        if let (true, Some(loki_url)) = (config.loki_requested, config.loki.as_deref()) {
            init_with_loki(config, loki_url)?;
            tracing::info!("📊 Logging to console and Loki at {}", loki_url);
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    tracing::info!("📊 Logging to console ({})", config.environment);
    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(config: &LoggingConfig, loki_url: &str) -> anyhow::Result<()> {
    let (loki_layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url::Url::parse(loki_url)?)?;

    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()?;
    Ok(())
}
