use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use kidvest_backend::app;
use kidvest_backend::config::{AppConfig, QuoteSource};
use kidvest_backend::external::auth_admin::AuthAdminClient;
use kidvest_backend::external::fallback_provider::FallbackProvider;
use kidvest_backend::external::fmp::FmpProvider;
use kidvest_backend::external::quote_provider::QuoteProvider;
use kidvest_backend::external::simulated::{SimulatedProvider, SystemClock};
use kidvest_backend::logging::{init_logging, LoggingConfig};
use kidvest_backend::services::last_known_prices::LastKnownPrices;
use kidvest_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logging first so config errors below are visible
    init_logging(&LoggingConfig::from_env())?;

    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let last_known_prices = LastKnownPrices::new();
    let simulated = SimulatedProvider::new(Box::new(SystemClock));
    let quote_provider: Arc<dyn QuoteProvider> = match config.quote_source {
        QuoteSource::Fmp => {
            tracing::info!("📊 Using quote provider: Financial Modeling Prep (last known, then simulated fallback)");
            let live = FmpProvider::new(config.fmp_api_key.clone())?;
            Arc::new(FallbackProvider::new(Box::new(live), last_known_prices.clone(), Box::new(simulated)))
        }
        QuoteSource::Simulated => {
            tracing::info!("📊 Using quote provider: simulated prices only");
            Arc::new(simulated)
        }
    };

    let auth_admin = AuthAdminClient::new(config.supabase_url.clone(), config.supabase_service_role_key.clone())?;
    if !auth_admin.is_configured() {
        tracing::warn!("SUPABASE_URL not set; admin user creation is disabled");
    }

    let state = AppState {
        pool,
        quote_provider,
        last_known_prices,
        auth_admin,
        admin_api_token: config.admin_api_token.clone(),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Kidvest backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
