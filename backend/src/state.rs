use std::sync::Arc;
use sqlx::PgPool;
use crate::external::auth_admin::AuthAdminClient;
use crate::external::quote_provider::QuoteProvider;
use crate::services::last_known_prices::LastKnownPrices;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub quote_provider: Arc<dyn QuoteProvider>,
    pub last_known_prices: LastKnownPrices,
    pub auth_admin: AuthAdminClient,
    pub admin_api_token: Option<String>,
}
