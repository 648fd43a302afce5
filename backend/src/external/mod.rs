pub mod auth_admin;
pub mod fallback_provider;
pub mod fmp;
pub mod quote_provider;
pub mod simulated;
