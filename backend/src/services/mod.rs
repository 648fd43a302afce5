pub mod last_known_prices;
pub mod leaderboard_service;
pub mod learning_service;
pub mod portfolio_service;
pub mod profile_service;
pub mod quote_service;
pub mod trading_service;
pub mod valuation_service;
