mod leaderboard;
mod learning;
mod position;
mod profile;
mod stock;
mod transaction;
mod valuation;

pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardParams, RankedEntry};
pub use learning::{CompletedModule, Difficulty, LearningModule, LearningOverview};
pub use position::{BuyStock, HeldStock, Position, PriceUpdate};
pub use profile::{CreateUser, Profile, STARTING_COINS};
pub use stock::{Stock, StockQuery};
pub use transaction::{Transaction, TransactionType};
pub use valuation::{CategoryAllocation, PortfolioValuation, PositionValuation};
