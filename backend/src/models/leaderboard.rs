use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub display_name: String,
    pub portfolio_value: f64,
    pub return_percent: f64,
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub global: Vec<RankedEntry>,
    pub group: Vec<RankedEntry>,
    /// 0 when the requesting user is not in the global set.
    pub user_global_rank: usize,
    /// 0 when the requesting user is not in the group set.
    pub user_group_rank: usize,
    pub total_players: usize,
    pub group_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardParams {
    pub user_id: Uuid,
    pub group: Option<String>,
    pub limit: Option<usize>,
}
