use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningModule {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub reward: i64,
    pub completed: bool,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompletedModule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: String,
    pub module_title: String,
    pub coins_earned: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningOverview {
    pub modules: Vec<LearningModule>,
    pub completed: Vec<CompletedModule>,
    pub total_earned: i64,
}
