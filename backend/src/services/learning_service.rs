use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{CompletedModule, Difficulty, LearningModule, LearningOverview};

// (id, title, description, difficulty, reward, duration)
const CATALOG: &[(&str, &str, &str, Difficulty, i64, &str)] = &[
    ("1", "What is a Stock?", "Learn the basics of what stocks are and how they work", Difficulty::Beginner, 50, "5 min"),
    ("2", "How to Read Stock Prices", "Understand stock prices and what the numbers mean", Difficulty::Beginner, 75, "8 min"),
    ("3", "Risk and Reward", "Learn about investment risk and potential rewards", Difficulty::Intermediate, 100, "12 min"),
    ("4", "Building a Portfolio", "How to diversify your investments across different stocks", Difficulty::Advanced, 150, "15 min"),
];

pub fn catalog() -> Vec<LearningModule> {
    CATALOG
        .iter()
        .map(|(id, title, description, difficulty, reward, duration)| LearningModule {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            difficulty: *difficulty,
            reward: *reward,
            completed: false,
            duration: duration.to_string(),
        })
        .collect()
}

pub fn find_module(module_id: &str) -> Option<LearningModule> {
    catalog().into_iter().find(|m| m.id == module_id)
}

pub fn modules_for(completed: &[CompletedModule]) -> Vec<LearningModule> {
    catalog()
        .into_iter()
        .map(|mut module| {
            module.completed = completed.iter().any(|c| c.module_id == module.id);
            module
        })
        .collect()
}

pub fn total_earned(completed: &[CompletedModule]) -> i64 {
    completed.iter().map(|c| c.coins_earned).sum()
}

pub async fn overview(pool: &PgPool, user_id: Uuid) -> Result<LearningOverview, AppError> {
    let completed = db::learning_queries::fetch_for_user(pool, user_id).await?;
    Ok(LearningOverview {
        modules: modules_for(&completed),
        total_earned: total_earned(&completed),
        completed,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub module: LearningModule,
    pub new_balance: i64,
}

/// What finishing `module_id` is worth to a player with `balance` coins who
/// has already finished `completed_ids`.
pub fn plan_completion(module_id: &str, completed_ids: &[String], balance: i64) -> Result<Completion, AppError> {
    let module = find_module(module_id)
        .ok_or_else(|| AppError::NotFound(format!("Learning module {} not found", module_id)))?;
    if completed_ids.iter().any(|id| *id == module.id) {
        return Err(AppError::Conflict(format!("Module \"{}\" already completed", module.title)));
    }
    Ok(Completion {
        new_balance: balance + module.reward,
        module,
    })
}

/// Records the completion and credits the reward in one transaction.
pub async fn complete_module(
    pool: &PgPool,
    user_id: Uuid,
    module_id: &str,
) -> Result<CompletedModule, AppError> {
    if find_module(module_id).is_none() {
        return Err(AppError::NotFound(format!("Learning module {} not found", module_id)));
    }

    let mut tx = pool.begin().await?;

    let profile = db::profile_queries::lock_for_update(&mut *tx, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user_id)))?;
    let completed_ids = db::learning_queries::fetch_module_ids(&mut *tx, user_id).await?;
    let Completion { module, new_balance } = plan_completion(module_id, &completed_ids, profile.virtual_coins)?;

    let completed = db::learning_queries::insert(&mut *tx, user_id, &module.id, &module.title, module.reward)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("Module \"{}\" already completed", module.title)))?;

    db::profile_queries::adjust_coins(&mut *tx, user_id, module.reward)
        .await
        .map_err(|e| {
            error!("Failed to credit {} coins to {}: {}", module.reward, user_id, e);
            e
        })?;

    tx.commit().await?;

    info!(
        "User {} completed module {} (+{} coins, balance {})",
        user_id, module.id, module.reward, new_balance
    );
    Ok(completed)
}
