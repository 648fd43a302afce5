use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::external::auth_admin::{AuthAdminClient, CreatedUser};
use crate::models::{CreateUser, Profile, STARTING_COINS};

pub async fn fetch_one(pool: &PgPool, user_id: Uuid) -> Result<Profile, AppError> {
    db::profile_queries::fetch_one(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user_id)))
}

fn required<'a>(value: &'a Option<String>) -> Option<&'a str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Creates a confirmed user with the auth provider and gives them a profile
/// with the starting coin balance.
pub async fn create_user(
    pool: &PgPool,
    auth: &AuthAdminClient,
    input: CreateUser,
) -> Result<(CreatedUser, Profile), AppError> {
    let (Some(email), Some(password)) = (required(&input.email), input.password.as_deref().filter(|p| !p.is_empty())) else {
        return Err(AppError::Validation("Email and password are required".into()));
    };
    let display_name = required(&input.display_name);

    let user = auth.create_user(email, password, display_name).await.map_err(|e| {
        error!("create-user failed for {}: {}", email, e);
        AppError::from(e)
    })?;

    let profile = db::profile_queries::insert(pool, user.id, display_name, STARTING_COINS)
        .await
        .map_err(|e| {
            error!(
                "Auth user {} ({}) was created but has no profile; insert failed: {}",
                user.id, email, e
            );
            e
        })?;
    info!("Created user {} with {} coins", user.id, profile.virtual_coins);
    Ok((user, profile))
}
