use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use crate::models::Profile;

const COLUMNS: &str = "user_id, display_name, user_group, virtual_coins, created_at";

pub async fn fetch_one(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Oldest first; this order is the leaderboard tie-break.
pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!(
        "SELECT {COLUMNS} FROM profiles ORDER BY created_at ASC, user_id ASC"
    ))
        .fetch_all(pool)
        .await
}

pub async fn lock_for_update(conn: &mut PgConnection, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!(
        "SELECT {COLUMNS} FROM profiles WHERE user_id = $1 FOR UPDATE"
    ))
        .bind(user_id)
        .fetch_optional(conn)
        .await
}

/// Adds `delta` (may be negative) and returns the new balance.
pub async fn adjust_coins(conn: &mut PgConnection, user_id: Uuid, delta: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "UPDATE profiles
         SET virtual_coins = virtual_coins + $2, updated_at = NOW()
         WHERE user_id = $1
         RETURNING virtual_coins"
    )
        .bind(user_id)
        .bind(delta)
        .fetch_one(conn)
        .await
}

pub async fn insert(
    pool: &PgPool,
    user_id: Uuid,
    display_name: Option<&str>,
    starting_coins: i64,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!(
        "INSERT INTO profiles (user_id, display_name, virtual_coins)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id) DO UPDATE SET display_name = COALESCE(EXCLUDED.display_name, profiles.display_name)
         RETURNING {COLUMNS}"
    ))
        .bind(user_id)
        .bind(display_name)
        .bind(starting_coins)
        .fetch_one(pool)
        .await
}
