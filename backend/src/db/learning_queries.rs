use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use crate::models::CompletedModule;

const COLUMNS: &str = "id, user_id, module_id, module_title, coins_earned, completed_at";

pub async fn fetch_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<CompletedModule>, sqlx::Error> {
    sqlx::query_as::<_, CompletedModule>(&format!(
        "SELECT {COLUMNS} FROM learning_progress WHERE user_id = $1 ORDER BY completed_at ASC"
    ))
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn fetch_module_ids(conn: &mut PgConnection, user_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT module_id FROM learning_progress WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(conn)
        .await
}

/// Returns `None` when the module was already completed by this user.
pub async fn insert(
    conn: &mut PgConnection,
    user_id: Uuid,
    module_id: &str,
    module_title: &str,
    coins_earned: i64,
) -> Result<Option<CompletedModule>, sqlx::Error> {
    sqlx::query_as::<_, CompletedModule>(&format!(
        "INSERT INTO learning_progress (id, user_id, module_id, module_title, coins_earned)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (user_id, module_id) DO NOTHING
         RETURNING {COLUMNS}"
    ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(module_id)
        .bind(module_title)
        .bind(coins_earned)
        .fetch_optional(conn)
        .await
}
