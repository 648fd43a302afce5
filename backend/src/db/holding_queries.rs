use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use crate::models::HeldStock;

const COLUMNS: &str = "id, user_id, stock_symbol, stock_name, shares, buy_price, current_price, category, created_at, updated_at";

pub async fn fetch_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<HeldStock>, sqlx::Error> {
    sqlx::query_as::<_, HeldStock>(&format!(
        "SELECT {COLUMNS} FROM portfolios WHERE user_id = $1 ORDER BY created_at DESC"
    ))
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<HeldStock>, sqlx::Error> {
    sqlx::query_as::<_, HeldStock>(&format!("SELECT {COLUMNS} FROM portfolios WHERE shares > 0"))
        .fetch_all(pool)
        .await
}

pub async fn find_by_symbol(
    conn: &mut PgConnection,
    user_id: Uuid,
    symbol: &str,
) -> Result<Option<HeldStock>, sqlx::Error> {
    sqlx::query_as::<_, HeldStock>(&format!(
        "SELECT {COLUMNS} FROM portfolios WHERE user_id = $1 AND stock_symbol = $2 FOR UPDATE"
    ))
        .bind(user_id)
        .bind(symbol)
        .fetch_optional(conn)
        .await
}

pub async fn insert(
    conn: &mut PgConnection,
    user_id: Uuid,
    symbol: &str,
    name: &str,
    price: f64,
    category: Option<&str>,
) -> Result<HeldStock, sqlx::Error> {
    sqlx::query_as::<_, HeldStock>(&format!(
        "INSERT INTO portfolios (id, user_id, stock_symbol, stock_name, shares, buy_price, current_price, category)
         VALUES ($1, $2, $3, $4, 1, $5, $5, $6)
         RETURNING {COLUMNS}"
    ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(symbol)
        .bind(name)
        .bind(price)
        .bind(category)
        .fetch_one(conn)
        .await
}

pub async fn add_share(conn: &mut PgConnection, id: Uuid, price: f64) -> Result<HeldStock, sqlx::Error> {
    sqlx::query_as::<_, HeldStock>(&format!(
        "UPDATE portfolios
         SET shares = shares + 1, current_price = $2, updated_at = NOW()
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
        .bind(id)
        .bind(price)
        .fetch_one(conn)
        .await
}

pub async fn update_current_price(
    pool: &PgPool,
    user_id: Uuid,
    symbol: &str,
    price: f64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE portfolios
         SET current_price = $3, updated_at = NOW()
         WHERE user_id = $1 AND stock_symbol = $2"
    )
        .bind(user_id)
        .bind(symbol)
        .bind(price)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
