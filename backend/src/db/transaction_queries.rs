use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use crate::models::{Transaction, TransactionType};

const COLUMNS: &str = "id, user_id, stock_symbol, stock_name, transaction_type, shares, price, total_amount, created_at";

pub async fn insert(
    conn: &mut PgConnection,
    user_id: Uuid,
    symbol: &str,
    name: &str,
    kind: TransactionType,
    shares: i32,
    price: f64,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "INSERT INTO transactions (id, user_id, stock_symbol, stock_name, transaction_type, shares, price, total_amount)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {COLUMNS}"
    ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(symbol)
        .bind(name)
        .bind(kind.as_str())
        .bind(shares)
        .bind(price)
        .bind(price * f64::from(shares))
        .fetch_one(conn)
        .await
}

pub async fn fetch_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {COLUMNS} FROM transactions WHERE user_id = $1 ORDER BY created_at DESC"
    ))
        .bind(user_id)
        .fetch_all(pool)
        .await
}
