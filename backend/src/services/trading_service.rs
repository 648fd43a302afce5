use serde::Serialize;
use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::external::quote_provider::QuoteProvider;
use crate::models::{BuyStock, HeldStock, PriceUpdate, Transaction, TransactionType};
use crate::services::quote_service;

#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    pub holding: HeldStock,
    pub transaction: Transaction,
    pub coins_spent: i64,
    pub remaining_coins: i64,
}

/// Whole coins charged for one share: the quoted price rounded to the
/// nearest coin. Anything that rounds to zero is rejected.
pub fn coin_cost(price: f64) -> Result<i64, AppError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::Validation("Price must be > 0".into()));
    }
    let cost = price.round() as i64;
    if cost < 1 {
        return Err(AppError::Validation(format!("Price {} is less than one coin", price)));
    }
    Ok(cost)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingChange {
    AddShare(Uuid),
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchasePlan {
    pub cost: i64,
    pub remaining_coins: i64,
    pub holding: HoldingChange,
}

/// Decides what buying one share does to a player who has `available` coins
/// and maybe already holds the stock.
pub fn plan_purchase(
    price: f64,
    available: i64,
    existing: Option<&HeldStock>,
) -> Result<PurchasePlan, AppError> {
    let cost = coin_cost(price)?;
    if available < cost {
        return Err(AppError::InsufficientCoins { needed: cost, available });
    }
    Ok(PurchasePlan {
        cost,
        remaining_coins: available - cost,
        holding: match existing {
            Some(held) => HoldingChange::AddShare(held.id),
            None => HoldingChange::Open,
        },
    })
}

fn validate_price(symbol: &str, price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::Validation(format!("{}: price must be > 0", symbol)));
    }
    Ok(())
}

/// Buys one share. Coins, holding and transaction log change together or not at all.
///
/// The rounded coin cost is what gets recorded as the price paid.
pub async fn buy_stock(pool: &PgPool, user_id: Uuid, input: BuyStock) -> Result<Purchase, AppError> {
    let symbol = quote_service::normalize_symbol(&input.symbol)?;
    coin_cost(input.price)?;
    let name = match input.name.trim() {
        "" => symbol.clone(),
        name => name.to_string(),
    };

    let mut tx = pool.begin().await?;

    let profile = db::profile_queries::lock_for_update(&mut *tx, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user_id)))?;
    let existing = db::holding_queries::find_by_symbol(&mut *tx, user_id, &symbol).await?;

    let plan = plan_purchase(input.price, profile.virtual_coins, existing.as_ref()).map_err(|e| {
        warn!("User {} cannot buy {}: {}", user_id, symbol, e);
        e
    })?;
    let paid = plan.cost as f64;

    let remaining_coins = db::profile_queries::adjust_coins(&mut *tx, user_id, -plan.cost).await?;

    let holding = match plan.holding {
        HoldingChange::AddShare(id) => db::holding_queries::add_share(&mut *tx, id, paid).await?,
        HoldingChange::Open => {
            db::holding_queries::insert(&mut *tx, user_id, &symbol, &name, paid, input.category.as_deref()).await?
        }
    };

    let transaction = db::transaction_queries::insert(
        &mut *tx,
        user_id,
        &symbol,
        &name,
        TransactionType::Buy,
        1,
        paid,
    )
        .await
        .map_err(|e| {
            error!("Failed to record buy of {} for {}: {}", symbol, user_id, e);
            e
        })?;

    tx.commit().await?;

    info!("User {} bought 1 {} for {} coins ({} left)", user_id, symbol, plan.cost, remaining_coins);
    Ok(Purchase {
        holding,
        transaction,
        coins_spent: plan.cost,
        remaining_coins,
    })
}

/// Validates every update before any is applied. Symbols come back normalised.
pub fn validate_updates(updates: &[PriceUpdate]) -> Result<Vec<PriceUpdate>, AppError> {
    updates
        .iter()
        .map(|update| -> Result<PriceUpdate, AppError> {
            validate_price(&update.symbol, update.price)?;
            Ok(PriceUpdate {
                symbol: quote_service::normalize_symbol(&update.symbol)?,
                price: update.price,
            })
        })
        .collect()
}

/// Sets the current price of matching holdings. Returns how many rows changed.
pub async fn update_prices(pool: &PgPool, user_id: Uuid, updates: &[PriceUpdate]) -> Result<u64, AppError> {
    let updates = validate_updates(updates)?;

    let mut updated = 0;
    for update in &updates {
        updated += db::holding_queries::update_current_price(pool, user_id, &update.symbol, update.price).await?;
    }
    Ok(updated)
}

/// Pulls fresh quotes for everything the user holds and stores them.
pub async fn refresh_prices(
    pool: &PgPool,
    provider: &dyn QuoteProvider,
    user_id: Uuid,
) -> Result<u64, AppError> {
    let holdings = db::holding_queries::fetch_for_user(pool, user_id).await?;
    if holdings.is_empty() {
        return Ok(0);
    }

    let symbols: Vec<String> = holdings.iter().map(|h| h.stock_symbol.clone()).collect();
    let stocks = quote_service::get_stocks(provider, &symbols).await;
    if stocks.len() < symbols.len() {
        warn!("Only {} of {} quotes available for user {}", stocks.len(), symbols.len(), user_id);
    }

    let updates: Vec<PriceUpdate> = stocks
        .into_iter()
        .map(|s| PriceUpdate { symbol: s.symbol, price: s.price })
        .collect();
    update_prices(pool, user_id, &updates).await
}

pub async fn list_transactions(pool: &PgPool, user_id: Uuid) -> Result<Vec<Transaction>, AppError> {
    Ok(db::transaction_queries::fetch_for_user(pool, user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn held(shares: i32) -> HeldStock {
        HeldStock {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            stock_symbol: "AAPL".into(),
            stock_name: "Apple Inc.".into(),
            shares,
            buy_price: 170.0,
            current_price: 175.0,
            category: Some("Technology".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn update(symbol: &str, price: f64) -> PriceUpdate {
        PriceUpdate { symbol: symbol.into(), price }
    }

    #[test]
    fn test_coin_cost_rounds_to_nearest() {
        assert_eq!(coin_cost(150.0).unwrap(), 150);
        assert_eq!(coin_cost(175.23).unwrap(), 175);
        assert_eq!(coin_cost(95.5).unwrap(), 96);
        assert_eq!(coin_cost(0.6).unwrap(), 1);
    }

    #[test]
    fn test_coin_cost_rejects_bad_prices() {
        assert!(coin_cost(0.0).is_err());
        assert!(coin_cost(-3.0).is_err());
        assert!(coin_cost(f64::NAN).is_err());
        assert!(matches!(coin_cost(0.4), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("AAPL", 1.0).is_ok());
        assert!(matches!(validate_price("AAPL", 0.0), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_purchase_deducts_coin_cost() {
        let plan = plan_purchase(175.23, 1000, None).unwrap();
        assert_eq!(plan.cost, 175);
        assert_eq!(plan.remaining_coins, 825);
        assert_eq!(plan.holding, HoldingChange::Open);
    }

    #[test]
    fn test_purchase_adds_share_to_existing_holding() {
        let existing = held(3);
        let plan = plan_purchase(175.0, 500, Some(&existing)).unwrap();
        assert_eq!(plan.holding, HoldingChange::AddShare(existing.id));
    }

    #[test]
    fn test_purchase_can_spend_every_coin() {
        let plan = plan_purchase(289.34, 289, None).unwrap();
        assert_eq!(plan.remaining_coins, 0);
    }

    #[test]
    fn test_purchase_rejected_without_enough_coins() {
        let err = plan_purchase(457.23, 400, None).unwrap_err();
        assert!(matches!(err, AppError::InsufficientCoins { needed: 457, available: 400 }));
    }

    #[test]
    fn test_updates_validated_before_any_apply() {
        let updates = vec![update("aapl", 180.0), update("MSFT", 0.0)];
        assert!(matches!(validate_updates(&updates), Err(AppError::Validation(_))));

        let updates = vec![update("nke", -1.0)];
        assert!(validate_updates(&updates).is_err());
    }

    #[test]
    fn test_updates_are_normalised() {
        let updates = validate_updates(&[update(" dis ", 97.5)]).unwrap();
        assert_eq!(updates[0].symbol, "DIS");
        assert_eq!(updates[0].price, 97.5);
    }
}
