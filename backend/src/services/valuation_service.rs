use crate::errors::AppError;
use crate::models::{CategoryAllocation, PortfolioValuation, Position, PositionValuation};

const UNCATEGORISED: &str = "Other";

fn validate(position: &Position) -> Result<(), AppError> {
    if position.shares < 0 {
        return Err(AppError::Validation(format!(
            "{}: shares cannot be negative ({})",
            position.symbol, position.shares
        )));
    }
    if !position.current_price.is_finite() || position.current_price < 0.0 {
        return Err(AppError::Validation(format!(
            "{}: current price must be a non-negative number ({})",
            position.symbol, position.current_price
        )));
    }
    if position.is_closed() {
        return Ok(());
    }
    if !position.buy_price.is_finite() || position.buy_price <= 0.0 {
        return Err(AppError::Validation(format!(
            "{}: invalid cost basis ({})",
            position.symbol, position.buy_price
        )));
    }
    Ok(())
}

/// Aggregate value, cost and return of a set of positions.
///
/// Closed positions are skipped. Returns full precision; rounding is left to
/// whoever displays the numbers.
pub fn valuate(positions: &[Position]) -> Result<PortfolioValuation, AppError> {
    let mut total_value = 0.0;
    let mut total_cost = 0.0;

    for position in positions {
        validate(position)?;
        if position.is_closed() {
            continue;
        }
        let shares = position.shares as f64;
        total_value += shares * position.current_price;
        total_cost += shares * position.buy_price;
    }

    let gain_loss = total_value - total_cost;
    let gain_loss_percent = if total_cost > 0.0 {
        gain_loss / total_cost * 100.0
    } else {
        0.0
    };

    Ok(PortfolioValuation {
        total_value,
        total_cost,
        gain_loss,
        gain_loss_percent,
    })
}

pub fn valuate_position(position: &Position) -> Result<PositionValuation, AppError> {
    validate(position)?;
    if position.buy_price <= 0.0 {
        return Err(AppError::Validation(format!(
            "{}: invalid cost basis ({})",
            position.symbol, position.buy_price
        )));
    }

    let shares = position.shares as f64;
    let price_delta = position.current_price - position.buy_price;

    Ok(PositionValuation {
        symbol: position.symbol.clone(),
        shares: position.shares,
        market_value: shares * position.current_price,
        cost_basis: shares * position.buy_price,
        gain_loss: shares * price_delta,
        gain_loss_percent: price_delta / position.buy_price * 100.0,
    })
}

/// Per-position figures for the open positions, in input order.
pub fn breakdown(positions: &[Position]) -> Result<Vec<PositionValuation>, AppError> {
    let mut out = Vec::with_capacity(positions.len());
    for position in positions {
        validate(position)?;
        if position.is_closed() {
            continue;
        }
        out.push(valuate_position(position)?);
    }
    Ok(out)
}

/// Market value grouped by category label, largest first.
pub fn category_allocation(positions: &[Position]) -> Result<Vec<CategoryAllocation>, AppError> {
    let mut buckets: Vec<(String, f64)> = Vec::new();

    for position in positions {
        validate(position)?;
        if position.is_closed() {
            continue;
        }
        let label = position
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORISED);
        let value = position.shares as f64 * position.current_price;

        match buckets.iter().position(|(name, _)| name == label) {
            Some(idx) => buckets[idx].1 += value,
            None => buckets.push((label.to_string(), value)),
        }
    }

    let total: f64 = buckets.iter().map(|(_, v)| v).sum();
    let mut allocations: Vec<CategoryAllocation> = buckets
        .into_iter()
        .map(|(category, market_value)| CategoryAllocation {
            percent_of_total: if total > 0.0 { market_value / total * 100.0 } else { 0.0 },
            category,
            market_value,
        })
        .collect();

    // sort_by is stable: equal values keep first-seen order
    allocations.sort_by(|a, b| b.market_value.total_cmp(&a.market_value));
    Ok(allocations)
}
