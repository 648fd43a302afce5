use std::cmp::Ordering;
use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{HeldStock, Leaderboard, LeaderboardEntry, Position, Profile, RankedEntry};
use crate::services::valuation_service;

/// Sorts by portfolio value descending and numbers the result 1..=n.
///
/// The sort is stable, so tied entries keep their input order and still get
/// distinct consecutive ranks.
pub fn assign_ranks(entries: Vec<LeaderboardEntry>) -> Vec<RankedEntry> {
    let mut sorted = entries;
    sorted.sort_by(|a, b| b.portfolio_value.partial_cmp(&a.portfolio_value).unwrap_or(Ordering::Equal));
    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| RankedEntry { entry, rank: idx + 1 })
        .collect()
}

fn rank_of(ranked: &[RankedEntry], user_id: Uuid) -> usize {
    ranked
        .iter()
        .find(|r| r.entry.user_id == user_id)
        .map(|r| r.rank)
        .unwrap_or(0)
}

pub fn rank(
    entries: Vec<LeaderboardEntry>,
    requesting_user_id: Uuid,
    requesting_user_group: Option<&str>,
) -> Leaderboard {
    let group_entries: Vec<LeaderboardEntry> = match requesting_user_group {
        Some(group) => entries
            .iter()
            .filter(|e| e.group.as_deref() == Some(group))
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let global = assign_ranks(entries);
    let group = assign_ranks(group_entries);

    Leaderboard {
        user_global_rank: rank_of(&global, requesting_user_id),
        user_group_rank: rank_of(&group, requesting_user_id),
        total_players: global.len(),
        group_size: group.len(),
        global,
        group,
    }
}

/// Keeps the first `limit` entries of each view. User ranks are left as
/// computed over the full sets.
pub fn truncate(mut leaderboard: Leaderboard, limit: usize) -> Leaderboard {
    leaderboard.global.truncate(limit);
    leaderboard.group.truncate(limit);
    leaderboard
}

/// Builds one entry per profile, in profile order.
///
/// Portfolio value is the user's coin balance plus the market value of their
/// holdings; return percent is the holdings' gain/loss percent. Invalid
/// holdings reject the whole build instead of skewing the comparison.
pub fn build_entries(profiles: &[Profile], holdings: &[HeldStock]) -> Result<Vec<LeaderboardEntry>, AppError> {
    let mut by_user: HashMap<Uuid, Vec<Position>> = HashMap::new();
    for held in holdings {
        by_user.entry(held.user_id).or_default().push(Position::from(held));
    }

    profiles
        .iter()
        .map(|profile| {
            let positions = by_user.get(&profile.user_id).map(Vec::as_slice).unwrap_or(&[]);
            let valuation = valuation_service::valuate(positions).map_err(|e| {
                error!("Invalid holdings for user {}: {}", profile.user_id, e);
                e
            })?;

            Ok(LeaderboardEntry {
                user_id: profile.user_id,
                display_name: profile.display_name_or_default(),
                portfolio_value: profile.virtual_coins as f64 + valuation.total_value,
                return_percent: valuation.gain_loss_percent,
                group: profile.user_group.clone(),
            })
        })
        .collect()
}

/// Loads current snapshots and ranks them. Load failures are returned as-is;
/// nothing is retried or served from an older ranking.
///
/// When `group` is not given, the requesting user's own group is used.
pub async fn fetch_leaderboard(
    pool: &PgPool,
    user_id: Uuid,
    group: Option<String>,
    limit: Option<usize>,
) -> Result<Leaderboard, AppError> {
    let profiles = db::profile_queries::fetch_all(pool).await?;
    let holdings = db::holding_queries::fetch_all(pool).await?;

    let group = group.or_else(|| {
        profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .and_then(|p| p.user_group.clone())
    });

    let entries = build_entries(&profiles, &holdings)?;
    let leaderboard = rank(entries, user_id, group.as_deref());
    info!(
        "Ranked {} players for {} (global #{}, group #{})",
        leaderboard.total_players, user_id, leaderboard.user_global_rank, leaderboard.user_group_rank
    );

    Ok(match limit {
        Some(limit) => truncate(leaderboard, limit),
        None => leaderboard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(id: u128, value: f64, group: Option<&str>) -> LeaderboardEntry {
        LeaderboardEntry {
            user_id: Uuid::from_u128(id),
            display_name: format!("user-{}", id),
            portfolio_value: value,
            return_percent: 0.0,
            group: group.map(String::from),
        }
    }

    fn ids(ranked: &[RankedEntry]) -> Vec<(u128, usize)> {
        ranked.iter().map(|r| (r.entry.user_id.as_u128(), r.rank)).collect()
    }

    #[test]
    fn test_ties_keep_input_order() {
        let entries = vec![entry(1, 300.0, None), entry(2, 500.0, None), entry(3, 500.0, None)];
        let board = rank(entries, Uuid::from_u128(1), None);
        assert_eq!(ids(&board.global), vec![(2, 1), (3, 2), (1, 3)]);
        assert_eq!(board.user_global_rank, 3);
    }

    #[test]
    fn test_signed_zero_values_tie() {
        let entries = vec![entry(1, -0.0, None), entry(2, 0.0, None)];
        let board = rank(entries, Uuid::from_u128(2), None);
        assert_eq!(ids(&board.global), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_absent_user_is_unranked() {
        let entries = vec![entry(1, 300.0, Some("A")), entry(2, 500.0, Some("A"))];
        let board = rank(entries, Uuid::from_u128(99), Some("A"));
        assert_eq!(board.user_global_rank, 0);
        assert_eq!(board.user_group_rank, 0);
        assert_eq!(board.global.len(), 2);
    }

    #[test]
    fn test_group_ranks_are_independent() {
        let entries = vec![
            entry(1, 900.0, Some("Tech Investors")),
            entry(2, 800.0, Some("Tech Investors")),
            entry(3, 700.0, None),
            entry(4, 600.0, Some("Tech Investors")),
            entry(5, 500.0, Some("Beginners Club")),
            entry(6, 400.0, Some("Beginners Club")),
        ];
        let board = rank(entries, Uuid::from_u128(5), Some("Beginners Club"));
        assert_eq!(board.user_global_rank, 5);
        assert_eq!(board.user_group_rank, 1);
        assert_eq!(ids(&board.group), vec![(5, 1), (6, 2)]);
        assert_eq!(board.total_players, 6);
        assert_eq!(board.group_size, 2);
    }

    #[test]
    fn test_empty_group() {
        let entries = vec![entry(1, 100.0, Some("A"))];
        let board = rank(entries, Uuid::from_u128(1), Some("Nobody"));
        assert!(board.group.is_empty());
        assert_eq!(board.user_group_rank, 0);
        assert_eq!(board.user_global_rank, 1);
    }

    #[test]
    fn test_no_group_requested() {
        let board = rank(vec![entry(1, 100.0, Some("A"))], Uuid::from_u128(1), None);
        assert!(board.group.is_empty());
        assert_eq!(board.group_size, 0);
    }

    #[test]
    fn test_empty_entries() {
        let board = rank(Vec::new(), Uuid::from_u128(1), Some("A"));
        assert!(board.global.is_empty());
        assert_eq!(board.user_global_rank, 0);
        assert_eq!(board.total_players, 0);
    }

    #[test]
    fn test_ranks_are_dense() {
        let entries = vec![
            entry(1, 100.0, None),
            entry(2, 100.0, None),
            entry(3, 100.0, None),
            entry(4, 50.0, None),
        ];
        let ranks: Vec<usize> = assign_ranks(entries).iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_truncate_keeps_user_ranks() {
        let entries = (1..=10).map(|i| entry(i, i as f64 * 10.0, Some("G"))).collect();
        let board = truncate(rank(entries, Uuid::from_u128(1), Some("G")), 3);
        assert_eq!(board.global.len(), 3);
        assert_eq!(board.group.len(), 3);
        assert_eq!(board.user_global_rank, 10);
        assert_eq!(board.total_players, 10);
    }

    fn profile(id: u128, coins: i64, group: Option<&str>) -> Profile {
        Profile {
            user_id: Uuid::from_u128(id),
            display_name: None,
            user_group: group.map(String::from),
            virtual_coins: coins,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn held(user: u128, symbol: &str, shares: i32, buy: f64, current: f64) -> HeldStock {
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        HeldStock {
            id: Uuid::new_v4(),
            user_id: Uuid::from_u128(user),
            stock_symbol: symbol.to_string(),
            stock_name: symbol.to_string(),
            shares,
            buy_price: buy,
            current_price: current,
            category: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_build_entries_values_coins_and_holdings() {
        let profiles = vec![profile(1, 1000, Some("A")), profile(2, 250, None)];
        let holdings = vec![
            held(2, "AAPL", 2, 100.0, 150.0),
            held(2, "MCD", 1, 50.0, 40.0),
        ];

        let entries = build_entries(&profiles, &holdings).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].portfolio_value, 1000.0);
        assert_eq!(entries[0].return_percent, 0.0);
        assert_eq!(entries[0].display_name, "Anonymous Investor");
        assert_eq!(entries[1].portfolio_value, 590.0);
        assert!((entries[1].return_percent - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_entries_rejects_bad_holdings() {
        let profiles = vec![profile(1, 100, None)];
        let holdings = vec![held(1, "BAD", -3, 10.0, 10.0)];
        assert!(matches!(build_entries(&profiles, &holdings), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_build_entries_ignores_holdings_of_unknown_users() {
        let profiles = vec![profile(1, 100, None)];
        let holdings = vec![held(7, "AAPL", 1, 10.0, 10.0)];
        let entries = build_entries(&profiles, &holdings).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].portfolio_value, 100.0);
    }
}
