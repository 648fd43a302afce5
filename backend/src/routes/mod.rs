pub(crate) mod admin;
pub(crate) mod health;
pub(crate) mod leaderboard;
pub(crate) mod learning;
pub(crate) mod portfolio;
pub(crate) mod profiles;
pub(crate) mod stocks;
