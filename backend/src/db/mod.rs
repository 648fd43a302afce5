pub mod holding_queries;
pub mod learning_queries;
pub mod profile_queries;
pub mod transaction_queries;
