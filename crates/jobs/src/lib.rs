pub mod cache_sweep;
pub mod query_stats_retention;
pub mod rule_expiry;
pub mod runner;
pub mod wildcard_enhancement;

pub use cache_sweep::CacheSweepJob;
pub use query_stats_retention::QueryStatsRetentionJob;
pub use rule_expiry::RuleExpiryJob;
pub use runner::JobRunner;
pub use wildcard_enhancement::WildcardEnhancementJob;
