mod query_stats_repository;
mod response_cache_port;
mod rule_store;
mod wildcard_policy_repository;

pub use query_stats_repository::{DomainQueryCount, QueryStatsRepository};
pub use response_cache_port::{CacheStatsSnapshot, ResponseCachePort};
pub use rule_store::RuleStore;
pub use wildcard_policy_repository::WildcardPolicyRepository;
