//! Ferrous Shield Infrastructure Layer
pub mod cache;
pub mod persistence;
pub mod rules;
pub mod stats;

pub use cache::{ResponseCache, ResponseCacheConfig};
pub use persistence::TomlWildcardPolicyRepository;
pub use rules::InMemoryRuleStore;
pub use stats::InMemoryQueryStats;
