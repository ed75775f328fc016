pub mod cache;
pub mod rules;
pub mod stats;
pub mod wildcard;

pub use cache::{GetCacheStatsUseCase, SweepExpiredCacheUseCase};
pub use rules::{
    CheckDomainUseCase, CleanupExpiredRulesUseCase, EnhanceWildcardRulesUseCase,
    ReplaceSourceRulesUseCase, ResolutionDecision,
};
pub use stats::{CleanupOldQueryStatsUseCase, GetTopDomainsUseCase};
pub use wildcard::UpdateWildcardPolicyUseCase;
