use super::Services;
use ferrous_shield_application::use_cases::{
    CheckDomainUseCase, CleanupExpiredRulesUseCase, CleanupOldQueryStatsUseCase,
    EnhanceWildcardRulesUseCase, GetCacheStatsUseCase, GetTopDomainsUseCase,
    SweepExpiredCacheUseCase, UpdateWildcardPolicyUseCase,
};
use ferrous_shield_infrastructure::TomlWildcardPolicyRepository;
use std::path::PathBuf;
use std::sync::Arc;

pub struct UseCases {
    pub check_domain: Arc<CheckDomainUseCase>,
    pub enhance_wildcards: Arc<EnhanceWildcardRulesUseCase>,
    pub cleanup_rules: Arc<CleanupExpiredRulesUseCase>,
    pub sweep_cache: Arc<SweepExpiredCacheUseCase>,
    pub cache_stats: Arc<GetCacheStatsUseCase>,
    pub update_wildcard_policy: Arc<UpdateWildcardPolicyUseCase>,
    pub top_domains: Arc<GetTopDomainsUseCase>,
    pub cleanup_query_stats: Arc<CleanupOldQueryStatsUseCase>,
}

impl UseCases {
    pub fn new(services: &Services, config_path: PathBuf) -> Self {
        let policy_repository = Arc::new(TomlWildcardPolicyRepository::new(config_path));

        Self {
            check_domain: Arc::new(
                CheckDomainUseCase::new(services.resolver.clone())
                    .with_query_stats(services.query_stats.clone()),
            ),
            enhance_wildcards: Arc::new(EnhanceWildcardRulesUseCase::new(
                services.processor.clone(),
            )),
            cleanup_rules: Arc::new(CleanupExpiredRulesUseCase::new(services.store.clone())),
            sweep_cache: Arc::new(SweepExpiredCacheUseCase::new(services.cache.clone())),
            cache_stats: Arc::new(GetCacheStatsUseCase::new(services.cache.clone())),
            update_wildcard_policy: Arc::new(
                UpdateWildcardPolicyUseCase::new(services.policy.clone(), policy_repository)
                    .with_processor(services.processor.clone()),
            ),
            top_domains: Arc::new(GetTopDomainsUseCase::new(services.query_stats.clone())),
            cleanup_query_stats: Arc::new(CleanupOldQueryStatsUseCase::new(
                services.query_stats.clone(),
            )),
        }
    }
}
