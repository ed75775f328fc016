use ferrous_shield_application::services::{
    PrecedenceResolver, WildcardCoverageProcessor, WildcardPolicyHandle,
};
use ferrous_shield_application::use_cases::ReplaceSourceRulesUseCase;
use ferrous_shield_domain::{Config, Rule, RuleSource};
use ferrous_shield_infrastructure::{
    InMemoryQueryStats, InMemoryRuleStore, ResponseCache, ResponseCacheConfig,
};
use std::sync::Arc;
use tracing::info;

pub struct Services {
    pub store: Arc<InMemoryRuleStore>,
    pub resolver: Arc<PrecedenceResolver>,
    pub policy: Arc<WildcardPolicyHandle>,
    pub processor: Arc<WildcardCoverageProcessor>,
    pub cache: Arc<ResponseCache>,
    pub query_stats: Arc<InMemoryQueryStats>,
}

impl Services {
    /// Builds the shared components and seeds the configured rules, followed
    /// by one root-coverage pass so the first lookup already sees them.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(InMemoryRuleStore::with_max_rules(config.rules.max_rules));
        let resolver = Arc::new(PrecedenceResolver::new(store.clone()));
        let policy = Arc::new(WildcardPolicyHandle::new(config.wildcard));
        let processor = Arc::new(WildcardCoverageProcessor::new(
            store.clone(),
            resolver.clone(),
            policy.clone(),
        ));
        let cache = Arc::new(ResponseCache::new(ResponseCacheConfig::from(&config.cache)));

        let seeded = ReplaceSourceRulesUseCase::new(store.clone())
            .execute(RuleSource::User, configured_rules(config)?)?;
        let outcome = processor.enhance_wildcard_rules()?;

        info!(
            seeded = seeded,
            root_rules = outcome.rules_added,
            mode = %config.wildcard.mode,
            "Rule store ready"
        );

        Ok(Self {
            store,
            resolver,
            policy,
            processor,
            cache,
            query_stats: Arc::new(InMemoryQueryStats::new()),
        })
    }
}

/// Block patterns go first so an allow for the same pattern replaces them.
fn configured_rules(config: &Config) -> anyhow::Result<Vec<Rule>> {
    let priority = config.rules.default_priority;
    let block = config.rules.block.iter().map(|p| Rule::block(p));
    let allow = config.rules.allow.iter().map(|p| Rule::allow(p));

    block
        .chain(allow)
        .map(|rule| Ok(rule?.with_priority(priority)))
        .collect()
}
