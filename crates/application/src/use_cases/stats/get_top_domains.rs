use ferrous_shield_domain::normalize_domain;
use std::sync::Arc;

use crate::ports::{DomainQueryCount, QueryStatsRepository};

/// Most frequently queried domains, the candidates for cache warming.
pub struct GetTopDomainsUseCase {
    stats: Arc<dyn QueryStatsRepository>,
}

impl GetTopDomainsUseCase {
    pub fn new(stats: Arc<dyn QueryStatsRepository>) -> Self {
        Self { stats }
    }

    pub fn execute(&self, limit: usize) -> Vec<DomainQueryCount> {
        self.stats.most_queried(limit)
    }

    pub fn count_for(&self, domain: &str) -> u64 {
        self.stats.query_count(&normalize_domain(domain))
    }
}
