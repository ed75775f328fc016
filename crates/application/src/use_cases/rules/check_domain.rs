use chrono::Utc;
use ferrous_shield_domain::{
    normalize_domain, validate_query_domain, DomainError, Rule, RuleAction,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::ports::QueryStatsRepository;
use crate::services::PrecedenceResolver;

/// Verdict for one domain together with everything that competed for it.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionDecision {
    pub domain: String,
    pub action: RuleAction,
    pub winner: Option<Arc<Rule>>,
    /// Live candidates, most preferred first.
    pub candidates: Vec<Arc<Rule>>,
}

pub struct CheckDomainUseCase {
    resolver: Arc<PrecedenceResolver>,
    query_stats: Option<Arc<dyn QueryStatsRepository>>,
}

impl CheckDomainUseCase {
    pub fn new(resolver: Arc<PrecedenceResolver>) -> Self {
        Self {
            resolver,
            query_stats: None,
        }
    }

    /// Counts every valid checked domain, whatever its verdict.
    pub fn with_query_stats(mut self, stats: Arc<dyn QueryStatsRepository>) -> Self {
        self.query_stats = Some(stats);
        self
    }

    #[instrument(skip(self))]
    pub fn execute(&self, domain: &str) -> Result<ResolutionDecision, DomainError> {
        let domain = normalize_domain(domain);
        validate_query_domain(&domain)?;

        let now = Utc::now();
        if let Some(stats) = &self.query_stats {
            stats.record_query(&domain, now);
        }

        let mut candidates = self.resolver.find_all_matches(&domain);
        candidates.retain(|rule| !rule.is_expired(now));
        PrecedenceResolver::sort_candidates(&domain, &mut candidates);

        let winner = candidates.first().cloned();
        let action = winner
            .as_ref()
            .map_or(RuleAction::Unknown, |rule| rule.action);

        debug!(
            domain = %domain,
            action = %action,
            winner = ?winner.as_ref().map(|r| r.domain.as_ref()),
            candidates = candidates.len(),
            "Domain checked"
        );

        Ok(ResolutionDecision {
            domain,
            action,
            winner,
            candidates,
        })
    }
}
