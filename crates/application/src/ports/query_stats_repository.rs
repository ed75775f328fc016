use chrono::{DateTime, Utc};
use serde::Serialize;

/// How often a domain has been asked for, and when it was last seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainQueryCount {
    pub domain: String,
    pub count: u64,
    pub last_queried: DateTime<Utc>,
}

/// Per-domain query counters used to pick cache-warming candidates.
///
/// Domains are expected in normalized form; recording never fails.
pub trait QueryStatsRepository: Send + Sync {
    fn record_query(&self, domain: &str, at: DateTime<Utc>);

    /// 0 for a domain that was never recorded.
    fn query_count(&self, domain: &str) -> u64;

    /// Highest counts first; ties go to the most recently queried, then by name.
    fn most_queried(&self, limit: usize) -> Vec<DomainQueryCount>;

    /// Drops counters whose last query is older than `cutoff`.
    fn remove_older_than(&self, cutoff: DateTime<Utc>) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
