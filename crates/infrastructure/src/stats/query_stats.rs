use chrono::{DateTime, Utc};
use compact_str::CompactString;
use dashmap::DashMap;
use ferrous_shield_application::ports::{DomainQueryCount, QueryStatsRepository};
use rustc_hash::FxBuildHasher;
use std::cmp::Reverse;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct QueryCounter {
    count: u64,
    last_queried: DateTime<Utc>,
}

/// Sharded per-domain query counters. Recording only locks the shard that
/// owns the domain.
pub struct InMemoryQueryStats {
    counters: DashMap<CompactString, QueryCounter, FxBuildHasher>,
}

impl InMemoryQueryStats {
    pub fn new() -> Self {
        Self {
            counters: DashMap::with_hasher(FxBuildHasher),
        }
    }
}

impl Default for InMemoryQueryStats {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryStatsRepository for InMemoryQueryStats {
    fn record_query(&self, domain: &str, at: DateTime<Utc>) {
        self.counters
            .entry(CompactString::from(domain))
            .and_modify(|counter| {
                counter.count += 1;
                counter.last_queried = counter.last_queried.max(at);
            })
            .or_insert(QueryCounter {
                count: 1,
                last_queried: at,
            });
    }

    fn query_count(&self, domain: &str) -> u64 {
        self.counters.get(domain).map_or(0, |counter| counter.count)
    }

    fn most_queried(&self, limit: usize) -> Vec<DomainQueryCount> {
        let mut top: Vec<DomainQueryCount> = self
            .counters
            .iter()
            .map(|entry| DomainQueryCount {
                domain: entry.key().to_string(),
                count: entry.count,
                last_queried: entry.last_queried,
            })
            .collect();

        top.sort_by(|a, b| {
            (Reverse(a.count), Reverse(a.last_queried), &a.domain).cmp(&(
                Reverse(b.count),
                Reverse(b.last_queried),
                &b.domain,
            ))
        });
        top.truncate(limit);
        top
    }

    fn remove_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.counters.len();
        self.counters.retain(|_, counter| counter.last_queried >= cutoff);
        let removed = before.saturating_sub(self.counters.len());

        debug!(removed = removed, cutoff = %cutoff, "Pruned query counters");
        removed
    }

    fn len(&self) -> usize {
        self.counters.len()
    }
}
