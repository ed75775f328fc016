#![allow(dead_code)]

use bytes::Bytes;
use chrono::{DateTime, Utc};
use ferrous_shield_application::ports::{
    CacheStatsSnapshot, DomainQueryCount, QueryStatsRepository, ResponseCachePort, RuleStore,
};
use ferrous_shield_domain::{DomainError, RecordType, Rule, RuleSource};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Rule store that records how often the background jobs touch it.
#[derive(Default)]
pub struct CountingRuleStore {
    rules: Mutex<Vec<Arc<Rule>>>,
    snapshot_calls: AtomicU64,
    expiry_calls: AtomicU64,
    missing_calls: AtomicU64,
    should_fail: AtomicBool,
}

impl CountingRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Rule>) -> Self {
        let store = Self::new();
        *store.rules.lock().unwrap() = rules.into_iter().map(Arc::new).collect();
        store
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot_call_count(&self) -> u64 {
        self.snapshot_calls.load(Ordering::SeqCst)
    }

    pub fn expiry_call_count(&self) -> u64 {
        self.expiry_calls.load(Ordering::SeqCst)
    }

    pub fn missing_call_count(&self) -> u64 {
        self.missing_calls.load(Ordering::SeqCst)
    }

    fn fail_if_requested(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::RuleStoreError("mock failure".to_string()));
        }
        Ok(())
    }
}

impl RuleStore for CountingRuleStore {
    fn rule_for_domain(&self, domain: &str) -> Option<Arc<Rule>> {
        self.rules
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.domain.as_ref() == domain)
            .cloned()
    }

    fn all_rules(&self) -> Vec<Arc<Rule>> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        self.rules.lock().unwrap().clone()
    }

    fn add_rules(&self, rules: Vec<Rule>) -> Result<usize, DomainError> {
        self.fail_if_requested()?;
        let count = rules.len();
        self.rules
            .lock()
            .unwrap()
            .extend(rules.into_iter().map(Arc::new));
        Ok(count)
    }

    fn add_missing_rules(&self, rules: Vec<Rule>) -> Result<usize, DomainError> {
        self.missing_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_if_requested()?;
        let mut stored = self.rules.lock().unwrap();
        let mut added = 0;
        for rule in rules {
            if stored.iter().all(|r| r.domain != rule.domain) {
                stored.push(Arc::new(rule));
                added += 1;
            }
        }
        Ok(added)
    }

    fn remove_rule_for_domain(&self, domain: &str) -> Result<bool, DomainError> {
        self.fail_if_requested()?;
        let mut stored = self.rules.lock().unwrap();
        let before = stored.len();
        stored.retain(|r| r.domain.as_ref() != domain);
        Ok(stored.len() != before)
    }

    fn remove_rules_from_source(&self, source: RuleSource) -> Result<usize, DomainError> {
        self.fail_if_requested()?;
        let mut stored = self.rules.lock().unwrap();
        let before = stored.len();
        stored.retain(|r| r.source != source);
        Ok(before - stored.len())
    }

    fn remove_expired_rules(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        self.expiry_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_if_requested()?;
        let mut stored = self.rules.lock().unwrap();
        let before = stored.len();
        stored.retain(|r| !r.is_expired(now));
        Ok(before - stored.len())
    }

    fn replace_rules_from_source(
        &self,
        source: RuleSource,
        rules: Vec<Rule>,
    ) -> Result<usize, DomainError> {
        self.remove_rules_from_source(source)?;
        self.add_rules(rules)
    }

    fn rules_from_source(&self, source: RuleSource) -> Vec<Arc<Rule>> {
        self.rules
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.source == source)
            .cloned()
            .collect()
    }

    fn rule_count(&self) -> usize {
        self.rules.lock().unwrap().len()
    }
}

/// Response cache stand-in that only counts sweeps and stats reads.
#[derive(Default)]
pub struct CountingCache {
    sweep_calls: AtomicU64,
    stats_calls: AtomicU64,
}

impl CountingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sweep_call_count(&self) -> u64 {
        self.sweep_calls.load(Ordering::SeqCst)
    }

    pub fn stats_call_count(&self) -> u64 {
        self.stats_calls.load(Ordering::SeqCst)
    }
}

impl ResponseCachePort for CountingCache {
    fn get(&self, _domain: &str, _record_type: RecordType) -> Option<Bytes> {
        None
    }

    fn put(&self, _domain: &str, _record_type: RecordType, _payload: Bytes, _ttl_seconds: i64) {}

    fn clear(&self) {}

    fn evict_expired(&self) -> usize {
        self.sweep_calls.fetch_add(1, Ordering::SeqCst);
        0
    }

    fn len(&self) -> usize {
        0
    }

    fn stats(&self) -> CacheStatsSnapshot {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        CacheStatsSnapshot::default()
    }
}

/// Query stats holding one timestamp per domain and counting prune passes.
#[derive(Default)]
pub struct CountingQueryStats {
    last_seen: Mutex<Vec<(String, DateTime<Utc>)>>,
    prune_calls: AtomicU64,
}

impl CountingQueryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prune_call_count(&self) -> u64 {
        self.prune_calls.load(Ordering::SeqCst)
    }
}

impl QueryStatsRepository for CountingQueryStats {
    fn record_query(&self, domain: &str, at: DateTime<Utc>) {
        let mut last_seen = self.last_seen.lock().unwrap();
        last_seen.retain(|(name, _)| name != domain);
        last_seen.push((domain.to_string(), at));
    }

    fn query_count(&self, domain: &str) -> u64 {
        self.last_seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == domain)
            .count() as u64
    }

    fn most_queried(&self, limit: usize) -> Vec<DomainQueryCount> {
        self.last_seen
            .lock()
            .unwrap()
            .iter()
            .take(limit)
            .map(|(domain, at)| DomainQueryCount {
                domain: domain.clone(),
                count: 1,
                last_queried: *at,
            })
            .collect()
    }

    fn remove_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        self.prune_calls.fetch_add(1, Ordering::SeqCst);
        let mut last_seen = self.last_seen.lock().unwrap();
        let before = last_seen.len();
        last_seen.retain(|(_, at)| *at >= cutoff);
        before - last_seen.len()
    }

    fn len(&self) -> usize {
        self.last_seen.lock().unwrap().len()
    }
}
