#![allow(dead_code)]

use bytes::Bytes;
use chrono::{DateTime, Utc};
use ferrous_shield_application::ports::{
    CacheStatsSnapshot, DomainQueryCount, QueryStatsRepository, ResponseCachePort, RuleStore,
    WildcardPolicyRepository,
};
use ferrous_shield_domain::{DomainError, RecordType, Rule, RuleSource, WildcardPolicy};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Default)]
pub struct MockRuleStore {
    rules: RwLock<BTreeMap<String, Arc<Rule>>>,
    should_fail: AtomicBool,
    lookups: AtomicUsize,
    writes: AtomicUsize,
}

impl MockRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Rule>) -> Self {
        let store = Self::new();
        {
            let mut map = store.rules.write().unwrap();
            for rule in rules {
                map.insert(rule.domain.to_string(), Arc::new(rule));
            }
        }
        store
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn domains(&self) -> Vec<String> {
        self.rules.read().unwrap().keys().cloned().collect()
    }

    fn check_failure(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::RuleStoreError(
                "Mock rule store failed".to_string(),
            ));
        }
        Ok(())
    }
}

impl RuleStore for MockRuleStore {
    fn rule_for_domain(&self, domain: &str) -> Option<Arc<Rule>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.rules.read().unwrap().get(domain).cloned()
    }

    fn all_rules(&self) -> Vec<Arc<Rule>> {
        self.rules.read().unwrap().values().cloned().collect()
    }

    fn add_rules(&self, rules: Vec<Rule>) -> Result<usize, DomainError> {
        self.check_failure()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let count = rules.len();
        let mut map = self.rules.write().unwrap();
        for rule in rules {
            map.insert(rule.domain.to_string(), Arc::new(rule));
        }
        Ok(count)
    }

    fn add_missing_rules(&self, rules: Vec<Rule>) -> Result<usize, DomainError> {
        self.check_failure()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut map = self.rules.write().unwrap();
        let mut added = 0;
        for rule in rules {
            if !map.contains_key(rule.domain.as_ref()) {
                map.insert(rule.domain.to_string(), Arc::new(rule));
                added += 1;
            }
        }
        Ok(added)
    }

    fn remove_rule_for_domain(&self, domain: &str) -> Result<bool, DomainError> {
        self.check_failure()?;
        Ok(self.rules.write().unwrap().remove(domain).is_some())
    }

    fn remove_rules_from_source(&self, source: RuleSource) -> Result<usize, DomainError> {
        self.check_failure()?;
        let mut map = self.rules.write().unwrap();
        let before = map.len();
        map.retain(|_, rule| rule.source != source);
        Ok(before - map.len())
    }

    fn remove_expired_rules(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        self.check_failure()?;
        let mut map = self.rules.write().unwrap();
        let before = map.len();
        map.retain(|_, rule| !rule.is_expired(now));
        Ok(before - map.len())
    }

    fn replace_rules_from_source(
        &self,
        source: RuleSource,
        rules: Vec<Rule>,
    ) -> Result<usize, DomainError> {
        self.check_failure()?;
        let count = rules.len();
        let mut map = self.rules.write().unwrap();
        map.retain(|_, rule| rule.source != source);
        for rule in rules {
            map.insert(rule.domain.to_string(), Arc::new(rule));
        }
        Ok(count)
    }

    fn rules_from_source(&self, source: RuleSource) -> Vec<Arc<Rule>> {
        self.rules
            .read()
            .unwrap()
            .values()
            .filter(|rule| rule.source == source)
            .cloned()
            .collect()
    }

    fn rule_count(&self) -> usize {
        self.rules.read().unwrap().len()
    }
}

#[derive(Default)]
pub struct MockWildcardPolicyRepository {
    saved: RwLock<Vec<WildcardPolicy>>,
    should_fail: AtomicBool,
}

impl MockWildcardPolicyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn saved(&self) -> Vec<WildcardPolicy> {
        self.saved.read().unwrap().clone()
    }
}

impl WildcardPolicyRepository for MockWildcardPolicyRepository {
    fn save(&self, policy: &WildcardPolicy) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::IoError("Mock save failed".to_string()));
        }
        self.saved.write().unwrap().push(*policy);
        Ok(())
    }
}

/// Never expires anything on its own; `expire_all` marks every entry stale.
#[derive(Default)]
pub struct MockResponseCache {
    entries: RwLock<HashMap<(String, RecordType), (Bytes, bool)>>,
    stats: RwLock<CacheStatsSnapshot>,
}

impl MockResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expire_all(&self) {
        for entry in self.entries.write().unwrap().values_mut() {
            entry.1 = true;
        }
    }
}

impl ResponseCachePort for MockResponseCache {
    fn get(&self, domain: &str, record_type: RecordType) -> Option<Bytes> {
        let key = (domain.to_ascii_lowercase(), record_type);
        let found = self
            .entries
            .read()
            .unwrap()
            .get(&key)
            .filter(|(_, expired)| !expired)
            .map(|(payload, _)| payload.clone());

        let mut stats = self.stats.write().unwrap();
        match found {
            Some(_) => stats.hits += 1,
            None => stats.misses += 1,
        }
        found
    }

    fn put(&self, domain: &str, record_type: RecordType, payload: Bytes, ttl_seconds: i64) {
        if ttl_seconds <= 0 {
            return;
        }
        self.entries
            .write()
            .unwrap()
            .insert((domain.to_ascii_lowercase(), record_type), (payload, false));
        self.stats.write().unwrap().insertions += 1;
    }

    fn clear(&self) {
        self.entries.write().unwrap().clear();
        *self.stats.write().unwrap() = CacheStatsSnapshot::default();
    }

    fn evict_expired(&self) -> usize {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|_, (_, expired)| !*expired);
        let removed = before - entries.len();
        self.stats.write().unwrap().expirations += removed as u64;
        removed
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    fn stats(&self) -> CacheStatsSnapshot {
        let mut stats = self.stats.read().unwrap().clone();
        stats.entries = self.len();
        let lookups = stats.hits + stats.misses;
        stats.hit_rate = if lookups == 0 {
            0.0
        } else {
            stats.hits as f64 / lookups as f64
        };
        stats
    }
}

/// Query counters kept in a plain map, sorted on demand.
#[derive(Default)]
pub struct MockQueryStats {
    counters: RwLock<BTreeMap<String, (u64, DateTime<Utc>)>>,
}

impl MockQueryStats {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryStatsRepository for MockQueryStats {
    fn record_query(&self, domain: &str, at: DateTime<Utc>) {
        let mut counters = self.counters.write().unwrap();
        let counter = counters.entry(domain.to_string()).or_insert((0, at));
        counter.0 += 1;
        counter.1 = counter.1.max(at);
    }

    fn query_count(&self, domain: &str) -> u64 {
        self.counters.read().unwrap().get(domain).map_or(0, |c| c.0)
    }

    fn most_queried(&self, limit: usize) -> Vec<DomainQueryCount> {
        let mut top: Vec<DomainQueryCount> = self
            .counters
            .read()
            .unwrap()
            .iter()
            .map(|(domain, (count, last_queried))| DomainQueryCount {
                domain: domain.clone(),
                count: *count,
                last_queried: *last_queried,
            })
            .collect();
        top.sort_by(|a, b| b.count.cmp(&a.count).then(b.last_queried.cmp(&a.last_queried)));
        top.truncate(limit);
        top
    }

    fn remove_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut counters = self.counters.write().unwrap();
        let before = counters.len();
        counters.retain(|_, (_, last_queried)| *last_queried >= cutoff);
        before - counters.len()
    }

    fn len(&self) -> usize {
        self.counters.read().unwrap().len()
    }
}
