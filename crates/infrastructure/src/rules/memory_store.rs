use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use ferrous_shield_application::ports::RuleStore;
use ferrous_shield_domain::{DomainError, Rule, RuleSource};
use rustc_hash::FxBuildHasher;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

type RuleMap = HashMap<Arc<str>, Arc<Rule>, FxBuildHasher>;

#[derive(Default)]
struct RuleIndex {
    rules: RuleMap,
}

/// Copy-on-write rule store.
///
/// Readers load the current index without locking. Writers are serialized,
/// build a modified copy and swap it in, so a batch is visible entirely or
/// not at all.
pub struct InMemoryRuleStore {
    index: ArcSwap<RuleIndex>,
    write_lock: Mutex<()>,
    max_rules: Option<usize>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self {
            index: ArcSwap::from_pointee(RuleIndex::default()),
            write_lock: Mutex::new(()),
            max_rules: None,
        }
    }

    pub fn with_max_rules(max_rules: Option<usize>) -> Self {
        Self {
            max_rules,
            ..Self::new()
        }
    }

    fn update<T>(
        &self,
        apply: impl FnOnce(&mut RuleMap) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut rules = self.index.load().rules.clone();
        let result = apply(&mut rules)?;

        if let Some(limit) = self.max_rules {
            if rules.len() > limit {
                return Err(DomainError::RuleStoreCapacityExceeded {
                    attempted: rules.len(),
                    limit,
                });
            }
        }

        self.index.store(Arc::new(RuleIndex { rules }));
        Ok(result)
    }

    fn validate_batch(rules: &[Rule]) -> Result<(), DomainError> {
        rules.iter().try_for_each(Rule::validate)
    }
}

impl Default for InMemoryRuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore for InMemoryRuleStore {
    #[inline]
    fn rule_for_domain(&self, domain: &str) -> Option<Arc<Rule>> {
        self.index.load().rules.get(domain).cloned()
    }

    fn all_rules(&self) -> Vec<Arc<Rule>> {
        self.index.load().rules.values().cloned().collect()
    }

    fn add_rules(&self, rules: Vec<Rule>) -> Result<usize, DomainError> {
        Self::validate_batch(&rules)?;
        let count = rules.len();

        self.update(|map| {
            for rule in rules {
                map.insert(Arc::clone(&rule.domain), Arc::new(rule));
            }
            Ok(())
        })?;

        debug!(rules = count, "Rules added");
        Ok(count)
    }

    fn add_missing_rules(&self, rules: Vec<Rule>) -> Result<usize, DomainError> {
        Self::validate_batch(&rules)?;

        let added = self.update(|map| {
            let mut added = 0;
            for rule in rules {
                if map.contains_key(rule.domain.as_ref()) {
                    continue;
                }
                map.insert(Arc::clone(&rule.domain), Arc::new(rule));
                added += 1;
            }
            Ok(added)
        })?;

        debug!(rules = added, "Missing rules added");
        Ok(added)
    }

    fn remove_rule_for_domain(&self, domain: &str) -> Result<bool, DomainError> {
        if !self.index.load().rules.contains_key(domain) {
            return Ok(false);
        }
        self.update(|map| Ok(map.remove(domain).is_some()))
    }

    fn remove_rules_from_source(&self, source: RuleSource) -> Result<usize, DomainError> {
        let removed = self.update(|map| {
            let before = map.len();
            map.retain(|_, rule| rule.source != source);
            Ok(before - map.len())
        })?;

        info!(source = %source, removed = removed, "Rules removed for source");
        Ok(removed)
    }

    fn remove_expired_rules(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let has_expired = self
            .index
            .load()
            .rules
            .values()
            .any(|rule| rule.is_expired(now));
        if !has_expired {
            return Ok(0);
        }

        self.update(|map| {
            let before = map.len();
            map.retain(|_, rule| !rule.is_expired(now));
            Ok(before - map.len())
        })
    }

    fn replace_rules_from_source(
        &self,
        source: RuleSource,
        rules: Vec<Rule>,
    ) -> Result<usize, DomainError> {
        Self::validate_batch(&rules)?;
        if let Some(rule) = rules.iter().find(|rule| rule.source != source) {
            return Err(DomainError::InvalidRule(format!(
                "rule {} has source {}, expected {}",
                rule.domain, rule.source, source
            )));
        }
        let count = rules.len();

        self.update(|map| {
            map.retain(|_, rule| rule.source != source);
            for rule in rules {
                map.insert(Arc::clone(&rule.domain), Arc::new(rule));
            }
            Ok(())
        })?;

        info!(source = %source, rules = count, "Rules replaced for source");
        Ok(count)
    }

    fn rules_from_source(&self, source: RuleSource) -> Vec<Arc<Rule>> {
        self.index
            .load()
            .rules
            .values()
            .filter(|rule| rule.source == source)
            .cloned()
            .collect()
    }

    fn rule_count(&self) -> usize {
        self.index.load().rules.len()
    }
}
