use chrono::{DateTime, Utc};
use ferrous_shield_domain::{DomainError, Rule, RuleSource};
use std::sync::Arc;

/// Owner of every `Rule`. Lookups hand out shared snapshots; writes are
/// applied as whole batches, so a reader sees either all of a batch or none.
pub trait RuleStore: Send + Sync {
    /// O(1) lookup by the exact pattern string (`example.com` or `*.example.com`).
    fn rule_for_domain(&self, domain: &str) -> Option<Arc<Rule>>;

    fn all_rules(&self) -> Vec<Arc<Rule>>;

    /// Inserts or replaces rules by domain. Fails without applying anything
    /// when a rule is invalid or the batch would exceed the store capacity.
    fn add_rules(&self, rules: Vec<Rule>) -> Result<usize, DomainError>;

    /// Inserts only rules whose domain is absent at apply time; returns how
    /// many were inserted.
    fn add_missing_rules(&self, rules: Vec<Rule>) -> Result<usize, DomainError>;

    fn remove_rule_for_domain(&self, domain: &str) -> Result<bool, DomainError>;

    fn remove_rules_from_source(&self, source: RuleSource) -> Result<usize, DomainError>;

    fn remove_expired_rules(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Atomically swaps every rule of `source` for `rules`.
    fn replace_rules_from_source(
        &self,
        source: RuleSource,
        rules: Vec<Rule>,
    ) -> Result<usize, DomainError>;

    fn rules_from_source(&self, source: RuleSource) -> Vec<Arc<Rule>>;

    fn rule_count(&self) -> usize;
}
