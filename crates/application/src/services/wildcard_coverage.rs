use chrono::Utc;
use ferrous_shield_domain::{DomainError, Rule, RuleSource, RuleType, WildcardPolicy};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::precedence::PrecedenceResolver;
use super::wildcard_policy_handle::WildcardPolicyHandle;
use crate::ports::RuleStore;

/// Result of one bulk root-coverage pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnhancementOutcome {
    pub wildcards_examined: usize,
    pub skipped_existing: usize,
    pub skipped_allowlisted: usize,
    pub rules_added: usize,
}

/// Synthesizes explicit root-domain rules for wildcard rules, so that
/// `*.example.com` can also govern `example.com` when the policy says so.
pub struct WildcardCoverageProcessor {
    store: Arc<dyn RuleStore>,
    resolver: Arc<PrecedenceResolver>,
    policy: Arc<WildcardPolicyHandle>,
}

impl WildcardCoverageProcessor {
    pub fn new(
        store: Arc<dyn RuleStore>,
        resolver: Arc<PrecedenceResolver>,
        policy: Arc<WildcardPolicyHandle>,
    ) -> Self {
        Self {
            store,
            resolver,
            policy,
        }
    }

    pub fn is_wildcard_needing_root_coverage(&self, rule: &Rule) -> bool {
        needs_root_coverage(&self.policy.snapshot(), rule)
    }

    /// `*.example.com` -> `example.com`. `None` without the `*.` prefix.
    pub fn root_domain_from_wildcard(wildcard_domain: &str) -> Option<&str> {
        wildcard_domain
            .strip_prefix("*.")
            .filter(|root| !root.is_empty())
    }

    /// The wildcard itself, followed by its root rule when `include_root`
    /// applies. The root inherits action, priority, source and comment.
    pub fn process_wildcard_rule(rule: &Rule, include_root: bool) -> Vec<Rule> {
        let mut rules = vec![rule.clone()];

        if include_root && rule.is_wildcard() {
            if let Some(root) = Self::root_domain_from_wildcard(&rule.domain) {
                rules.push(Rule {
                    domain: Arc::from(root),
                    rule_type: RuleType::Exact,
                    auto_generated: true,
                    ..rule.clone()
                });
            }
        }

        rules
    }

    /// Adds a root rule for every wildcard that needs one and lacks it.
    ///
    /// Works from one snapshot of the store and the policy, then applies the
    /// whole batch with a single insert-if-absent write. Re-running it is a
    /// no-op once every root exists.
    pub fn enhance_wildcard_rules(&self) -> Result<EnhancementOutcome, DomainError> {
        let policy = self.policy.snapshot();
        let rules = self.store.all_rules();
        let now = Utc::now();

        let existing: FxHashSet<&str> = rules.iter().map(|r| r.domain.as_ref()).collect();
        let explicit_allows = self.resolver.explicit_allows(&rules, now);

        let mut outcome = EnhancementOutcome::default();
        let mut batch: Vec<Rule> = Vec::new();
        let mut queued: FxHashSet<&str> = FxHashSet::default();

        for rule in &rules {
            if !needs_root_coverage(&policy, rule) || rule.is_expired(now) {
                continue;
            }
            outcome.wildcards_examined += 1;

            let Some(root) = Self::root_domain_from_wildcard(&rule.domain) else {
                continue;
            };

            if existing.contains(root) || queued.contains(root) {
                outcome.skipped_existing += 1;
                continue;
            }

            if policy.respect_allowlist_precedence && explicit_allows.covers(root) {
                debug!(
                    root = %root,
                    wildcard = %rule.domain,
                    "Explicit allow wins over root coverage"
                );
                outcome.skipped_allowlisted += 1;
                continue;
            }

            queued.insert(root);
            batch.push(Rule {
                domain: Arc::from(root),
                rule_type: RuleType::Exact,
                priority: rule.priority.saturating_sub(1),
                source: RuleSource::System,
                comment: Some(Arc::from(format!(
                    "Auto-generated root coverage for {}",
                    rule.domain
                ))),
                updated_at: Some(now),
                auto_generated: true,
                ..Rule::clone(rule)
            });
        }

        if batch.is_empty() {
            debug!(
                wildcards = outcome.wildcards_examined,
                mode = %policy.mode,
                "No wildcard root coverage needed"
            );
            return Ok(outcome);
        }

        let pending = batch.len();
        match self.store.add_missing_rules(batch) {
            Ok(added) => {
                outcome.rules_added = added;
                info!(
                    rules_added = added,
                    pending = pending,
                    skipped_allowlisted = outcome.skipped_allowlisted,
                    mode = %policy.mode,
                    "Wildcard root coverage applied"
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(error = %e, pending = pending, "Failed to store wildcard root coverage");
                Err(e)
            }
        }
    }
}

fn needs_root_coverage(policy: &WildcardPolicy, rule: &Rule) -> bool {
    rule.rule_type == RuleType::Wildcard && policy.wildcard_should_match_root(&rule.domain)
}
