use chrono::{DateTime, Utc};
use ferrous_shield_domain::{Rule, RuleAction, RuleSource, RuleType};
use rustc_hash::FxHashSet;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use crate::ports::RuleStore;

/// One step of the precedence chain. `Less` means `a` is preferred.
pub type TieBreak = fn(query: &str, a: &Rule, b: &Rule) -> Ordering;

/// Evaluated in order; the first non-equal step decides.
pub const TIE_BREAKS: [TieBreak; 6] = [
    tie_break::exactness,
    tie_break::action,
    tie_break::specificity,
    tie_break::priority,
    tie_break::source,
    tie_break::fallback,
];

pub mod tie_break {
    use super::*;

    /// A rule spelling the query verbatim beats every pattern match.
    pub fn exactness(query: &str, a: &Rule, b: &Rule) -> Ordering {
        let a_exact = a.domain.as_ref() == query;
        let b_exact = b.domain.as_ref() == query;
        b_exact.cmp(&a_exact)
    }

    /// Fail open: `Allow` before `Block` before `Unknown`.
    pub fn action(_query: &str, a: &Rule, b: &Rule) -> Ordering {
        action_rank(a.action).cmp(&action_rank(b.action))
    }

    pub fn specificity(_query: &str, a: &Rule, b: &Rule) -> Ordering {
        b.specificity().cmp(&a.specificity())
    }

    pub fn priority(_query: &str, a: &Rule, b: &Rule) -> Ordering {
        b.priority.cmp(&a.priority)
    }

    pub fn source(_query: &str, a: &Rule, b: &Rule) -> Ordering {
        b.source.is_user().cmp(&a.source.is_user())
    }

    /// Keeps the order total: domain string, then exact before wildcard,
    /// then source rank.
    pub fn fallback(_query: &str, a: &Rule, b: &Rule) -> Ordering {
        a.domain
            .cmp(&b.domain)
            .then_with(|| type_rank(a.rule_type).cmp(&type_rank(b.rule_type)))
            .then_with(|| source_rank(a.source).cmp(&source_rank(b.source)))
    }

    fn action_rank(action: RuleAction) -> u8 {
        match action {
            RuleAction::Allow => 0,
            RuleAction::Block => 1,
            RuleAction::Unknown => 2,
        }
    }

    fn type_rank(rule_type: RuleType) -> u8 {
        match rule_type {
            RuleType::Exact => 0,
            RuleType::Wildcard => 1,
        }
    }

    fn source_rank(source: RuleSource) -> u8 {
        match source {
            RuleSource::User => 0,
            RuleSource::Manifest => 1,
            RuleSource::Remote => 2,
            RuleSource::System => 3,
            RuleSource::Managed => 4,
        }
    }
}

/// Full precedence comparison of two candidates for `query`.
pub fn compare(query: &str, a: &Rule, b: &Rule) -> Ordering {
    TIE_BREAKS
        .iter()
        .map(|step| step(query, a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Picks the single winning rule for a domain out of the rules that match it.
///
/// The resolver never validates its input: `domain` must already be
/// normalized (lowercase, no trailing dot).
pub struct PrecedenceResolver {
    store: Arc<dyn RuleStore>,
}

impl PrecedenceResolver {
    pub fn new(store: Arc<dyn RuleStore>) -> Self {
        Self { store }
    }

    /// Action of the most preferred candidate, or `Unknown` when there is none.
    pub fn resolve<R: Borrow<Rule>>(domain: &str, candidates: &[R]) -> RuleAction {
        Self::winner(domain, candidates).map_or(RuleAction::Unknown, |rule| rule.action)
    }

    pub fn winner<'a, R: Borrow<Rule>>(domain: &str, candidates: &'a [R]) -> Option<&'a Rule> {
        candidates
            .iter()
            .map(|candidate| Borrow::<Rule>::borrow(candidate))
            .min_by(|a, b| compare(domain, a, b))
    }

    /// Candidates ordered most preferred first.
    pub fn sort_candidates<R: Borrow<Rule>>(domain: &str, candidates: &mut [R]) {
        candidates.sort_by(|a, b| {
            compare(domain, Borrow::<Rule>::borrow(a), Borrow::<Rule>::borrow(b))
        });
    }

    /// Exact rule, then `*.<suffix>` for every proper suffix, then the TLD wildcard.
    pub fn find_all_matches(&self, domain: &str) -> Vec<Arc<Rule>> {
        let mut matches: Vec<Arc<Rule>> = Vec::new();

        if let Some(rule) = self.store.rule_for_domain(domain) {
            matches.push(rule);
        }

        let mut probe = String::with_capacity(domain.len() + 2);
        for (dot, _) in domain.match_indices('.') {
            self.probe_wildcard(&mut probe, &domain[dot + 1..], &mut matches);
        }

        // Single-label names have no TLD wildcard to probe.
        if let Some((_, tld)) = domain.rsplit_once('.') {
            self.probe_wildcard(&mut probe, tld, &mut matches);
        }

        matches
    }

    fn probe_wildcard(&self, probe: &mut String, suffix: &str, matches: &mut Vec<Arc<Rule>>) {
        if suffix.is_empty() {
            return;
        }
        probe.clear();
        probe.push_str("*.");
        probe.push_str(suffix);

        if let Some(rule) = self.store.rule_for_domain(probe) {
            if !matches.iter().any(|m| m.domain == rule.domain) {
                matches.push(rule);
            }
        }
    }

    /// Looks up candidates for `domain` and returns the winning action.
    pub fn resolve_domain(&self, domain: &str) -> RuleAction {
        let mut candidates = self.find_all_matches(domain);
        Self::sort_candidates(domain, &mut candidates);

        let action = candidates
            .first()
            .map_or(RuleAction::Unknown, |rule| rule.action);

        debug!(
            domain = %domain,
            action = %action,
            candidates = ?candidates.iter().map(|r| r.domain.as_ref()).collect::<Vec<_>>(),
            "Resolved domain"
        );

        action
    }

    /// Whether a live, non-wildcard allow exists for `domain` or for any name
    /// below it. `allowed.foo.com` counts for `foo.com`, the reverse of normal
    /// DNS matching, so administrators can exempt a zone from root coverage.
    pub fn has_explicit_allow_rule(&self, domain: &str) -> bool {
        self.has_explicit_allow_rule_at(domain, Utc::now())
    }

    pub fn has_explicit_allow_rule_at(&self, domain: &str, now: DateTime<Utc>) -> bool {
        if self
            .store
            .rule_for_domain(domain)
            .is_some_and(|rule| is_live_explicit_allow(&rule, now))
        {
            return true;
        }

        self.store.all_rules().iter().any(|rule| {
            is_live_explicit_allow(rule, now) && is_same_or_subdomain(&rule.domain, domain)
        })
    }

    /// `has_explicit_allow_rule` for many names against one store snapshot.
    pub fn explicit_allows<'a>(
        &self,
        rules: &'a [Arc<Rule>],
        now: DateTime<Utc>,
    ) -> ExplicitAllows<'a> {
        ExplicitAllows::from_rules(rules, now)
    }
}

fn is_live_explicit_allow(rule: &Rule, now: DateTime<Utc>) -> bool {
    rule.action == RuleAction::Allow && !rule.is_wildcard() && !rule.is_expired(now)
}

/// Every name at or above a live exact allow, down to its TLD.
///
/// `allowed.foo.com` registers `allowed.foo.com`, `foo.com` and `com`.
pub struct ExplicitAllows<'a> {
    covered: FxHashSet<&'a str>,
}

impl<'a> ExplicitAllows<'a> {
    pub fn from_rules(rules: &'a [Arc<Rule>], now: DateTime<Utc>) -> Self {
        let mut covered = FxHashSet::default();
        for rule in rules.iter().filter(|rule| is_live_explicit_allow(rule, now)) {
            let domain: &'a str = rule.domain.as_ref();
            covered.insert(domain);
            for (dot, _) in domain.match_indices('.') {
                covered.insert(&domain[dot + 1..]);
            }
        }
        Self { covered }
    }

    pub fn covers(&self, domain: &str) -> bool {
        self.covered.contains(domain)
    }
}

/// True for `domain` itself or any name below it on a label boundary.
pub fn is_same_or_subdomain(candidate: &str, domain: &str) -> bool {
    candidate == domain
        || candidate
            .strip_suffix(domain)
            .is_some_and(|head| head.len() > 1 && head.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, action: RuleAction) -> Rule {
        Rule::new(pattern, action).unwrap()
    }

    #[test]
    fn each_tie_break_prefers_the_documented_side() {
        let q = "x.foo.com";
        let exact = rule("x.foo.com", RuleAction::Block);
        let wild = rule("*.foo.com", RuleAction::Allow);
        assert_eq!(tie_break::exactness(q, &exact, &wild), Ordering::Less);

        let allow = rule("*.foo.com", RuleAction::Allow);
        let block = rule("*.foo.com", RuleAction::Block);
        assert_eq!(tie_break::action(q, &allow, &block), Ordering::Less);

        let deep = rule("*.foo.com", RuleAction::Block);
        let shallow = rule("*.com", RuleAction::Block);
        assert_eq!(tie_break::specificity(q, &deep, &shallow), Ordering::Less);

        let high = rule("*.com", RuleAction::Block).with_priority(10);
        let low = rule("*.com", RuleAction::Block).with_priority(-3);
        assert_eq!(tie_break::priority(q, &high, &low), Ordering::Less);

        let user = rule("*.com", RuleAction::Block);
        let system = rule("*.com", RuleAction::Block).with_source(RuleSource::System);
        assert_eq!(tie_break::source(q, &user, &system), Ordering::Less);

        let managed = rule("*.com", RuleAction::Block).with_source(RuleSource::Managed);
        assert_eq!(tie_break::source(q, &system, &managed), Ordering::Equal);
        assert_eq!(tie_break::fallback(q, &system, &managed), Ordering::Less);
    }

    #[test]
    fn subdomain_relation_respects_label_boundaries() {
        assert!(is_same_or_subdomain("foo.com", "foo.com"));
        assert!(is_same_or_subdomain("allowed.foo.com", "foo.com"));
        assert!(!is_same_or_subdomain("barfoo.com", "foo.com"));
        assert!(!is_same_or_subdomain("com", "foo.com"));
    }

    #[test]
    fn explicit_allows_register_every_ancestor_of_live_allows() {
        let now = Utc::now();
        let rules = vec![
            Arc::new(rule("allowed.foo.com", RuleAction::Allow)),
            Arc::new(rule("*.bar.com", RuleAction::Allow)),
            Arc::new(rule("blocked.baz.com", RuleAction::Block)),
            Arc::new(
                rule("old.qux.com", RuleAction::Allow)
                    .with_expires_at(now - chrono::Duration::minutes(1)),
            ),
        ];
        let allows = ExplicitAllows::from_rules(&rules, now);

        assert!(allows.covers("allowed.foo.com"));
        assert!(allows.covers("foo.com"));
        assert!(!allows.covers("bar.com"));
        assert!(!allows.covers("baz.com"));
        assert!(!allows.covers("qux.com"));
    }
}
