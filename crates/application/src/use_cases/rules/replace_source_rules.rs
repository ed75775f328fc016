use chrono::Utc;
use ferrous_shield_domain::{DomainError, Rule, RuleSource};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::RuleStore;

/// Swaps in the full rule set of one source, e.g. after a manifest reload.
pub struct ReplaceSourceRulesUseCase {
    store: Arc<dyn RuleStore>,
}

impl ReplaceSourceRulesUseCase {
    pub fn new(store: Arc<dyn RuleStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, rules), fields(rules = rules.len()))]
    pub fn execute(&self, source: RuleSource, rules: Vec<Rule>) -> Result<usize, DomainError> {
        let now = Utc::now();
        let rules: Vec<Rule> = rules
            .into_iter()
            .map(|rule| {
                let rule = rule.with_source(source);
                match rule.updated_at {
                    Some(_) => rule,
                    None => rule.with_updated_at(now),
                }
            })
            .collect();

        for rule in &rules {
            rule.validate()?;
        }

        let stored = self.store.replace_rules_from_source(source, rules)?;

        info!(source = %source, rules = stored, "Rules replaced for source");

        Ok(stored)
    }
}
