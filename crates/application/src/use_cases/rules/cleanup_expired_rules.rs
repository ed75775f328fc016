use chrono::{DateTime, Utc};
use ferrous_shield_domain::DomainError;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::ports::RuleStore;

pub struct CleanupExpiredRulesUseCase {
    store: Arc<dyn RuleStore>,
}

impl CleanupExpiredRulesUseCase {
    pub fn new(store: Arc<dyn RuleStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub fn execute(&self) -> Result<usize, DomainError> {
        self.execute_at(Utc::now())
    }

    pub fn execute_at(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let removed = self.store.remove_expired_rules(now)?;

        if removed > 0 {
            info!(removed = removed, "Expired rules removed");
        } else {
            debug!("No expired rules");
        }

        Ok(removed)
    }
}
