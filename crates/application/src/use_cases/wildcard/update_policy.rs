use ferrous_shield_domain::{DomainError, WildcardPolicy};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::ports::WildcardPolicyRepository;
use crate::services::{WildcardCoverageProcessor, WildcardPolicyHandle};

/// Administrator change of the wildcard policy.
///
/// The new policy takes effect in memory first; a failed save is reported
/// but does not roll the change back.
pub struct UpdateWildcardPolicyUseCase {
    handle: Arc<WildcardPolicyHandle>,
    repository: Arc<dyn WildcardPolicyRepository>,
    processor: Option<Arc<WildcardCoverageProcessor>>,
}

impl UpdateWildcardPolicyUseCase {
    pub fn new(
        handle: Arc<WildcardPolicyHandle>,
        repository: Arc<dyn WildcardPolicyRepository>,
    ) -> Self {
        Self {
            handle,
            repository,
            processor: None,
        }
    }

    /// Runs a root-coverage pass right after every change.
    pub fn with_processor(mut self, processor: Arc<WildcardCoverageProcessor>) -> Self {
        self.processor = Some(processor);
        self
    }

    #[instrument(skip(self))]
    pub fn execute(&self, policy: WildcardPolicy) -> Result<WildcardPolicy, DomainError> {
        let previous = self.handle.replace(policy);

        info!(
            previous_mode = %previous.mode,
            mode = %policy.mode,
            respect_allowlist_precedence = policy.respect_allowlist_precedence,
            "Wildcard policy updated"
        );

        if let Some(processor) = &self.processor {
            if let Err(e) = processor.enhance_wildcard_rules() {
                warn!(error = %e, "Root coverage pass after policy change failed");
            }
        }

        if let Err(e) = self.repository.save(&policy) {
            error!(error = %e, "Failed to persist wildcard policy");
            return Err(e);
        }

        Ok(previous)
    }
}
