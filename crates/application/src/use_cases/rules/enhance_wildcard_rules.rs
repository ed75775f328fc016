use ferrous_shield_domain::DomainError;
use std::sync::Arc;
use tracing::instrument;

use crate::services::{EnhancementOutcome, WildcardCoverageProcessor};

pub struct EnhanceWildcardRulesUseCase {
    processor: Arc<WildcardCoverageProcessor>,
}

impl EnhanceWildcardRulesUseCase {
    pub fn new(processor: Arc<WildcardCoverageProcessor>) -> Self {
        Self { processor }
    }

    #[instrument(skip(self))]
    pub fn execute(&self) -> Result<EnhancementOutcome, DomainError> {
        self.processor.enhance_wildcard_rules()
    }
}
