use std::sync::Arc;
use tracing::{debug, instrument};

use crate::ports::ResponseCachePort;

pub struct SweepExpiredCacheUseCase {
    cache: Arc<dyn ResponseCachePort>,
}

impl SweepExpiredCacheUseCase {
    pub fn new(cache: Arc<dyn ResponseCachePort>) -> Self {
        Self { cache }
    }

    #[instrument(skip(self))]
    pub fn execute(&self) -> usize {
        let removed = self.cache.evict_expired();
        debug!(
            removed = removed,
            remaining = self.cache.len(),
            "Response cache sweep completed"
        );
        removed
    }
}
