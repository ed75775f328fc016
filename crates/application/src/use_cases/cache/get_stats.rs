use std::sync::Arc;

use crate::ports::{CacheStatsSnapshot, ResponseCachePort};

pub struct GetCacheStatsUseCase {
    cache: Arc<dyn ResponseCachePort>,
}

impl GetCacheStatsUseCase {
    pub fn new(cache: Arc<dyn ResponseCachePort>) -> Self {
        Self { cache }
    }

    pub fn execute(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }
}
