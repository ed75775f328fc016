use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::ports::QueryStatsRepository;

pub struct CleanupOldQueryStatsUseCase {
    stats: Arc<dyn QueryStatsRepository>,
}

impl CleanupOldQueryStatsUseCase {
    pub fn new(stats: Arc<dyn QueryStatsRepository>) -> Self {
        Self { stats }
    }

    #[instrument(skip(self))]
    pub fn execute(&self, retention_days: u32) -> usize {
        self.execute_at(retention_days, Utc::now())
    }

    pub fn execute_at(&self, retention_days: u32, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(i64::from(retention_days));
        let removed = self.stats.remove_older_than(cutoff);

        if removed > 0 {
            info!(
                removed = removed,
                retention_days = retention_days,
                remaining = self.stats.len(),
                "Old query stats cleaned up"
            );
        } else {
            debug!(retention_days = retention_days, "No stale query stats");
        }

        removed
    }
}
