use ferrous_shield_application::use_cases::CleanupOldQueryStatsUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Periodically forgets domains that have not been queried within the
/// retention window.
pub struct QueryStatsRetentionJob {
    cleanup: Arc<CleanupOldQueryStatsUseCase>,
    retention_days: u32,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl QueryStatsRetentionJob {
    pub fn new(cleanup: Arc<CleanupOldQueryStatsUseCase>, retention_days: u32) -> Self {
        Self {
            cleanup,
            retention_days,
            interval_secs: DEFAULT_INTERVAL_SECS,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        info!(
            retention_days = self.retention_days,
            interval_secs = self.interval_secs,
            "Starting query stats retention job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("QueryStatsRetentionJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = self.cleanup.execute(self.retention_days);
                        debug!(removed = removed, "Query stats retention pass completed");
                    }
                }
            }
        })
    }
}
