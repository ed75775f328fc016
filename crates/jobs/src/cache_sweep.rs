use ferrous_shield_application::use_cases::{GetCacheStatsUseCase, SweepExpiredCacheUseCase};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Periodic expiry sweep of the response cache, followed by a stats report.
pub struct CacheSweepJob {
    sweep: Arc<SweepExpiredCacheUseCase>,
    stats: Arc<GetCacheStatsUseCase>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl CacheSweepJob {
    pub fn new(sweep: Arc<SweepExpiredCacheUseCase>, stats: Arc<GetCacheStatsUseCase>) -> Self {
        Self {
            sweep,
            stats,
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
        info!(interval_secs = self.interval_secs, "Starting cache sweep job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("CacheSweepJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = self.sweep.execute();
                        let stats = self.stats.execute();
                        info!(
                            removed = removed,
                            entries = stats.entries,
                            hits = stats.hits,
                            misses = stats.misses,
                            evictions = stats.evictions,
                            hit_rate = stats.hit_rate,
                            "Response cache sweep completed"
                        );
                    }
                }
            }
        })
    }
}
