use ferrous_shield_application::use_cases::CleanupExpiredRulesUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const DEFAULT_INTERVAL_SECS: u64 = 300;

pub struct RuleExpiryJob {
    cleanup: Arc<CleanupExpiredRulesUseCase>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl RuleExpiryJob {
    pub fn new(cleanup: Arc<CleanupExpiredRulesUseCase>) -> Self {
        Self {
            cleanup,
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
        info!(interval_secs = self.interval_secs, "Starting rule expiry job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("RuleExpiryJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(e) = self.cleanup.execute() {
                            error!(error = %e, "Expired rule cleanup failed");
                        }
                    }
                }
            }
        })
    }
}
