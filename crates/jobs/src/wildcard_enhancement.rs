use ferrous_shield_application::use_cases::EnhanceWildcardRulesUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Re-runs the root-coverage pass so rules added since the last pass (or a
/// policy switch to root coverage) get their root rules. A failed pass is
/// logged and retried on the next tick.
pub struct WildcardEnhancementJob {
    enhance: Arc<EnhanceWildcardRulesUseCase>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl WildcardEnhancementJob {
    pub fn new(enhance: Arc<EnhanceWildcardRulesUseCase>) -> Self {
        Self {
            enhance,
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
            interval_secs = self.interval_secs,
            "Starting wildcard enhancement job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("WildcardEnhancementJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.enhance.execute() {
                            Ok(outcome) if outcome.rules_added > 0 => {
                                info!(
                                    rules_added = outcome.rules_added,
                                    skipped_allowlisted = outcome.skipped_allowlisted,
                                    "Wildcard enhancement pass completed"
                                );
                            }
                            Ok(outcome) => {
                                debug!(
                                    wildcards = outcome.wildcards_examined,
                                    "Wildcard enhancement pass found nothing to add"
                                );
                            }
                            Err(e) => {
                                error!(error = %e, "Wildcard enhancement pass failed");
                            }
                        }
                    }
                }
            }
        })
    }
}
