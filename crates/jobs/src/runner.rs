use crate::{CacheSweepJob, QueryStatsRetentionJob, RuleExpiryJob, WildcardEnhancementJob};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + Sync + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty) => {
        impl SpawnableJob for $t {
            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> JoinHandle<()> {
                self.start()
            }
        }
    };
}

impl_spawnable_job!(WildcardEnhancementJob);
impl_spawnable_job!(CacheSweepJob);
impl_spawnable_job!(RuleExpiryJob);
impl_spawnable_job!(QueryStatsRetentionJob);

fn spawn_job<J: SpawnableJob>(
    job: Option<J>,
    shutdown: &Option<CancellationToken>,
) -> Option<JoinHandle<()>> {
    job.map(|job| {
        let job = match shutdown {
            Some(token) => job.with_cancellation(token.clone()),
            None => job,
        };
        Arc::new(job).start_job()
    })
}

pub struct JobRunner {
    wildcard_enhancement: Option<WildcardEnhancementJob>,
    cache_sweep: Option<CacheSweepJob>,
    rule_expiry: Option<RuleExpiryJob>,
    query_stats_retention: Option<QueryStatsRetentionJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            wildcard_enhancement: None,
            cache_sweep: None,
            rule_expiry: None,
            query_stats_retention: None,
            shutdown: None,
        }
    }

    pub fn with_wildcard_enhancement(mut self, job: WildcardEnhancementJob) -> Self {
        self.wildcard_enhancement = Some(job);
        self
    }

    pub fn with_cache_sweep(mut self, job: CacheSweepJob) -> Self {
        self.cache_sweep = Some(job);
        self
    }

    pub fn with_rule_expiry(mut self, job: RuleExpiryJob) -> Self {
        self.rule_expiry = Some(job);
        self
    }

    pub fn with_query_stats_retention(mut self, job: QueryStatsRetentionJob) -> Self {
        self.query_stats_retention = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Spawns every configured job and returns their handles; they finish
    /// once the shutdown token is cancelled.
    pub fn start(self) -> Vec<JoinHandle<()>> {
        info!("Starting background job runner");

        let handles: Vec<JoinHandle<()>> = [
            spawn_job(self.wildcard_enhancement, &self.shutdown),
            spawn_job(self.cache_sweep, &self.shutdown),
            spawn_job(self.rule_expiry, &self.shutdown),
            spawn_job(self.query_stats_retention, &self.shutdown),
        ]
        .into_iter()
        .flatten()
        .collect();

        info!(jobs = handles.len(), "All background jobs started");
        handles
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
