use crate::di::UseCases;
use ferrous_shield_domain::Config;
use ferrous_shield_jobs::{
    CacheSweepJob, JobRunner, QueryStatsRetentionJob, RuleExpiryJob, WildcardEnhancementJob,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Runs the maintenance jobs until Ctrl-C, then waits for them to stop.
pub async fn run(config: &Config, use_cases: &UseCases) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();

    let handles = JobRunner::new()
        .with_wildcard_enhancement(
            WildcardEnhancementJob::new(use_cases.enhance_wildcards.clone())
                .with_interval(config.jobs.enhancement_interval),
        )
        .with_cache_sweep(
            CacheSweepJob::new(use_cases.sweep_cache.clone(), use_cases.cache_stats.clone())
                .with_interval(config.cache.sweep_interval),
        )
        .with_rule_expiry(
            RuleExpiryJob::new(use_cases.cleanup_rules.clone())
                .with_interval(config.rules.expiry_check_interval),
        )
        .with_query_stats_retention(
            QueryStatsRetentionJob::new(
                use_cases.cleanup_query_stats.clone(),
                config.jobs.query_stats_retention_days,
            )
            .with_interval(config.jobs.query_stats_interval),
        )
        .with_shutdown_token(shutdown.clone())
        .start();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    shutdown.cancel();

    for handle in handles {
        if let Err(e) = handle.await {
            error!(error = %e, "Background job terminated abnormally");
        }
    }

    info!("Shutdown complete");
    Ok(())
}
