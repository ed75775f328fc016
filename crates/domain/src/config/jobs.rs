use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobsConfig {
    /// Seconds between wildcard root-coverage passes.
    #[serde(default = "default_enhancement_interval")]
    pub enhancement_interval: u64,

    /// Seconds between query statistics pruning passes.
    #[serde(default = "default_query_stats_interval")]
    pub query_stats_interval: u64,

    /// Per-domain query counters untouched for this many days are dropped.
    #[serde(default = "default_query_stats_retention_days")]
    pub query_stats_retention_days: u32,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            enhancement_interval: default_enhancement_interval(),
            query_stats_interval: default_query_stats_interval(),
            query_stats_retention_days: default_query_stats_retention_days(),
        }
    }
}

fn default_enhancement_interval() -> u64 {
    300
}

fn default_query_stats_interval() -> u64 {
    3600
}

fn default_query_stats_retention_days() -> u32 {
    7
}
