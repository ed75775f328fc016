use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Upper bound applied to upstream TTLs before computing expiry.
    #[serde(default = "default_max_ttl")]
    pub max_ttl: u32,

    /// Seconds between background expiry sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval: u64,

    #[serde(default = "default_shard_amount")]
    pub shard_amount: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_ttl: default_max_ttl(),
            sweep_interval: default_sweep_interval(),
            shard_amount: default_shard_amount(),
        }
    }
}

fn default_max_entries() -> usize {
    10_000
}

fn default_max_ttl() -> u32 {
    86_400
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_shard_amount() -> usize {
    16
}
