use bytes::Bytes;
use chrono::{DateTime, Utc};
use ferrous_shield_domain::RecordType;
use serde::Serialize;

/// Snapshot of response cache counters for telemetry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStatsSnapshot {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub insertions: u64,
    pub hit_rate: f64,
    /// When the counters were last zeroed, either at creation or by `clear`.
    pub last_reset: DateTime<Utc>,
}

/// Port for the TTL-aware upstream answer cache.
///
/// A miss is `None`, never an error; `put` silently drops what it cannot store.
pub trait ResponseCachePort: Send + Sync {
    fn get(&self, domain: &str, record_type: RecordType) -> Option<Bytes>;
    fn put(&self, domain: &str, record_type: RecordType, payload: Bytes, ttl_seconds: i64);
    fn clear(&self);
    fn evict_expired(&self) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn stats(&self) -> CacheStatsSnapshot;
}
