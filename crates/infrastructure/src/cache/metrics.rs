use chrono::{DateTime, Utc};
use ferrous_shield_application::ports::CacheStatsSnapshot;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering as AtomicOrdering};

// hits and misses are touched on every lookup; keep them on their own cache line.
#[repr(align(64))]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    _hot_pad: [u64; 6],

    pub insertions: AtomicU64,
    pub evictions: AtomicU64,
    pub expirations: AtomicU64,

    // Wall-clock milliseconds of the last reset.
    last_reset_ms: AtomicI64,
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            _hot_pad: [0; 6],
            insertions: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            last_reset_ms: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }
}

impl CacheMetrics {
    /// `hits / (hits + misses)`, or 0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(AtomicOrdering::Relaxed) as f64;
        let total = hits + self.misses.load(AtomicOrdering::Relaxed) as f64;

        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.hits,
            &self.misses,
            &self.insertions,
            &self.evictions,
            &self.expirations,
        ] {
            counter.store(0, AtomicOrdering::Relaxed);
        }
        self.last_reset_ms
            .store(Utc::now().timestamp_millis(), AtomicOrdering::Relaxed);
    }

    pub fn last_reset(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_reset_ms.load(AtomicOrdering::Relaxed))
            .unwrap_or_default()
    }

    pub fn snapshot(&self, entries: usize) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            entries,
            hits: self.hits.load(AtomicOrdering::Relaxed),
            misses: self.misses.load(AtomicOrdering::Relaxed),
            evictions: self.evictions.load(AtomicOrdering::Relaxed),
            expirations: self.expirations.load(AtomicOrdering::Relaxed),
            insertions: self.insertions.load(AtomicOrdering::Relaxed),
            hit_rate: self.hit_rate(),
            last_reset: self.last_reset(),
        }
    }
}
