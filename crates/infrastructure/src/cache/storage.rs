use super::clock::{Clock, SystemClock};
use super::entry::CacheEntry;
use super::key::CacheKey;
use super::metrics::CacheMetrics;
use bytes::Bytes;
use dashmap::DashMap;
use ferrous_shield_application::ports::{CacheStatsSnapshot, ResponseCachePort};
use ferrous_shield_domain::config::CacheConfig;
use ferrous_shield_domain::RecordType;
use rustc_hash::FxBuildHasher;
use std::collections::VecDeque;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const MIN_ORDER_COMPACTION: usize = 16;

#[derive(Debug, Clone)]
pub struct ResponseCacheConfig {
    pub max_entries: usize,
    /// Upper bound in seconds; larger TTLs are clamped.
    pub max_ttl: u64,
    pub shard_amount: usize,
}

impl Default for ResponseCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_ttl: 86_400,
            shard_amount: 16,
        }
    }
}

impl From<&CacheConfig> for ResponseCacheConfig {
    fn from(config: &CacheConfig) -> Self {
        Self {
            max_entries: config.max_entries,
            max_ttl: u64::from(config.max_ttl),
            shard_amount: config.shard_amount,
        }
    }
}

/// Insertion order of live keys. Stale pairs (key replaced or removed since)
/// are skipped by sequence number and dropped on compaction.
struct InsertionOrder {
    queue: VecDeque<(u64, CacheKey)>,
    next_seq: u64,
    /// Lower bound on the earliest expiry among stored entries.
    next_expiry: Option<Instant>,
}

/// TTL-aware cache of upstream answers keyed by `(domain, record type)`.
///
/// Reads go straight to the sharded map. Every write that changes membership
/// (`put`, `clear`, `evict_expired`) is serialized on the insertion-order
/// lock, which is never held while another subsystem's lock is taken.
pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry, FxBuildHasher>,
    order: Mutex<InsertionOrder>,
    metrics: CacheMetrics,
    max_entries: usize,
    max_ttl: u64,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(config: ResponseCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ResponseCacheConfig, clock: Arc<dyn Clock>) -> Self {
        info!(
            max_entries = config.max_entries,
            max_ttl = config.max_ttl,
            shard_amount = config.shard_amount,
            "Initializing response cache"
        );

        let entries = DashMap::with_capacity_and_hasher_and_shard_amount(
            config.max_entries.min(1 << 16),
            FxBuildHasher,
            config.shard_amount.max(2).next_power_of_two(),
        );

        Self {
            entries,
            order: Mutex::new(InsertionOrder {
                queue: VecDeque::new(),
                next_seq: 0,
                next_expiry: None,
            }),
            metrics: CacheMetrics::default(),
            max_entries: config.max_entries,
            max_ttl: config.max_ttl,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Returns the payload if present and not yet expired. An expired entry
    /// counts as a miss and is purged on the way out.
    pub fn get(&self, domain: &str, record_type: RecordType) -> Option<Bytes> {
        let key = CacheKey::new(domain, record_type);
        let now = self.clock.now();

        let expired_seq = match self.entries.get(&key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
                return Some(entry.payload.clone());
            }
            Some(entry) => Some(entry.seq),
            None => None,
        };

        self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);

        if let Some(seq) = expired_seq {
            // Only remove the exact entry we saw; a concurrent put may have replaced it.
            if self
                .entries
                .remove_if(&key, |_, entry| entry.seq == seq)
                .is_some()
            {
                self.metrics.expirations.fetch_add(1, AtomicOrdering::Relaxed);
            }
        }

        None
    }

    /// Entry metadata without touching hit/miss counters.
    pub fn peek(&self, domain: &str, record_type: RecordType) -> Option<CacheEntry> {
        let key = CacheKey::new(domain, record_type);
        self.entries.get(&key).map(|entry| entry.value().clone())
    }

    /// Stores `payload` for `ttl_seconds`, clamped to `max_ttl`. Non-positive
    /// TTLs and a zero-capacity cache store nothing.
    pub fn put(&self, domain: &str, record_type: RecordType, payload: Bytes, ttl_seconds: i64) {
        if ttl_seconds <= 0 || self.max_entries == 0 {
            return;
        }
        let ttl = (ttl_seconds as u64).min(self.max_ttl);
        if ttl == 0 {
            return;
        }

        let key = CacheKey::new(domain, record_type);
        let now = self.clock.now();
        let mut order = self.lock_order();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.make_room(&mut order, now);
        }

        let seq = order.next_seq;
        order.next_seq += 1;

        let entry = CacheEntry::new(payload, now, Duration::from_secs(ttl), ttl_seconds, seq);
        order.next_expiry = Some(match order.next_expiry {
            Some(earliest) => earliest.min(entry.expires_at),
            None => entry.expires_at,
        });
        order.queue.push_back((seq, key.clone()));

        debug!(
            domain = %key.domain,
            record_type = %record_type,
            ttl = ttl,
            "Inserted response into cache"
        );

        self.entries.insert(key, entry);
        self.metrics.insertions.fetch_add(1, AtomicOrdering::Relaxed);

        self.compact_order(&mut order);
    }

    /// Drops every entry and resets all counters.
    pub fn clear(&self) {
        let mut order = self.lock_order();
        let dropped = self.entries.len();

        self.entries.clear();
        order.queue.clear();
        order.next_expiry = None;
        self.metrics.reset();

        info!(dropped = dropped, "Response cache cleared");
    }

    /// Removes every expired entry regardless of capacity pressure.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut order = self.lock_order();

        let removed = self.remove_expired(&mut order, now);
        if removed > 0 {
            self.metrics
                .expirations
                .fetch_add(removed as u64, AtomicOrdering::Relaxed);
        }
        self.compact_order(&mut order);

        removed
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.metrics.snapshot(self.entries.len())
    }

    /// Frees one slot: expired entries go first, then the oldest insertion.
    /// Expired victims count as expirations; `evictions` only counts live
    /// entries pushed out by capacity.
    fn make_room(&self, order: &mut InsertionOrder, now: Instant) {
        if order.next_expiry.is_some_and(|earliest| earliest <= now) {
            let removed = self.remove_expired(order, now);
            if removed > 0 {
                self.metrics
                    .expirations
                    .fetch_add(removed as u64, AtomicOrdering::Relaxed);
                debug!(removed = removed, "Dropped expired responses for capacity");
            }
        }

        while self.entries.len() >= self.max_entries {
            let Some((seq, key)) = order.queue.pop_front() else {
                break;
            };
            if self
                .entries
                .remove_if(&key, |_, entry| entry.seq == seq)
                .is_some()
            {
                self.metrics.evictions.fetch_add(1, AtomicOrdering::Relaxed);
                debug!(domain = %key.domain, "Evicted oldest response for capacity");
            }
        }
    }

    fn remove_expired(&self, order: &mut InsertionOrder, now: Instant) -> usize {
        let mut removed = 0;
        let mut earliest: Option<Instant> = None;

        self.entries.retain(|_, entry| {
            if entry.is_expired_at(now) {
                removed += 1;
                false
            } else {
                earliest = Some(earliest.map_or(entry.expires_at, |e| e.min(entry.expires_at)));
                true
            }
        });

        order.next_expiry = earliest;
        removed
    }

    fn compact_order(&self, order: &mut InsertionOrder) {
        let live = self.entries.len().max(MIN_ORDER_COMPACTION);
        if order.queue.len() <= live * 2 {
            return;
        }

        order.queue.retain(|(seq, key)| {
            self.entries
                .get(key)
                .is_some_and(|entry| entry.seq == *seq)
        });
    }

    fn lock_order(&self) -> MutexGuard<'_, InsertionOrder> {
        self.order.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResponseCachePort for ResponseCache {
    fn get(&self, domain: &str, record_type: RecordType) -> Option<Bytes> {
        ResponseCache::get(self, domain, record_type)
    }

    fn put(&self, domain: &str, record_type: RecordType, payload: Bytes, ttl_seconds: i64) {
        ResponseCache::put(self, domain, record_type, payload, ttl_seconds)
    }

    fn clear(&self) {
        ResponseCache::clear(self)
    }

    fn evict_expired(&self) -> usize {
        ResponseCache::evict_expired(self)
    }

    fn len(&self) -> usize {
        ResponseCache::len(self)
    }

    fn is_empty(&self) -> bool {
        ResponseCache::is_empty(self)
    }

    fn stats(&self) -> CacheStatsSnapshot {
        ResponseCache::stats(self)
    }
}
