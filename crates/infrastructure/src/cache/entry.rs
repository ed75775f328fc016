use bytes::Bytes;
use std::time::{Duration, Instant};

/// One cached upstream answer. Replaced wholesale on re-insertion.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub payload: Bytes,
    pub inserted_at: Instant,
    pub expires_at: Instant,
    /// TTL as supplied by the caller, before clamping.
    pub original_ttl: i64,
    pub(crate) seq: u64,
}

impl CacheEntry {
    pub(crate) fn new(
        payload: Bytes,
        now: Instant,
        ttl: Duration,
        original_ttl: i64,
        seq: u64,
    ) -> Self {
        Self {
            payload,
            inserted_at: now,
            expires_at: now + ttl,
            original_ttl,
            seq,
        }
    }

    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn remaining_ttl(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}
