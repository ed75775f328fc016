mod clock;
mod entry;
mod key;
mod metrics;
mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use metrics::CacheMetrics;
pub use storage::{ResponseCache, ResponseCacheConfig};
