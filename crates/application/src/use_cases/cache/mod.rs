mod get_stats;
mod sweep_expired;

pub use get_stats::GetCacheStatsUseCase;
pub use sweep_expired::SweepExpiredCacheUseCase;
