mod cleanup_old_query_stats;
mod get_top_domains;

pub use cleanup_old_query_stats::CleanupOldQueryStatsUseCase;
pub use get_top_domains::GetTopDomainsUseCase;
