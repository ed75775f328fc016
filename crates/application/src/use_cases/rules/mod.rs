mod check_domain;
mod cleanup_expired_rules;
mod enhance_wildcard_rules;
mod replace_source_rules;

pub use check_domain::{CheckDomainUseCase, ResolutionDecision};
pub use cleanup_expired_rules::CleanupExpiredRulesUseCase;
pub use enhance_wildcard_rules::EnhanceWildcardRulesUseCase;
pub use replace_source_rules::ReplaceSourceRulesUseCase;
