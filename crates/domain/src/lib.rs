//! Ferrous Shield Domain Layer
pub mod config;
pub mod errors;
pub mod record_type;
pub mod rule;
pub mod wildcard_policy;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use record_type::RecordType;
pub use rule::{normalize_domain, validate_query_domain, Rule, RuleAction, RuleSource, RuleType};
pub use wildcard_policy::{WildcardMode, WildcardPolicy};
