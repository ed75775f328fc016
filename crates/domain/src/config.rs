pub mod cache;
pub mod errors;
pub mod jobs;
pub mod logging;
pub mod root;
pub mod rules;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use jobs::JobsConfig;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use rules::RulesConfig;
