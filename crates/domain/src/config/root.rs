use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::jobs::JobsConfig;
use super::logging::LoggingConfig;
use super::rules::RulesConfig;
use crate::rule::{normalize_domain, Rule};
use crate::wildcard_policy::{WildcardMode, WildcardPolicy};

const LOCAL_CONFIG_PATH: &str = "ferrous-shield.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-shield/config.toml";

/// Main configuration structure for Ferrous Shield
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Wildcard root-coverage policy
    #[serde(default)]
    pub wildcard: WildcardPolicy,

    /// Response cache sizing and sweep cadence
    #[serde(default)]
    pub cache: CacheConfig,

    /// Statically configured rules
    #[serde(default)]
    pub rules: RulesConfig,

    /// Background job cadence
    #[serde(default)]
    pub jobs: JobsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-shield.toml in current directory
    /// 3. /etc/ferrous-shield/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(mode) = overrides.wildcard_mode {
            self.wildcard.mode = mode;
        }
        if let Some(max_entries) = overrides.cache_max_entries {
            self.cache.max_entries = max_entries;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Validation(
                "cache.max_entries must be greater than 0".to_string(),
            ));
        }

        if self.cache.max_ttl == 0 {
            return Err(ConfigError::Validation(
                "cache.max_ttl must be greater than 0".to_string(),
            ));
        }

        if self.cache.shard_amount == 0 || !self.cache.shard_amount.is_power_of_two() {
            return Err(ConfigError::Validation(
                "cache.shard_amount must be a power of two".to_string(),
            ));
        }

        if self.cache.sweep_interval == 0
            || self.jobs.enhancement_interval == 0
            || self.rules.expiry_check_interval == 0
            || self.jobs.query_stats_interval == 0
        {
            return Err(ConfigError::Validation(
                "Job intervals must be greater than 0".to_string(),
            ));
        }

        if self.jobs.query_stats_retention_days == 0 {
            return Err(ConfigError::Validation(
                "jobs.query_stats_retention_days must be greater than 0".to_string(),
            ));
        }

        for pattern in self.rules.allow.iter().chain(&self.rules.block) {
            Rule::allow(pattern).map_err(|e| {
                ConfigError::Validation(format!("Invalid rule pattern '{}': {}", pattern, e))
            })?;
        }

        let allowed: HashSet<String> = self
            .rules
            .allow
            .iter()
            .map(|p| normalize_domain(p))
            .collect();
        if let Some(pattern) = self
            .rules
            .block
            .iter()
            .find(|p| allowed.contains(&normalize_domain(p)))
        {
            return Err(ConfigError::Validation(format!(
                "Pattern '{}' is listed in both rules.allow and rules.block",
                pattern
            )));
        }

        if let Some(limit) = self.rules.max_rules {
            let configured = self.rules.allow.len() + self.rules.block.len();
            if configured > limit {
                return Err(ConfigError::Validation(format!(
                    "{} configured rules exceed rules.max_rules ({})",
                    configured, limit
                )));
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub wildcard_mode: Option<WildcardMode>,
    pub cache_max_entries: Option<usize>,
}
