use serde::{Deserialize, Serialize};

/// Static rules seeded into the store as `User` rules at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub allow: Vec<String>,

    #[serde(default)]
    pub block: Vec<String>,

    #[serde(default)]
    pub default_priority: i64,

    /// Hard cap on stored rules; `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rules: Option<usize>,

    /// Seconds between expired-rule cleanups.
    #[serde(default = "default_expiry_check_interval")]
    pub expiry_check_interval: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            allow: vec![],
            block: vec![],
            default_priority: 0,
            max_rules: None,
            expiry_check_interval: default_expiry_check_interval(),
        }
    }
}

fn default_expiry_check_interval() -> u64 {
    300
}
