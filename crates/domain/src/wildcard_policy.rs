use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rule::WILDCARD_PREFIX;

/// How a `*.example.com` rule treats the bare `example.com`.
///
/// Persisted as an integer (`0`, `1`, `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum WildcardMode {
    /// `*.example.com` only matches subdomains.
    #[default]
    SubdomainsOnly,
    /// `*.example.com` also covers `example.com`.
    IncludeRoot,
    /// Covers the root unless explicitly allowed. Currently the same as
    /// `IncludeRoot`; allowlist suppression happens in the coverage pass.
    Smart,
}

impl WildcardMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WildcardMode::SubdomainsOnly => "subdomains_only",
            WildcardMode::IncludeRoot => "include_root",
            WildcardMode::Smart => "smart",
        }
    }
}

impl TryFrom<i64> for WildcardMode {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WildcardMode::SubdomainsOnly),
            1 => Ok(WildcardMode::IncludeRoot),
            2 => Ok(WildcardMode::Smart),
            other => Err(format!("Invalid wildcard mode: {} (expected 0, 1 or 2)", other)),
        }
    }
}

impl From<WildcardMode> for i64 {
    fn from(mode: WildcardMode) -> Self {
        match mode {
            WildcardMode::SubdomainsOnly => 0,
            WildcardMode::IncludeRoot => 1,
            WildcardMode::Smart => 2,
        }
    }
}

impl fmt::Display for WildcardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wildcard root-coverage settings.
///
/// A plain `Copy` value: readers always take a whole snapshot, so the two
/// fields can never come from different configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildcardPolicy {
    #[serde(default)]
    pub mode: WildcardMode,

    #[serde(default = "default_true")]
    pub respect_allowlist_precedence: bool,
}

impl WildcardPolicy {
    pub fn new(mode: WildcardMode, respect_allowlist_precedence: bool) -> Self {
        Self {
            mode,
            respect_allowlist_precedence,
        }
    }

    pub fn with_mode(self, mode: WildcardMode) -> Self {
        Self { mode, ..self }
    }

    pub fn with_respect_allowlist_precedence(self, respect: bool) -> Self {
        Self {
            respect_allowlist_precedence: respect,
            ..self
        }
    }

    /// Whether a wildcard pattern should also govern its root domain.
    pub fn wildcard_should_match_root(&self, wildcard_domain: &str) -> bool {
        if !wildcard_domain.starts_with(WILDCARD_PREFIX) {
            return false;
        }
        match self.mode {
            WildcardMode::SubdomainsOnly => false,
            WildcardMode::IncludeRoot | WildcardMode::Smart => true,
        }
    }
}

impl Default for WildcardPolicy {
    fn default() -> Self {
        Self {
            mode: WildcardMode::SubdomainsOnly,
            respect_allowlist_precedence: true,
        }
    }
}

fn default_true() -> bool {
    true
}
