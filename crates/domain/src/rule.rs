use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::errors::DomainError;

pub const WILDCARD_PREFIX: &str = "*.";
const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;
const MAX_COMMENT_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Block,
    Allow,
    /// No policy found. Callers defer to the next stage.
    Unknown,
}

impl RuleAction {
    pub fn to_str(&self) -> &'static str {
        match self {
            RuleAction::Block => "block",
            RuleAction::Allow => "allow",
            RuleAction::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "block" | "deny" => Some(RuleAction::Block),
            "allow" => Some(RuleAction::Allow),
            "unknown" => Some(RuleAction::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Exact,
    Wildcard,
}

impl RuleType {
    pub fn to_str(&self) -> &'static str {
        match self {
            RuleType::Exact => "exact",
            RuleType::Wildcard => "wildcard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSource {
    User,
    Manifest,
    Remote,
    System,
    Managed,
}

impl RuleSource {
    pub fn to_str(&self) -> &'static str {
        match self {
            RuleSource::User => "user",
            RuleSource::Manifest => "manifest",
            RuleSource::Remote => "remote",
            RuleSource::System => "system",
            RuleSource::Managed => "managed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(RuleSource::User),
            "manifest" => Some(RuleSource::Manifest),
            "remote" => Some(RuleSource::Remote),
            "system" => Some(RuleSource::System),
            "managed" => Some(RuleSource::Managed),
            _ => None,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, RuleSource::User)
    }
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Lowercases a domain and strips surrounding whitespace and the trailing dot.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Atomic policy statement for a domain or a wildcard pattern.
///
/// Rules are shared as `Arc<Rule>` once stored and never mutated afterwards;
/// the `with_*` builders consume the value and return a new rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub domain: Arc<str>,
    pub rule_type: RuleType,
    pub action: RuleAction,
    pub priority: i64,
    pub source: RuleSource,
    pub comment: Option<Arc<str>>,
    pub custom_message: Option<Arc<str>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auto_generated: bool,
}

impl Rule {
    /// Builds a user rule from a pattern. A `*.` prefix makes it a wildcard.
    pub fn new(pattern: &str, action: RuleAction) -> Result<Self, DomainError> {
        let domain = normalize_domain(pattern);
        let rule_type = if domain.starts_with(WILDCARD_PREFIX) {
            RuleType::Wildcard
        } else {
            RuleType::Exact
        };

        let rule = Self {
            domain: Arc::from(domain),
            rule_type,
            action,
            priority: 0,
            source: RuleSource::User,
            comment: None,
            custom_message: None,
            updated_at: None,
            expires_at: None,
            auto_generated: false,
        };
        rule.validate()?;
        Ok(rule)
    }

    pub fn allow(pattern: &str) -> Result<Self, DomainError> {
        Self::new(pattern, RuleAction::Allow)
    }

    pub fn block(pattern: &str) -> Result<Self, DomainError> {
        Self::new(pattern, RuleAction::Block)
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_source(mut self, source: RuleSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<Arc<str>>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_custom_message(mut self, message: impl Into<Arc<str>>) -> Self {
        self.custom_message = Some(message.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn mark_auto_generated(mut self) -> Self {
        self.auto_generated = true;
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.rule_type == RuleType::Wildcard
    }

    /// The part of a wildcard pattern after `*.`, or `None` for exact rules.
    pub fn wildcard_suffix(&self) -> Option<&str> {
        match self.rule_type {
            RuleType::Wildcard => self.domain.strip_prefix(WILDCARD_PREFIX),
            RuleType::Exact => None,
        }
    }

    /// Label count of the pattern, not counting the `*` of a wildcard.
    pub fn specificity(&self) -> usize {
        let labels = self.domain.split('.').count();
        match self.rule_type {
            RuleType::Wildcard => labels.saturating_sub(1),
            RuleType::Exact => labels,
        }
    }

    /// Plain DNS matching: exact equality, or a strict subdomain for wildcards.
    pub fn matches_domain(&self, domain: &str) -> bool {
        match self.wildcard_suffix() {
            None => self.domain.as_ref() == domain,
            Some(suffix) => domain
                .strip_suffix(suffix)
                .is_some_and(|head| head.len() > 1 && head.ends_with('.')),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_pattern(&self.domain)?;

        let has_prefix = self.domain.starts_with(WILDCARD_PREFIX);
        match (self.rule_type, has_prefix) {
            (RuleType::Wildcard, false) => {
                return Err(DomainError::InvalidRule(format!(
                    "wildcard rule {} must start with '*.'",
                    self.domain
                )));
            }
            (RuleType::Exact, true) => {
                return Err(DomainError::InvalidRule(format!(
                    "exact rule {} must not start with '*.'",
                    self.domain
                )));
            }
            _ => {}
        }

        if let Some(comment) = &self.comment {
            if comment.len() > MAX_COMMENT_LEN {
                return Err(DomainError::InvalidRule(
                    "Comment cannot exceed 500 characters".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Checks a normalized query name. Queries never carry wildcard labels.
pub fn validate_query_domain(domain: &str) -> Result<(), DomainError> {
    if domain.starts_with(WILDCARD_PREFIX) {
        return Err(DomainError::InvalidDomainName(format!(
            "Query name cannot be a wildcard: {}",
            domain
        )));
    }
    validate_pattern(domain)
}

fn validate_pattern(domain: &str) -> Result<(), DomainError> {
    if domain.is_empty() {
        return Err(DomainError::InvalidDomainName(
            "Domain cannot be empty".to_string(),
        ));
    }
    if domain.len() > MAX_DOMAIN_LEN {
        return Err(DomainError::InvalidDomainName(format!(
            "Domain cannot exceed {} characters",
            MAX_DOMAIN_LEN
        )));
    }

    let body = domain.strip_prefix(WILDCARD_PREFIX).unwrap_or(domain);
    for label in body.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "Invalid label in {}",
                domain
            )));
        }
        let valid = label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
        if !valid {
            return Err(DomainError::InvalidDomainName(format!(
                "Domain contains invalid characters: {}",
                domain
            )));
        }
    }

    Ok(())
}
