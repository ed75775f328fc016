use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Rule store error: {0}")]
    RuleStoreError(String),

    #[error("Rule store capacity exceeded: {attempted} rules requested, limit is {limit}")]
    RuleStoreCapacityExceeded { attempted: usize, limit: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}
