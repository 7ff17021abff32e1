//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid query timeout")]
    InvalidQueryTimeout,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Stream topic must not be empty")]
    EmptyTopic,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Gateway latency exceeds maximum allowed (60000 ms)")]
    GatewayLatencyTooLarge,

    #[error("Decline reason must not be empty")]
    EmptyDeclineReason,

    #[error("Invalid cancellation write timeout")]
    InvalidCancelWriteTimeout,
}
