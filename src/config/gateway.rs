//! Gateway configuration for the stub authorization gateway

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_LATENCY_MS: u64 = 60_000;

/// How the stub gateway decides
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    #[default]
    Approve,
    Decline,
    Fail,
}

/// Gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub mode: GatewayMode,

    /// Simulated decision latency in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Reason recorded when the gateway declines
    #[serde(default = "default_decline_reason")]
    pub decline_reason: String,

    /// Bound on persisting the decline after the caller's context ends
    #[serde(default = "default_cancel_write_timeout_ms")]
    pub cancel_write_timeout_ms: u64,
}

impl GatewayConfig {
    /// Get latency as Duration
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Get cancellation write timeout as Duration
    pub fn cancel_write_timeout(&self) -> Duration {
        Duration::from_millis(self.cancel_write_timeout_ms)
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.latency_ms > MAX_LATENCY_MS {
            return Err(ValidationError::GatewayLatencyTooLarge);
        }
        if self.decline_reason.trim().is_empty() {
            return Err(ValidationError::EmptyDeclineReason);
        }
        if self.cancel_write_timeout_ms == 0 {
            return Err(ValidationError::InvalidCancelWriteTimeout);
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mode: GatewayMode::default(),
            latency_ms: default_latency_ms(),
            decline_reason: default_decline_reason(),
            cancel_write_timeout_ms: default_cancel_write_timeout_ms(),
        }
    }
}

fn default_latency_ms() -> u64 {
    100
}

fn default_decline_reason() -> String {
    "gateway fail".to_string()
}

fn default_cancel_write_timeout_ms() -> u64 {
    2_000
}
