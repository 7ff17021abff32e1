//! Payment-specific error types.
//!
//! Errors surfaced by the authorize use case, typed so the transport layer
//! can map them without inspecting messages.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status | Retry |
//! |-------|-------------|-------|
//! | InvalidArgument | 400 | never |
//! | IdempotencyConflict | 409 | never |
//! | StorageFailure | 500 | safe with same key |
//! | PublishFailure | 500 | safe, short-circuits on terminal status |
//! | GatewayUnavailable | 502 | safe with same key |
//! | Interrupted | 408 | safe with same key, nothing was decided |
//! | Canceled | 408 | new key required, payment is declined |

use thiserror::Error;

use crate::domain::foundation::{DomainError, PaymentId, ValidationError};

use super::PaymentOutcome;

/// Errors from authorizing a payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// Request failed validation; nothing was stored.
    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument { field: String, message: String },

    /// The idempotency key belongs to a payment with a different order or amount.
    #[error("Idempotency key '{key}' was already used for a different payment")]
    IdempotencyConflict { key: String },

    /// A storage call failed. `step` names which one.
    #[error("Storage failure during {step}: {message}")]
    StorageFailure { step: &'static str, message: String },

    /// Authorization was committed but the event could not be published.
    #[error("Payment {} authorized but event publish failed: {message}", .outcome.payment_id)]
    PublishFailure {
        outcome: PaymentOutcome,
        message: String,
    },

    /// The caller's context ended before a gateway decision.
    ///
    /// `persist_error` is set when the decline itself could not be stored.
    #[error("Payment {} canceled: {reason}", .outcome.payment_id)]
    Canceled {
        outcome: PaymentOutcome,
        reason: String,
        persist_error: Option<String>,
    },

    /// The gateway could not produce a decision; the record is still pending.
    #[error("Gateway unavailable for payment {payment_id}: {message}")]
    GatewayUnavailable {
        payment_id: PaymentId,
        message: String,
    },

    /// The caller's context ended inside a storage call, before any decision
    /// was persisted. The record is absent or still pending.
    #[error("Interrupted during {step}: {reason}")]
    Interrupted { step: &'static str, reason: String },
}

impl PaymentError {
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn idempotency_conflict(key: impl Into<String>) -> Self {
        PaymentError::IdempotencyConflict { key: key.into() }
    }

    pub fn storage(step: &'static str, err: DomainError) -> Self {
        PaymentError::StorageFailure {
            step,
            message: err.to_string(),
        }
    }

    pub fn publish_failed(outcome: PaymentOutcome, err: DomainError) -> Self {
        PaymentError::PublishFailure {
            outcome,
            message: err.to_string(),
        }
    }

    pub fn canceled(
        outcome: PaymentOutcome,
        reason: impl Into<String>,
        persist_error: Option<String>,
    ) -> Self {
        PaymentError::Canceled {
            outcome,
            reason: reason.into(),
            persist_error,
        }
    }

    pub fn gateway_unavailable(payment_id: PaymentId, err: DomainError) -> Self {
        PaymentError::GatewayUnavailable {
            payment_id,
            message: err.to_string(),
        }
    }

    pub fn interrupted(step: &'static str, err: DomainError) -> Self {
        PaymentError::Interrupted {
            step,
            reason: err.message,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            PaymentError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            PaymentError::IdempotencyConflict { .. } => "IDEMPOTENCY_CONFLICT",
            PaymentError::StorageFailure { .. } => "STORAGE_FAILURE",
            PaymentError::PublishFailure { .. } => "PUBLISH_FAILURE",
            PaymentError::Canceled { .. } => "CANCELED",
            PaymentError::GatewayUnavailable { .. } => "GATEWAY_UNAVAILABLE",
            PaymentError::Interrupted { .. } => "INTERRUPTED",
        }
    }

    /// True when repeating the same request with the same key is safe and useful.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentError::StorageFailure { .. }
                | PaymentError::PublishFailure { .. }
                | PaymentError::GatewayUnavailable { .. }
                | PaymentError::Interrupted { .. }
        )
    }

    /// Best-known outcome, when the error happened after the record existed.
    pub fn outcome(&self) -> Option<&PaymentOutcome> {
        match self {
            PaymentError::PublishFailure { outcome, .. }
            | PaymentError::Canceled { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

impl From<ValidationError> for PaymentError {
    fn from(err: ValidationError) -> Self {
        PaymentError::invalid_argument(err.field().to_string(), err.to_string())
    }
}
