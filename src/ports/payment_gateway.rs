//! PaymentGateway port - the external authorization decision.
//!
//! Gateway agnostic: the engine only needs an approve/decline decision and,
//! on decline, a human-readable reason it records as `last_error`.
//!
//! Contract for implementations:
//! - May block for the gateway's decision latency, bounded by `ctx`
//! - Must return promptly with a `Canceled`/`DeadlineExceeded` error when
//!   `ctx` ends
//! - Any other error means "no decision"; the engine leaves the payment
//!   pending so the caller can retry with the same key

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;
use crate::domain::payment::PaymentRecord;

use super::RequestContext;

/// Authorization decision returned by a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayDecision {
    pub approved: bool,
    /// Decline reason; empty on approval.
    pub reason: String,
}

impl GatewayDecision {
    pub fn approve() -> Self {
        Self {
            approved: true,
            reason: String::new(),
        }
    }

    pub fn decline(reason: impl Into<String>) -> Self {
        Self {
            approved: false,
            reason: reason.into(),
        }
    }
}

/// Port for the external payment authorization decision.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Decide whether `record` is authorized.
    async fn decide(
        &self,
        ctx: &RequestContext,
        record: &PaymentRecord,
    ) -> Result<GatewayDecision, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn PaymentGateway) {}

    #[test]
    fn approve_has_empty_reason() {
        let decision = GatewayDecision::approve();
        assert!(decision.approved);
        assert!(decision.reason.is_empty());
    }

    #[test]
    fn decline_keeps_reason() {
        let decision = GatewayDecision::decline("card expired");
        assert!(!decision.approved);
        assert_eq!(decision.reason, "card expired");
    }
}
