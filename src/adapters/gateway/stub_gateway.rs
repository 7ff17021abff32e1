//! Stub implementation of PaymentGateway for development and testing.
//!
//! Simulates a gateway round trip with a configurable latency and returns a
//! fixed decision. The latency wait honours the caller's context, so a
//! canceled request comes back with the context's error instead of a
//! decision.
//!
//! # Usage
//!
//! ```ignore
//! use payment_authorization::adapters::gateway::StubGateway;
//!
//! let gateway = StubGateway::approving();
//! let gateway = StubGateway::declining("insufficient funds");
//! ```

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{GatewayConfig, GatewayMode};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::PaymentRecord;
use crate::ports::{GatewayDecision, PaymentGateway, RequestContext};

/// Decision the stub hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubBehavior {
    ApproveAll,
    DeclineAll(String),
    /// Return a gateway error without a decision.
    Fail(String),
}

/// Stub PaymentGateway with a fixed behaviour.
#[derive(Debug, Clone)]
pub struct StubGateway {
    behavior: StubBehavior,
    latency: Duration,
    calls: Arc<AtomicUsize>,
}

impl StubGateway {
    pub fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            latency: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Stub that approves every payment.
    pub fn approving() -> Self {
        Self::new(StubBehavior::ApproveAll)
    }

    /// Stub that declines every payment with `reason`.
    pub fn declining(reason: impl Into<String>) -> Self {
        Self::new(StubBehavior::DeclineAll(reason.into()))
    }

    /// Stub that never reaches a decision.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(StubBehavior::Fail(message.into()))
    }

    /// Build from the `gateway` config section.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let behavior = match config.mode {
            GatewayMode::Approve => StubBehavior::ApproveAll,
            GatewayMode::Decline => StubBehavior::DeclineAll(config.decline_reason.clone()),
            GatewayMode::Fail => StubBehavior::Fail("gateway unreachable".to_string()),
        };
        Self::new(behavior).with_latency(config.latency())
    }

    /// Set the simulated round-trip latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of `decide` calls that reached the stub.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn decide(
        &self,
        ctx: &RequestContext,
        record: &PaymentRecord,
    ) -> Result<GatewayDecision, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.latency.is_zero() {
            if let Some(err) = ctx.err() {
                return Err(err.into());
            }
        } else {
            ctx.run(tokio::time::sleep(self.latency)).await?;
        }

        tracing::debug!(payment_id = %record.id, behavior = ?self.behavior, "Stub gateway decision");

        match &self.behavior {
            StubBehavior::ApproveAll => Ok(GatewayDecision::approve()),
            StubBehavior::DeclineAll(reason) => Ok(GatewayDecision::decline(reason.clone())),
            StubBehavior::Fail(message) => {
                Err(DomainError::new(ErrorCode::GatewayError, message.clone()))
            }
        }
    }
}
