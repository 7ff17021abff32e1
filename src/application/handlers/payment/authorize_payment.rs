//! AuthorizePaymentHandler - Command handler for idempotent payment authorization.
//!
//! Flow for one call:
//! 1. Validate the command (no storage access on failure)
//! 2. Create-or-get the record for the idempotency key
//! 3. Reject a key reused for a different order or amount
//! 4. Return terminal records as they are
//! 5. Ask the gateway, persist the decision, then publish on authorization
//!
//! The status write always happens before the publish. A publish failure is
//! reported but never rolls the authorization back.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::{IdempotencyKey, OrderId, ValidationError};
use crate::domain::payment::{PaymentError, PaymentOutcome, PaymentRecord, PaymentStatus};
use crate::ports::{
    ContextError, CreateOrGet, EventPublisher, PaymentGateway, PaymentRepository,
    RequestContext, StatusUpdate,
};

/// Reason stored when a gateway declines without saying why.
pub const DEFAULT_DECLINE_REASON: &str = "declined by gateway";

const DEFAULT_CANCEL_WRITE_TIMEOUT: Duration = Duration::from_secs(2);

/// Command to authorize a payment.
#[derive(Debug, Clone)]
pub struct AuthorizePaymentCommand {
    pub order_id: String,
    pub idempotency_key: String,
    /// Minor currency units; must be positive.
    pub amount: i64,
}

/// Handler for authorizing payments exactly once per idempotency key.
///
/// Holds no per-request state. Mutual exclusion for a key is left entirely
/// to the repository's create-or-get and conditional update.
pub struct AuthorizePaymentHandler {
    repository: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    event_publisher: Arc<dyn EventPublisher>,
    cancel_write_timeout: Duration,
}

impl AuthorizePaymentHandler {
    pub fn new(
        repository: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            gateway,
            event_publisher,
            cancel_write_timeout: DEFAULT_CANCEL_WRITE_TIMEOUT,
        }
    }

    /// Bound on persisting the decline once the caller's context has ended.
    pub fn with_cancel_write_timeout(mut self, timeout: Duration) -> Self {
        self.cancel_write_timeout = timeout;
        self
    }

    pub async fn handle(
        &self,
        ctx: &RequestContext,
        cmd: AuthorizePaymentCommand,
    ) -> Result<PaymentOutcome, PaymentError> {
        // 1. Validate before touching storage
        if cmd.amount <= 0 {
            return Err(ValidationError::not_positive("amount", cmd.amount).into());
        }
        let idempotency_key = IdempotencyKey::new(cmd.idempotency_key)?;
        let order_id = OrderId::new(cmd.order_id)?;
        let amount = cmd.amount;

        // 2. Single source of truth for "did this key exist"
        let CreateOrGet { record, created } = self
            .repository
            .create_or_get(
                ctx,
                PaymentRecord::pending(order_id.clone(), idempotency_key.clone(), amount),
            )
            .await
            .map_err(|e| {
                if e.is_interruption() {
                    tracing::warn!(idempotency_key = %idempotency_key, error = %e, "create_or_get interrupted");
                    return PaymentError::interrupted("create_or_get", e);
                }
                tracing::error!(idempotency_key = %idempotency_key, error = %e, "create_or_get failed");
                PaymentError::storage("create_or_get", e)
            })?;

        tracing::debug!(
            payment_id = %record.id,
            idempotency_key = %idempotency_key,
            created,
            status = %record.status,
            "Payment record resolved"
        );

        // 3. Same key must describe the same payment
        if !created && !record.matches(&order_id, amount) {
            tracing::warn!(
                payment_id = %record.id,
                idempotency_key = %idempotency_key,
                "Idempotency key reused with different order or amount"
            );
            return Err(PaymentError::idempotency_conflict(idempotency_key.as_str()));
        }

        // 4. Terminal records are returned untouched
        if record.is_terminal() {
            tracing::info!(
                payment_id = %record.id,
                status = %record.status,
                "Payment already finalized, returning stored outcome"
            );
            return Ok(PaymentOutcome::from_record(&record));
        }

        // 5. Pending: caller still waiting?
        if let Some(reason) = ctx.err() {
            return self.decline_interrupted(&record, reason).await;
        }

        let decision = match self.gateway.decide(ctx, &record).await {
            Ok(decision) => decision,
            Err(e) => {
                if let Some(reason) = ctx.err() {
                    return self.decline_interrupted(&record, reason).await;
                }
                tracing::error!(payment_id = %record.id, error = %e, "Gateway gave no decision");
                return Err(PaymentError::gateway_unavailable(record.id, e));
            }
        };

        let (status, reason) = if decision.approved {
            (PaymentStatus::Authorized, String::new())
        } else if decision.reason.trim().is_empty() {
            (PaymentStatus::Declined, DEFAULT_DECLINE_REASON.to_string())
        } else {
            (PaymentStatus::Declined, decision.reason)
        };

        let stored = match self
            .repository
            .update_status(ctx, record.id, status, &reason)
            .await
            .map_err(|e| {
                if e.is_interruption() {
                    tracing::warn!(payment_id = %record.id, error = %e, "Decision write interrupted, record left pending");
                    return PaymentError::interrupted("update_status", e);
                }
                tracing::error!(payment_id = %record.id, error = %e, "Failed to persist gateway decision");
                PaymentError::storage("update_status", e)
            })? {
            StatusUpdate::Applied(stored) => stored,
            StatusUpdate::Unchanged(current) => {
                // Another caller finalized the record first; it owns the event.
                tracing::debug!(
                    payment_id = %current.id,
                    status = %current.status,
                    "Concurrent caller finalized payment first"
                );
                return Ok(PaymentOutcome::from_record(&current));
            }
        };

        let outcome = PaymentOutcome::from_record(&stored);
        tracing::info!(
            payment_id = %stored.id,
            idempotency_key = %stored.idempotency_key,
            status = %stored.status,
            attempts = stored.attempts,
            "Payment decision persisted"
        );

        if stored.status == PaymentStatus::Authorized {
            self.publish_authorized(ctx, &stored, &outcome).await?;
        }

        Ok(outcome)
    }

    /// Persist a decline after the caller's context ended, then report it.
    ///
    /// The write runs under a fresh context so the record does not stay
    /// pending. A failed write is logged and carried in `persist_error`.
    /// If another caller finalized the record first, its outcome stands and
    /// is returned as a success.
    async fn decline_interrupted(
        &self,
        record: &PaymentRecord,
        reason: ContextError,
    ) -> Result<PaymentOutcome, PaymentError> {
        let reason = reason.to_string();
        let write_ctx = RequestContext::with_timeout(self.cancel_write_timeout);

        match self
            .repository
            .update_status(&write_ctx, record.id, PaymentStatus::Declined, &reason)
            .await
        {
            Ok(StatusUpdate::Applied(stored)) => {
                tracing::warn!(
                    payment_id = %stored.id,
                    reason = %reason,
                    "Payment declined after caller context ended"
                );
                Err(PaymentError::canceled(
                    PaymentOutcome::from_record(&stored),
                    reason,
                    None,
                ))
            }
            Ok(StatusUpdate::Unchanged(current)) => {
                tracing::debug!(
                    payment_id = %current.id,
                    status = %current.status,
                    "Caller context ended but payment was already finalized"
                );
                Ok(PaymentOutcome::from_record(&current))
            }
            Err(e) => {
                tracing::error!(
                    payment_id = %record.id,
                    reason = %reason,
                    error = %e,
                    "Failed to persist decline for interrupted payment"
                );
                Err(PaymentError::canceled(
                    PaymentOutcome::declined(record.id, &reason),
                    reason,
                    Some(e.to_string()),
                ))
            }
        }
    }

    async fn publish_authorized(
        &self,
        ctx: &RequestContext,
        record: &PaymentRecord,
        outcome: &PaymentOutcome,
    ) -> Result<(), PaymentError> {
        let event = record.to_event();
        let payload = event
            .to_payload()
            .map_err(|e| PaymentError::publish_failed(outcome.clone(), e))?;

        self.event_publisher
            .publish(ctx, &event.partition_key(), &payload)
            .await
            .map_err(|e| {
                tracing::error!(
                    payment_id = %record.id,
                    error = %e,
                    "Authorized payment event not published"
                );
                PaymentError::publish_failed(outcome.clone(), e)
            })?;

        tracing::debug!(payment_id = %record.id, "Payment event published");
        Ok(())
    }
}
