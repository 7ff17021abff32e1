//! PaymentRecord - the durable entity behind one idempotency key.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    IdempotencyKey, OrderId, PaymentId, StateMachine, Timestamp, ValidationError,
};

use super::{PaymentEvent, PaymentStatus};

/// A payment authorization attempt.
///
/// `id`, `order_id`, `idempotency_key` and `amount` never change after
/// creation. Only `status`, `attempts`, `last_error` and `updated_at` are
/// written by status updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub idempotency_key: IdempotencyKey,
    /// Minor currency units.
    pub amount: i64,
    pub status: PaymentStatus,
    /// Number of failure reasons recorded against this payment.
    pub attempts: i32,
    /// Most recent failure reason; empty when none.
    pub last_error: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PaymentRecord {
    /// Creates a fresh `Pending` record with a new identifier.
    pub fn pending(order_id: OrderId, idempotency_key: IdempotencyKey, amount: i64) -> Self {
        let now = Timestamp::now();
        Self {
            id: PaymentId::new(),
            order_id,
            idempotency_key,
            amount,
            status: PaymentStatus::Pending,
            attempts: 0,
            last_error: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the record describes the same logical payment.
    pub fn matches(&self, order_id: &OrderId, amount: i64) -> bool {
        &self.order_id == order_id && self.amount == amount
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Applies a status transition in place.
    ///
    /// A non-empty `failure_reason` is stored in `last_error` and bumps
    /// `attempts`; an empty one clears `last_error`.
    pub fn apply_status(
        &mut self,
        status: PaymentStatus,
        failure_reason: &str,
    ) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(status)?;
        if failure_reason.is_empty() {
            self.last_error.clear();
        } else {
            self.last_error = failure_reason.to_string();
            self.attempts += 1;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Builds the downstream event describing this record's current state.
    pub fn to_event(&self) -> PaymentEvent {
        PaymentEvent {
            payment_id: self.id,
            order_id: self.order_id.clone(),
            idempotency_key: self.idempotency_key.clone(),
            amount: self.amount,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PaymentRecord {
        PaymentRecord::pending(
            OrderId::new("order-1").unwrap(),
            IdempotencyKey::new("evt-abc").unwrap(),
            500,
        )
    }

    #[test]
    fn new_record_is_pending_without_errors() {
        let r = record();
        assert_eq!(r.status, PaymentStatus::Pending);
        assert_eq!(r.attempts, 0);
        assert!(r.last_error.is_empty());
        assert!(!r.is_terminal());
    }

    #[test]
    fn matches_compares_order_and_amount() {
        let r = record();
        assert!(r.matches(&OrderId::new("order-1").unwrap(), 500));
        assert!(!r.matches(&OrderId::new("order-2").unwrap(), 500));
        assert!(!r.matches(&OrderId::new("order-1").unwrap(), 501));
    }

    #[test]
    fn authorize_clears_error_and_keeps_attempts() {
        let mut r = record();
        r.apply_status(PaymentStatus::Authorized, "").unwrap();
        assert_eq!(r.status, PaymentStatus::Authorized);
        assert_eq!(r.attempts, 0);
        assert!(r.last_error.is_empty());
    }

    #[test]
    fn decline_with_reason_records_failure() {
        let mut r = record();
        r.apply_status(PaymentStatus::Declined, "insufficient funds")
            .unwrap();
        assert_eq!(r.status, PaymentStatus::Declined);
        assert_eq!(r.attempts, 1);
        assert_eq!(r.last_error, "insufficient funds");
    }

    #[test]
    fn terminal_record_rejects_further_updates() {
        let mut r = record();
        r.apply_status(PaymentStatus::Declined, "context canceled")
            .unwrap();
        let before = r.clone();
        assert!(r.apply_status(PaymentStatus::Authorized, "").is_err());
        assert_eq!(r, before);
    }

    #[test]
    fn event_mirrors_record_fields() {
        let r = record();
        let event = r.to_event();
        assert_eq!(event.payment_id, r.id);
        assert_eq!(event.order_id, r.order_id);
        assert_eq!(event.idempotency_key, r.idempotency_key);
        assert_eq!(event.amount, 500);
        assert_eq!(event.status, PaymentStatus::Pending);
    }
}
