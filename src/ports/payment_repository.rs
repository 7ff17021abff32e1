//! PaymentRepository port - durable storage of payment records.
//!
//! The idempotency guarantee of the whole service rests on two properties
//! adapters must provide:
//!
//! - `create_or_get` is a single atomic operation. Two concurrent callers with
//!   the same idempotency key never both observe `created = true`. Enforce it
//!   with a uniqueness constraint plus conflict handling in the store, never
//!   with an exists-then-insert sequence.
//! - `update_status` only moves a record out of `Pending`. A record already in
//!   a terminal state is returned untouched as [`StatusUpdate::Unchanged`].

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId, PaymentId};
use crate::domain::payment::{PaymentRecord, PaymentStatus};

use super::RequestContext;

/// Result of [`PaymentRepository::create_or_get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrGet {
    /// The stored record for the key: the one just inserted, or the existing one.
    pub record: PaymentRecord,
    /// True only for the caller whose insert won.
    pub created: bool,
}

impl CreateOrGet {
    pub fn created(record: PaymentRecord) -> Self {
        Self {
            record,
            created: true,
        }
    }

    pub fn existing(record: PaymentRecord) -> Self {
        Self {
            record,
            created: false,
        }
    }
}

/// Result of a conditional status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The record was pending and now carries the new status.
    Applied(PaymentRecord),
    /// The record had already left `Pending`; nothing was written.
    Unchanged(PaymentRecord),
}

impl StatusUpdate {
    pub fn was_applied(&self) -> bool {
        matches!(self, StatusUpdate::Applied(_))
    }

    pub fn record(&self) -> &PaymentRecord {
        match self {
            StatusUpdate::Applied(record) | StatusUpdate::Unchanged(record) => record,
        }
    }

    pub fn into_record(self) -> PaymentRecord {
        match self {
            StatusUpdate::Applied(record) | StatusUpdate::Unchanged(record) => record,
        }
    }
}

/// Port for payment record persistence.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert `record`, or return the record already stored under its
    /// idempotency key.
    async fn create_or_get(
        &self,
        ctx: &RequestContext,
        record: PaymentRecord,
    ) -> Result<CreateOrGet, DomainError>;

    /// Move the record `id` from `Pending` to `status`.
    ///
    /// A non-empty `failure_reason` is stored as `last_error` and increments
    /// `attempts`; an empty one clears `last_error`. Only the row `id` is
    /// touched. Fails with `PaymentNotFound` when no such row exists and with
    /// `InvalidStateTransition` when `status` is `Pending`.
    async fn update_status(
        &self,
        ctx: &RequestContext,
        id: PaymentId,
        status: PaymentStatus,
        failure_reason: &str,
    ) -> Result<StatusUpdate, DomainError>;

    /// Fetch a record by its system identifier.
    async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: PaymentId,
    ) -> Result<Option<PaymentRecord>, DomainError>;

    /// All records for an order, oldest first.
    async fn find_by_order_id(
        &self,
        ctx: &RequestContext,
        order_id: &OrderId,
    ) -> Result<Vec<PaymentRecord>, DomainError>;
}
