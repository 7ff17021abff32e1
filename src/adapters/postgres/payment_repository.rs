//! PostgreSQL implementation of PaymentRepository.
//!
//! Idempotency is enforced by the unique index on `idempotency_key`: inserts
//! use `ON CONFLICT DO NOTHING` and fall back to a fetch, so concurrent
//! callers with the same key always converge on one row. Status updates are
//! conditional on the row still being `pending`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, IdempotencyKey, OrderId, PaymentId, Timestamp,
};
use crate::domain::payment::{PaymentRecord, PaymentStatus};
use crate::ports::{CreateOrGet, PaymentRepository, RequestContext, StatusUpdate};

const PAYMENT_COLUMNS: &str = "id, order_id, idempotency_key, amount, status, attempts, \
                               last_error, created_at, updated_at";

/// PostgreSQL implementation of the PaymentRepository port.
///
/// Every statement is bounded by both the caller's context and
/// `query_timeout`, whichever ends first.
#[derive(Clone)]
pub struct PostgresPaymentRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn timed<T, F>(
        &self,
        ctx: &RequestContext,
        operation: &str,
        fut: F,
    ) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        ctx.bounded(self.query_timeout)
            .run(fut)
            .await?
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to {}: {}", operation, e),
                )
            })
    }

    async fn fetch_by_key(
        &self,
        ctx: &RequestContext,
        key: &IdempotencyKey,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        let sql = format!(
            "SELECT {} FROM payments WHERE idempotency_key = $1",
            PAYMENT_COLUMNS
        );
        let row: Option<PaymentRow> = self
            .timed(
                ctx,
                "fetch payment by idempotency key",
                sqlx::query_as(&sql)
                    .bind(key.as_str())
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(PaymentRecord::try_from).transpose()
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    order_id: String,
    idempotency_key: String,
    amount: i64,
    status: String,
    attempts: i32,
    last_error: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for PaymentRecord {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str, e: String| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid {} in payment {}: {}", what, row.id, e),
            )
        };

        Ok(PaymentRecord {
            id: PaymentId::from_uuid(row.id),
            order_id: OrderId::new(row.order_id.as_str())
                .map_err(|e| corrupt("order_id", e.to_string()))?,
            idempotency_key: IdempotencyKey::new(row.idempotency_key.as_str())
                .map_err(|e| corrupt("idempotency_key", e.to_string()))?,
            amount: row.amount,
            status: row
                .status
                .parse::<PaymentStatus>()
                .map_err(|e| corrupt("status", e.to_string()))?,
            attempts: row.attempts,
            last_error: row.last_error.clone(),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn create_or_get(
        &self,
        ctx: &RequestContext,
        record: PaymentRecord,
    ) -> Result<CreateOrGet, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO payments (
                id, order_id, idempotency_key, amount, status, attempts,
                last_error, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (idempotency_key) DO NOTHING
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        );

        let inserted: Option<PaymentRow> = self
            .timed(
                ctx,
                "insert payment",
                sqlx::query_as(&sql)
                    .bind(record.id.as_uuid())
                    .bind(record.order_id.as_str())
                    .bind(record.idempotency_key.as_str())
                    .bind(record.amount)
                    .bind(record.status.as_str())
                    .bind(record.attempts)
                    .bind(&record.last_error)
                    .bind(record.created_at.as_datetime())
                    .bind(record.updated_at.as_datetime())
                    .fetch_optional(&self.pool),
            )
            .await?;

        if let Some(row) = inserted {
            return Ok(CreateOrGet::created(PaymentRecord::try_from(row)?));
        }

        match self.fetch_by_key(ctx, &record.idempotency_key).await? {
            Some(existing) => Ok(CreateOrGet::existing(existing)),
            None => Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!(
                    "Insert conflicted on key {} but no row was found",
                    record.idempotency_key
                ),
            )),
        }
    }

    async fn update_status(
        &self,
        ctx: &RequestContext,
        id: PaymentId,
        status: PaymentStatus,
        failure_reason: &str,
    ) -> Result<StatusUpdate, DomainError> {
        if status == PaymentStatus::Pending {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Payments cannot be moved back to pending",
            ));
        }

        let sql = format!(
            r#"
            UPDATE payments SET
                status = $2,
                last_error = $3,
                attempts = attempts + CASE WHEN $3 = '' THEN 0 ELSE 1 END,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        );

        let updated: Option<PaymentRow> = self
            .timed(
                ctx,
                "update payment status",
                sqlx::query_as(&sql)
                    .bind(id.as_uuid())
                    .bind(status.as_str())
                    .bind(failure_reason)
                    .fetch_optional(&self.pool),
            )
            .await?;

        if let Some(row) = updated {
            return Ok(StatusUpdate::Applied(PaymentRecord::try_from(row)?));
        }

        match self.find_by_id(ctx, id).await? {
            Some(current) => Ok(StatusUpdate::Unchanged(current)),
            None => Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment {} not found", id),
            )),
        }
    }

    async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: PaymentId,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        let sql = format!("SELECT {} FROM payments WHERE id = $1", PAYMENT_COLUMNS);
        let row: Option<PaymentRow> = self
            .timed(
                ctx,
                "find payment",
                sqlx::query_as(&sql)
                    .bind(id.as_uuid())
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(PaymentRecord::try_from).transpose()
    }

    async fn find_by_order_id(
        &self,
        ctx: &RequestContext,
        order_id: &OrderId,
    ) -> Result<Vec<PaymentRecord>, DomainError> {
        let sql = format!(
            "SELECT {} FROM payments WHERE order_id = $1 ORDER BY created_at ASC",
            PAYMENT_COLUMNS
        );
        let rows: Vec<PaymentRow> = self
            .timed(
                ctx,
                "list payments for order",
                sqlx::query_as(&sql)
                    .bind(order_id.as_str())
                    .fetch_all(&self.pool),
            )
            .await?;

        rows.into_iter().map(PaymentRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> PaymentRow {
        let now = Utc::now();
        PaymentRow {
            id: Uuid::new_v4(),
            order_id: "order-1".to_string(),
            idempotency_key: "evt-abc".to_string(),
            amount: 500,
            status: status.to_string(),
            attempts: 1,
            last_error: "context canceled".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_converts_to_record() {
        let r = row("declined");
        let id = r.id;

        let record = PaymentRecord::try_from(r).unwrap();

        assert_eq!(record.id, PaymentId::from_uuid(id));
        assert_eq!(record.order_id.as_str(), "order-1");
        assert_eq!(record.idempotency_key.as_str(), "evt-abc");
        assert_eq!(record.status, PaymentStatus::Declined);
        assert_eq!(record.attempts, 1);
        assert_eq!(record.last_error, "context canceled");
    }

    #[test]
    fn unknown_status_is_database_error() {
        let err = PaymentRecord::try_from(row("refunded")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("status"));
    }

    #[test]
    fn blank_order_id_is_database_error() {
        let mut r = row("pending");
        r.order_id = String::new();
        let err = PaymentRecord::try_from(r).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("order_id"));
    }

    #[test]
    fn column_list_matches_row_fields() {
        for column in [
            "id",
            "order_id",
            "idempotency_key",
            "amount",
            "status",
            "attempts",
            "last_error",
            "created_at",
            "updated_at",
        ] {
            assert!(PAYMENT_COLUMNS.contains(column), "missing {}", column);
        }
    }
}
