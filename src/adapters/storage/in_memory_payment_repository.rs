//! In-Memory Payment Repository Adapter
//!
//! Stores payment records in process memory. Useful for tests and local
//! development. A single lock guards both the records and the idempotency
//! key index, which makes `create_or_get` atomic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, IdempotencyKey, OrderId, PaymentId};
use crate::domain::payment::{PaymentRecord, PaymentStatus};
use crate::ports::{CreateOrGet, PaymentRepository, RequestContext, StatusUpdate};

#[derive(Debug, Default)]
struct Tables {
    records: HashMap<PaymentId, PaymentRecord>,
    by_key: HashMap<IdempotencyKey, PaymentId>,
}

/// In-memory storage for payment records
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentRepository {
    tables: Arc<RwLock<Tables>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryPaymentRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.tables.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of every stored record
    pub async fn all(&self) -> Vec<PaymentRecord> {
        self.tables.read().await.records.values().cloned().collect()
    }

    /// Inserts plus applied status updates since creation
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create_or_get(
        &self,
        ctx: &RequestContext,
        record: PaymentRecord,
    ) -> Result<CreateOrGet, DomainError> {
        ctx.run(async {
            let mut tables = self.tables.write().await;
            if let Some(existing_id) = tables.by_key.get(&record.idempotency_key).copied() {
                return match tables.records.get(&existing_id) {
                    Some(existing) => Ok(CreateOrGet::existing(existing.clone())),
                    None => Err(DomainError::new(
                        ErrorCode::InternalError,
                        format!("Key index points at missing payment {}", existing_id),
                    )),
                };
            }

            tables
                .by_key
                .insert(record.idempotency_key.clone(), record.id);
            tables.records.insert(record.id, record.clone());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(CreateOrGet::created(record))
        })
        .await
        .map_err(DomainError::from)?
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

        ctx.run(async {
            let mut tables = self.tables.write().await;
            let record = tables.records.get_mut(&id).ok_or_else(|| {
                DomainError::new(ErrorCode::PaymentNotFound, format!("Payment {} not found", id))
            })?;

            if record.is_terminal() {
                return Ok(StatusUpdate::Unchanged(record.clone()));
            }

            record.apply_status(status, failure_reason).map_err(|e| {
                DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
            })?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(StatusUpdate::Applied(record.clone()))
        })
        .await
        .map_err(DomainError::from)?
    }

    async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: PaymentId,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        ctx.run(async { self.tables.read().await.records.get(&id).cloned() })
            .await
            .map_err(DomainError::from)
    }

    async fn find_by_order_id(
        &self,
        ctx: &RequestContext,
        order_id: &OrderId,
    ) -> Result<Vec<PaymentRecord>, DomainError> {
        ctx.run(async {
            let tables = self.tables.read().await;
            let mut records: Vec<PaymentRecord> = tables
                .records
                .values()
                .filter(|r| &r.order_id == order_id)
                .cloned()
                .collect();
            records.sort_by_key(|r| r.created_at);
            records
        })
        .await
        .map_err(DomainError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(order: &str, key: &str, amount: i64) -> PaymentRecord {
        PaymentRecord::pending(
            OrderId::new(order).unwrap(),
            IdempotencyKey::new(key).unwrap(),
            amount,
        )
    }

    #[tokio::test]
    async fn create_or_get_inserts_first_record() {
        let repo = InMemoryPaymentRepository::new();
        let ctx = RequestContext::background();
        let record = pending("order-1", "key-1", 100);

        let result = repo.create_or_get(&ctx, record.clone()).await.unwrap();

        assert!(result.created);
        assert_eq!(result.record, record);
        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.write_count(), 1);
    }

    #[tokio::test]
    async fn create_or_get_returns_existing_for_same_key() {
        let repo = InMemoryPaymentRepository::new();
        let ctx = RequestContext::background();
        let first = pending("order-1", "key-1", 100);
        repo.create_or_get(&ctx, first.clone()).await.unwrap();

        let second = repo
            .create_or_get(&ctx, pending("order-2", "key-1", 999))
            .await
            .unwrap();

        assert!(!second.created);
        assert_eq!(second.record.id, first.id);
        assert_eq!(second.record.order_id.as_str(), "order-1");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_creates_have_one_winner() {
        let repo = InMemoryPaymentRepository::new();
        let mut tasks = Vec::new();
        for _ in 0..32 {
            let repo = repo.clone();
            tasks.push(tokio::spawn(async move {
                repo.create_or_get(&RequestContext::background(), pending("o", "same", 10))
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        let mut ids = std::collections::HashSet::new();
        for task in tasks {
            let result = task.await.unwrap();
            if result.created {
                winners += 1;
            }
            ids.insert(result.record.id);
        }

        assert_eq!(winners, 1);
        assert_eq!(ids.len(), 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn update_status_applies_once_then_is_unchanged() {
        let repo = InMemoryPaymentRepository::new();
        let ctx = RequestContext::background();
        let record = pending("order-1", "key-1", 100);
        repo.create_or_get(&ctx, record.clone()).await.unwrap();

        let first = repo
            .update_status(&ctx, record.id, PaymentStatus::Declined, "card expired")
            .await
            .unwrap();
        let second = repo
            .update_status(&ctx, record.id, PaymentStatus::Authorized, "")
            .await
            .unwrap();

        assert!(first.was_applied());
        assert_eq!(first.record().attempts, 1);
        assert_eq!(first.record().last_error, "card expired");
        assert!(!second.was_applied());
        assert_eq!(second.record().status, PaymentStatus::Declined);
        assert_eq!(repo.write_count(), 2);
    }

    #[tokio::test]
    async fn update_status_only_touches_target_row() {
        let repo = InMemoryPaymentRepository::new();
        let ctx = RequestContext::background();
        let a = pending("order-a", "key-a", 100);
        let b = pending("order-b", "key-b", 200);
        repo.create_or_get(&ctx, a.clone()).await.unwrap();
        repo.create_or_get(&ctx, b.clone()).await.unwrap();

        repo.update_status(&ctx, a.id, PaymentStatus::Authorized, "")
            .await
            .unwrap();

        let untouched = repo.find_by_id(&ctx, b.id).await.unwrap().unwrap();
        assert_eq!(untouched, b);
    }

    #[tokio::test]
    async fn update_status_unknown_id_is_not_found() {
        let repo = InMemoryPaymentRepository::new();
        let err = repo
            .update_status(
                &RequestContext::background(),
                PaymentId::new(),
                PaymentStatus::Authorized,
                "",
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentNotFound);
    }

    #[tokio::test]
    async fn update_status_rejects_pending_target() {
        let repo = InMemoryPaymentRepository::new();
        let err = repo
            .update_status(
                &RequestContext::background(),
                PaymentId::new(),
                PaymentStatus::Pending,
                "",
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn canceled_context_stores_nothing() {
        let repo = InMemoryPaymentRepository::new();
        let ctx = RequestContext::background();
        ctx.cancel();

        let err = repo
            .create_or_get(&ctx, pending("order-1", "key-1", 100))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Canceled);
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn find_by_order_id_returns_matching_records_in_creation_order() {
        let repo = InMemoryPaymentRepository::new();
        let ctx = RequestContext::background();
        let first = pending("order-1", "key-1", 100);
        let other = pending("order-2", "key-2", 100);
        let second = pending("order-1", "key-3", 300);
        for r in [&first, &other, &second] {
            repo.create_or_get(&ctx, r.clone()).await.unwrap();
        }

        let found = repo
            .find_by_order_id(&ctx, &OrderId::new("order-1").unwrap())
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, first.id);
        assert_eq!(found[1].id, second.id);
    }
}
