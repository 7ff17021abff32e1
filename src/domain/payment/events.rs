//! Payment events handed to the event publisher.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, IdempotencyKey, OrderId, PaymentId};

use super::PaymentStatus;

/// Emitted once per transition into a terminal state that downstream
/// consumers care about. Consumers must deduplicate by `payment_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEvent {
    #[serde(rename = "paymentID")]
    pub payment_id: PaymentId,
    #[serde(rename = "orderID")]
    pub order_id: OrderId,
    #[serde(rename = "idempotencyKey")]
    pub idempotency_key: IdempotencyKey,
    pub amount: i64,
    pub status: PaymentStatus,
}

impl PaymentEvent {
    /// Key used to route all events of one payment to the same partition.
    pub fn partition_key(&self) -> String {
        self.payment_id.to_string()
    }

    /// JSON payload as published on the wire.
    pub fn to_payload(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| {
            DomainError::new(
                ErrorCode::SerializationError,
                format!("Failed to encode payment event: {}", e),
            )
        })
    }
}
