//! Data Transfer Objects for payment HTTP endpoints.
//!
//! These types define the JSON request/response structure for the REST API.
//! They are separate from domain types to allow API evolution without
//! affecting the domain model.

use serde::{Deserialize, Serialize};

use crate::domain::payment::{PaymentOutcome, PaymentRecord, PaymentStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to authorize a payment.
///
/// `idempotency_key` may instead be sent as the `Idempotency-Key` header.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizePaymentRequest {
    pub order_id: String,
    #[serde(default)]
    pub idempotency_key: Option<String>,
    pub amount: i64,
}

/// Query string for listing payments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPaymentsParams {
    pub order_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Result of an authorize call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizePaymentResponse {
    pub payment_id: String,
    pub status: PaymentStatus,
    pub message: String,
}

impl From<PaymentOutcome> for AuthorizePaymentResponse {
    fn from(outcome: PaymentOutcome) -> Self {
        Self {
            payment_id: outcome.payment_id.to_string(),
            status: outcome.status,
            message: outcome.message,
        }
    }
}

/// Stored payment as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentView {
    pub id: String,
    pub order_id: String,
    pub idempotency_key: String,
    pub amount: i64,
    pub status: PaymentStatus,
    pub attempts: i32,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub last_error: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PaymentRecord> for PaymentView {
    fn from(record: PaymentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            order_id: record.order_id.as_str().to_string(),
            idempotency_key: record.idempotency_key.as_str().to_string(),
            amount: record.amount,
            status: record.status,
            attempts: record.attempts,
            last_error: record.last_error,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// Payments for one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentView>,
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{IdempotencyKey, OrderId};

    fn record() -> PaymentRecord {
        PaymentRecord::pending(
            OrderId::new("order-1").unwrap(),
            IdempotencyKey::new("evt-abc").unwrap(),
            500,
        )
    }

    #[test]
    fn authorize_request_accepts_missing_key() {
        let req: AuthorizePaymentRequest =
            serde_json::from_str(r#"{"order_id":"order-1","amount":500}"#).unwrap();
        assert!(req.idempotency_key.is_none());
        assert_eq!(req.amount, 500);
    }

    #[test]
    fn authorize_response_uses_status_names() {
        let mut r = record();
        r.apply_status(PaymentStatus::Authorized, "").unwrap();
        let response = AuthorizePaymentResponse::from(PaymentOutcome::from_record(&r));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["payment_id"], r.id.to_string());
        assert_eq!(json["status"], "Authorized");
        assert_eq!(json["message"], "AUTHORIZED");
    }

    #[test]
    fn payment_view_omits_empty_last_error() {
        let json = serde_json::to_string(&PaymentView::from(record())).unwrap();
        assert!(!json.contains("last_error"));
        assert!(json.contains("\"idempotency_key\":\"evt-abc\""));
    }

    #[test]
    fn error_response_serializes_without_details_when_none() {
        let response = ErrorResponse::new("PAYMENT_NOT_FOUND", "Not found");
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("details"));
    }

    #[test]
    fn health_reports_package_identity() {
        let health = HealthResponse::healthy();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "payment-authorization");
    }
}
