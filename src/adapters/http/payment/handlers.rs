//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.
//! Each request gets its own `RequestContext` bounded by the configured request
//! timeout and canceled when the client goes away.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::payment::{
    AuthorizePaymentCommand, AuthorizePaymentHandler, GetPaymentHandler, GetPaymentQuery,
    ListOrderPaymentsHandler, ListOrderPaymentsQuery,
};
use crate::domain::foundation::PaymentId;
use crate::domain::payment::PaymentError;
use crate::ports::{EventPublisher, PaymentGateway, PaymentRepository, RequestContext};

use super::dto::{
    AuthorizePaymentRequest, AuthorizePaymentResponse, ErrorResponse, HealthResponse,
    ListPaymentsParams, PaymentListResponse, PaymentView,
};

/// Header carrying the idempotency key when the body omits it.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct PaymentAppState {
    pub repository: Arc<dyn PaymentRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub event_publisher: Arc<dyn EventPublisher>,
    /// Deadline applied to each request's context.
    pub request_timeout: Duration,
    /// Bound on the decline write after a request is interrupted.
    pub cancel_write_timeout: Duration,
}

impl PaymentAppState {
    pub fn new(
        repository: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            gateway,
            event_publisher,
            request_timeout: Duration::from_secs(30),
            cancel_write_timeout: Duration::from_secs(2),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cancel_write_timeout(mut self, timeout: Duration) -> Self {
        self.cancel_write_timeout = timeout;
        self
    }

    /// Create handlers on demand from the shared state.
    pub fn authorize_payment_handler(&self) -> AuthorizePaymentHandler {
        AuthorizePaymentHandler::new(
            self.repository.clone(),
            self.gateway.clone(),
            self.event_publisher.clone(),
        )
        .with_cancel_write_timeout(self.cancel_write_timeout)
    }

    pub fn get_payment_handler(&self) -> GetPaymentHandler {
        GetPaymentHandler::new(self.repository.clone())
    }

    pub fn list_order_payments_handler(&self) -> ListOrderPaymentsHandler {
        ListOrderPaymentsHandler::new(self.repository.clone())
    }

    fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/authorize - Authorize a payment idempotently
pub async fn authorize_payment(
    State(state): State<PaymentAppState>,
    headers: HeaderMap,
    payload: Result<Json<AuthorizePaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let Json(request) = payload?;
    let idempotency_key = request
        .idempotency_key
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            headers
                .get(IDEMPOTENCY_KEY_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_default();

    let cmd = AuthorizePaymentCommand {
        order_id: request.order_id,
        idempotency_key,
        amount: request.amount,
    };

    let ctx = state.request_context();
    // Dropping this handler's future (client disconnect) cancels `ctx`; the
    // spawned task keeps running so it can record the decline.
    let guard = ctx.drop_guard();
    let handler = state.authorize_payment_handler();
    let task = tokio::spawn(async move { handler.handle(&ctx, cmd).await });

    let result = task.await.map_err(|e| {
        tracing::error!(error = %e, "Authorize task failed");
        PaymentApiError::Internal(e.to_string())
    })?;
    drop(guard.disarm());

    let outcome = result?;
    Ok((StatusCode::OK, Json(AuthorizePaymentResponse::from(outcome))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/payments/:id - Get a stored payment
pub async fn get_payment(
    State(state): State<PaymentAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let payment_id: PaymentId = id
        .parse()
        .map_err(|_| PaymentError::invalid_argument("id", "Payment id must be a UUID"))?;

    let ctx = state.request_context();
    let _guard = ctx.drop_guard();

    let record = state
        .get_payment_handler()
        .handle(&ctx, GetPaymentQuery { payment_id })
        .await?
        .ok_or(PaymentApiError::NotFound(payment_id))?;

    Ok(Json(PaymentView::from(record)))
}

/// GET /api/payments?order_id=... - List payments for an order
pub async fn list_payments(
    State(state): State<PaymentAppState>,
    Query(params): Query<ListPaymentsParams>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let order_id = params.order_id.ok_or_else(|| {
        PaymentError::invalid_argument("order_id", "order_id query parameter is required")
    })?;

    let ctx = state.request_context();
    let _guard = ctx.drop_guard();

    let records = state
        .list_order_payments_handler()
        .handle(&ctx, ListOrderPaymentsQuery { order_id })
        .await?;

    Ok(Json(PaymentListResponse {
        payments: records.into_iter().map(PaymentView::from).collect(),
    }))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts payment errors to HTTP responses.
#[derive(Debug)]
pub enum PaymentApiError {
    Payment(PaymentError),
    NotFound(PaymentId),
    Internal(String),
}

impl From<PaymentError> for PaymentApiError {
    fn from(err: PaymentError) -> Self {
        Self::Payment(err)
    }
}

/// Malformed or incomplete bodies are invalid arguments like any other.
impl From<JsonRejection> for PaymentApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Payment(PaymentError::invalid_argument("body", rejection.body_text()))
    }
}

impl PaymentApiError {
    fn status(&self) -> StatusCode {
        match self {
            PaymentApiError::Payment(err) => match err {
                PaymentError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
                PaymentError::IdempotencyConflict { .. } => StatusCode::CONFLICT,
                PaymentError::StorageFailure { .. } | PaymentError::PublishFailure { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                PaymentError::GatewayUnavailable { .. } => StatusCode::BAD_GATEWAY,
                PaymentError::Canceled { .. } | PaymentError::Interrupted { .. } => {
                    StatusCode::REQUEST_TIMEOUT
                }
            },
            PaymentApiError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            PaymentApiError::Payment(err) => {
                let mut details = serde_json::Map::new();
                details.insert("retryable".into(), err.is_retryable().into());
                if let Some(outcome) = err.outcome() {
                    details.insert("payment_id".into(), outcome.payment_id.to_string().into());
                    details.insert("status".into(), serde_json::json!(outcome.status));
                    details.insert("outcome_message".into(), outcome.message.clone().into());
                }
                match err {
                    PaymentError::InvalidArgument { field, .. } => {
                        details.insert("field".into(), field.clone().into());
                    }
                    PaymentError::Canceled {
                        persist_error: Some(persist_error),
                        ..
                    } => {
                        details.insert("persist_error".into(), persist_error.clone().into());
                    }
                    PaymentError::GatewayUnavailable { payment_id, .. } => {
                        details.insert("payment_id".into(), payment_id.to_string().into());
                    }
                    PaymentError::Interrupted { step, .. } => {
                        details.insert("step".into(), (*step).into());
                    }
                    _ => {}
                }
                ErrorResponse::with_details(err.code(), err.to_string(), details.into())
            }
            PaymentApiError::NotFound(id) => {
                ErrorResponse::new("PAYMENT_NOT_FOUND", format!("Payment {} not found", id))
            }
            PaymentApiError::Internal(_) => {
                ErrorResponse::new("INTERNAL_ERROR", "Internal server error")
            }
        }
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self.body())).into_response()
    }
}
