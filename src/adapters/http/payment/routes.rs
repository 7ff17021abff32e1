//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{authorize_payment, get_payment, health, list_payments, PaymentAppState};

/// Create the payment API router.
///
/// # Routes
/// - `POST /authorize` - Authorize a payment under an idempotency key
/// - `GET /:id` - Get a stored payment
/// - `GET /?order_id=...` - List payments for an order
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        .route("/authorize", post(authorize_payment))
        .route("/", get(list_payments))
        .route("/:id", get(get_payment))
}

/// Create the complete service router.
///
/// Mounts payment routes at `/api/payments` and the liveness probe at `/health`.
pub fn payment_router(state: PaymentAppState) -> Router {
    Router::new()
        .nest("/api/payments", payment_routes())
        .route("/health", get(health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::gateway::StubGateway;
    use crate::adapters::storage::InMemoryPaymentRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Harness {
        repo: InMemoryPaymentRepository,
        bus: InMemoryEventBus,
        app: Router,
    }

    fn harness(gateway: StubGateway) -> Harness {
        let repo = InMemoryPaymentRepository::new();
        let bus = InMemoryEventBus::new();
        let state = PaymentAppState::new(
            Arc::new(repo.clone()),
            Arc::new(gateway),
            Arc::new(bus.clone()),
        );
        Harness {
            repo,
            bus,
            app: payment_router(state),
        }
    }

    fn authorize(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/payments/authorize")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn authorize_returns_outcome_and_publishes() {
        let h = harness(StubGateway::approving());

        let response = h
            .app
            .oneshot(authorize(
                r#"{"order_id":"order-1","idempotency_key":"evt-abc","amount":500}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "Authorized");
        assert_eq!(body["message"], "AUTHORIZED");
        assert_eq!(h.bus.event_count(), 1);
        assert_eq!(h.repo.len().await, 1);
    }

    #[tokio::test]
    async fn authorize_reads_key_from_header() {
        let h = harness(StubGateway::approving());

        let request = Request::builder()
            .method("POST")
            .uri("/api/payments/authorize")
            .header("content-type", "application/json")
            .header("Idempotency-Key", "evt-header")
            .body(Body::from(r#"{"order_id":"order-1","amount":500}"#))
            .unwrap();

        let response = h.app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let stored = h.repo.all().await;
        assert_eq!(stored[0].idempotency_key.as_str(), "evt-header");
    }

    #[tokio::test]
    async fn authorize_without_key_is_bad_request() {
        let h = harness(StubGateway::approving());

        let response = h
            .app
            .oneshot(authorize(r#"{"order_id":"order-1","amount":500}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error_code"], "INVALID_ARGUMENT");
        assert!(h.repo.is_empty().await);
    }

    #[tokio::test]
    async fn unreadable_body_is_bad_request_with_error_body() {
        let h = harness(StubGateway::approving());

        for body in [
            r#"{"order_id":"order-1","idempotency_key":"evt-abc"}"#,
            r#"{"order_id":"order-1","idempotency_key":"evt-abc","amount":"lots"}"#,
            "not json",
        ] {
            let response = h.app.clone().oneshot(authorize(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
            let json = json_body(response).await;
            assert_eq!(json["error_code"], "INVALID_ARGUMENT");
            assert_eq!(json["details"]["field"], "body");
            assert_eq!(json["details"]["retryable"], false);
        }
        assert!(h.repo.is_empty().await);
    }

    #[tokio::test]
    async fn reused_key_with_new_amount_conflicts() {
        let h = harness(StubGateway::approving());

        let first = h
            .app
            .clone()
            .oneshot(authorize(
                r#"{"order_id":"order-1","idempotency_key":"evt-abc","amount":500}"#,
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = h
            .app
            .oneshot(authorize(
                r#"{"order_id":"order-1","idempotency_key":"evt-abc","amount":700}"#,
            ))
            .await
            .unwrap();

        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(second).await["error_code"], "IDEMPOTENCY_CONFLICT");
    }

    #[tokio::test]
    async fn gateway_failure_is_bad_gateway() {
        let h = harness(StubGateway::failing("gateway unreachable"));

        let response = h
            .app
            .oneshot(authorize(
                r#"{"order_id":"order-1","idempotency_key":"evt-abc","amount":500}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["details"]["retryable"], true);
    }

    #[tokio::test]
    async fn get_payment_returns_stored_record() {
        let h = harness(StubGateway::declining("insufficient funds"));

        let response = h
            .app
            .clone()
            .oneshot(authorize(
                r#"{"order_id":"order-1","idempotency_key":"evt-abc","amount":500}"#,
            ))
            .await
            .unwrap();
        let id = json_body(response).await["payment_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = h
            .app
            .oneshot(get(&format!("/api/payments/{}", id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], id);
        assert_eq!(body["status"], "Declined");
        assert_eq!(body["last_error"], "insufficient funds");
    }

    #[tokio::test]
    async fn get_unknown_payment_is_not_found() {
        let h = harness(StubGateway::approving());

        let response = h
            .app
            .oneshot(get(&format!(
                "/api/payments/{}",
                crate::domain::foundation::PaymentId::new()
            )))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error_code"], "PAYMENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn get_malformed_id_is_bad_request() {
        let h = harness(StubGateway::approving());

        let response = h.app.oneshot(get("/api/payments/not-a-uuid")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_payments_filters_by_order() {
        let h = harness(StubGateway::approving());

        for (order, key) in [("order-1", "k1"), ("order-1", "k2"), ("order-2", "k3")] {
            let body = format!(
                r#"{{"order_id":"{}","idempotency_key":"{}","amount":100}}"#,
                order, key
            );
            let response = h.app.clone().oneshot(authorize(&body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = h
            .app
            .oneshot(get("/api/payments?order_id=order-1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["payments"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_payments_requires_order_id() {
        let h = harness(StubGateway::approving());

        let response = h.app.oneshot(get("/api/payments")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_is_mounted_at_root() {
        let h = harness(StubGateway::approving());

        let response = h.app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }
}
