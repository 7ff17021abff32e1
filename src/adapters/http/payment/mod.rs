//! HTTP adapter for payment endpoints.
//!
//! Exposes the payment engine via REST API:
//! - `POST /api/payments/authorize` - Authorize a payment idempotently
//! - `GET /api/payments/:id` - Get a stored payment
//! - `GET /api/payments?order_id=...` - List payments for an order
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{PaymentApiError, PaymentAppState, IDEMPOTENCY_KEY_HEADER};
pub use routes::{payment_router, payment_routes};
