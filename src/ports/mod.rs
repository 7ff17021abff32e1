//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `RequestContext` - Cancellation/deadline signal accepted by every port
//! - `PaymentRepository` - Idempotent create and conditional status update
//! - `EventPublisher` - At-least-once event delivery keyed by payment
//! - `PaymentGateway` - External authorization decision

mod event_publisher;
mod payment_gateway;
mod payment_repository;
mod request_context;

pub use event_publisher::EventPublisher;
pub use payment_gateway::{GatewayDecision, PaymentGateway};
pub use payment_repository::{CreateOrGet, PaymentRepository, StatusUpdate};
pub use request_context::{ContextError, RequestContext};
