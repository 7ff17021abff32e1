//! Payment handlers.
//!
//! ## Commands
//! - Authorizing a payment under an idempotency key
//!
//! ## Queries
//! - Get a payment by id
//! - List payments for an order

mod authorize_payment;
mod get_payment;
mod list_order_payments;

// Commands
pub use authorize_payment::{
    AuthorizePaymentCommand, AuthorizePaymentHandler, DEFAULT_DECLINE_REASON,
};

// Queries
pub use get_payment::{GetPaymentHandler, GetPaymentQuery, GetPaymentResult};
pub use list_order_payments::{ListOrderPaymentsHandler, ListOrderPaymentsQuery};
