//! Payment module - the authorization state machine and its records.
//!
//! - `PaymentStatus` - Pending → Authorized | Declined
//! - `PaymentRecord` - durable entity, one per idempotency key
//! - `PaymentEvent` - published on transition into `Authorized`
//! - `PaymentOutcome` - what a caller is told
//! - `PaymentError` - use-case error taxonomy

mod errors;
mod events;
mod outcome;
mod record;
mod status;

pub use errors::PaymentError;
pub use events::PaymentEvent;
pub use outcome::PaymentOutcome;
pub use record::PaymentRecord;
pub use status::PaymentStatus;
