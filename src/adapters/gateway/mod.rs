//! Gateway adapters - implementations of the PaymentGateway port.
//!
//! - `StubGateway` - Fixed-decision gateway with simulated latency

mod stub_gateway;

pub use stub_gateway::{StubBehavior, StubGateway};
