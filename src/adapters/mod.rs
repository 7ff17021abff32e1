//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Event publishers (in-memory, Redis Streams)
//! - `gateway` - Payment gateway stub
//! - `http` - REST API
//! - `postgres` - Durable payment storage
//! - `storage` - In-memory payment storage

pub mod events;
pub mod gateway;
pub mod http;
pub mod postgres;
pub mod storage;

pub use events::{InMemoryEventBus, RedisStreamPublisher};
pub use gateway::StubGateway;
pub use postgres::PostgresPaymentRepository;
pub use storage::InMemoryPaymentRepository;
