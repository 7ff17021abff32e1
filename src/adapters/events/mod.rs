//! Event bus adapters.
//!
//! Adapters implement the event publishing port for different environments:
//!
//! - `InMemoryEventBus` - In-process capture bus for testing
//! - `RedisStreamPublisher` - Redis Streams appender for deployments

mod in_memory;
mod redis_stream;

pub use in_memory::{InMemoryEventBus, PublishedMessage};
pub use redis_stream::RedisStreamPublisher;
