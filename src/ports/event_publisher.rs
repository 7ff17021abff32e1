//! EventPublisher port - Interface for publishing payment events.
//!
//! This port defines how the application hands events to the messaging
//! substrate without knowing about the underlying transport (in-memory,
//! Redis streams, a log broker).

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

use super::RequestContext;

/// Port for publishing serialized domain events.
///
/// Implementations must ensure:
/// - Delivery is at-least-once; consumers deduplicate by payment id
/// - Messages sharing a `key` keep their relative order where the substrate
///   partitions by key
/// - The call returns promptly once `ctx` is canceled
/// - Errors are propagated to the caller
///
/// # Example
///
/// ```ignore
/// let event = record.to_event();
/// publisher
///     .publish(&ctx, &event.partition_key(), &event.to_payload()?)
///     .await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one message keyed for partitioning.
    async fn publish(
        &self,
        ctx: &RequestContext,
        key: &str,
        payload: &str,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventPublisher) {}

    // Compile-time check that trait is Send + Sync
    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn event_publisher_is_send_sync() {
        // This will fail to compile if EventPublisher is not Send + Sync
        #[allow(dead_code)]
        fn check<T: EventPublisher>() {
            assert_send_sync::<T>();
        }
    }
}
