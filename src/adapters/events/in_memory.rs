//! In-memory event bus implementation for testing.
//!
//! Captures every published message so tests can assert on exactly what
//! left the service. Failures can be injected to exercise the publish-error
//! path of the authorize flow.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::PaymentEvent;
use crate::ports::{EventPublisher, RequestContext};

/// A message as handed to the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub key: String,
    pub payload: String,
}

#[derive(Debug, Default)]
struct BusState {
    published: Vec<PublishedMessage>,
    failure: Option<String>,
}

/// In-memory event bus for testing.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.publish(&ctx, "payment-id", "{...}").await?;
/// assert_eq!(bus.event_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventBus {
    state: Arc<Mutex<BusState>>,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bus that rejects every publish with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let bus = Self::new();
        bus.set_failure(Some(message.into()));
        bus
    }

    /// Switches failure injection on (`Some`) or off (`None`).
    pub fn set_failure(&self, failure: Option<String>) {
        self.lock().failure = failure;
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // === Test Helpers ===

    /// Returns all published messages in publish order.
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.lock().published.clone()
    }

    /// Returns count of published messages.
    pub fn event_count(&self) -> usize {
        self.lock().published.len()
    }

    /// Returns messages published under `key`.
    pub fn messages_for_key(&self, key: &str) -> Vec<PublishedMessage> {
        self.published()
            .into_iter()
            .filter(|m| m.key == key)
            .collect()
    }

    /// Decodes every payload that parses as a [`PaymentEvent`].
    pub fn decoded_events(&self) -> Vec<PaymentEvent> {
        self.published()
            .iter()
            .filter_map(|m| serde_json::from_str(&m.payload).ok())
            .collect()
    }

    /// Clears all published messages (for test isolation).
    pub fn clear(&self) {
        self.lock().published.clear();
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(
        &self,
        ctx: &RequestContext,
        key: &str,
        payload: &str,
    ) -> Result<(), DomainError> {
        if let Some(err) = ctx.err() {
            return Err(err.into());
        }

        let mut state = self.lock();
        if let Some(message) = &state.failure {
            return Err(DomainError::new(ErrorCode::PublishError, message.clone()));
        }
        state.published.push(PublishedMessage {
            key: key.to_string(),
            payload: payload.to_string(),
        });
        Ok(())
    }
}
