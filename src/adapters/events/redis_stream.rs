//! Redis Streams event publisher for production deployments.
//!
//! Each payment event becomes one stream entry on the configured topic,
//! appended with `XADD`. The entry carries the partition key and the JSON
//! payload as separate fields so consumer groups can route by key.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{EventPublisher, RequestContext};

/// Field name holding the partition key in each stream entry.
pub const KEY_FIELD: &str = "key";
/// Field name holding the JSON payload in each stream entry.
pub const PAYLOAD_FIELD: &str = "payload";

/// Publishes payment events to a Redis stream.
#[derive(Clone)]
pub struct RedisStreamPublisher {
    conn: MultiplexedConnection,
    topic: String,
    max_len: usize,
}

impl RedisStreamPublisher {
    /// Create a publisher over an existing connection.
    pub fn new(conn: MultiplexedConnection, topic: impl Into<String>, max_len: usize) -> Self {
        Self {
            conn,
            topic: topic.into(),
            max_len,
        }
    }

    /// Open a multiplexed connection to `redis_url`.
    pub async fn connect(
        redis_url: &str,
        topic: impl Into<String>,
        max_len: usize,
    ) -> Result<Self, DomainError> {
        let client = redis::Client::open(redis_url).map_err(|e| {
            DomainError::new(
                ErrorCode::PublishError,
                format!("Invalid Redis URL: {}", e),
            )
        })?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::PublishError,
                    format!("Failed to connect to Redis: {}", e),
                )
            })?;
        Ok(Self::new(conn, topic, max_len))
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Builds `XADD <topic> MAXLEN ~ <n> * key <key> payload <payload>`.
///
/// A `max_len` of zero leaves the stream untrimmed.
pub(crate) fn xadd_command(topic: &str, max_len: usize, key: &str, payload: &str) -> redis::Cmd {
    let mut cmd = redis::cmd("XADD");
    cmd.arg(topic);
    if max_len > 0 {
        cmd.arg("MAXLEN").arg("~").arg(max_len);
    }
    cmd.arg("*")
        .arg(KEY_FIELD)
        .arg(key)
        .arg(PAYLOAD_FIELD)
        .arg(payload);
    cmd
}

#[async_trait]
impl EventPublisher for RedisStreamPublisher {
    async fn publish(
        &self,
        ctx: &RequestContext,
        key: &str,
        payload: &str,
    ) -> Result<(), DomainError> {
        let cmd = xadd_command(&self.topic, self.max_len, key, payload);
        let mut conn = self.conn.clone();

        let entry_id: String = ctx
            .run(cmd.query_async(&mut conn))
            .await?
            .map_err(|e: redis::RedisError| {
                DomainError::new(
                    ErrorCode::PublishError,
                    format!("Failed to append to stream {}: {}", self.topic, e),
                )
            })?;

        tracing::debug!(topic = %self.topic, key, entry_id = %entry_id, "Event appended to stream");
        Ok(())
    }
}
