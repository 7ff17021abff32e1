//! Messaging configuration (Redis Streams event substrate)

use serde::Deserialize;

use super::error::ValidationError;

/// Messaging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Redis connection URL
    pub redis_url: String,

    /// Stream that receives payment events
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Approximate stream length cap; 0 disables trimming
    #[serde(default = "default_max_stream_len")]
    pub max_stream_len: usize,
}

impl MessagingConfig {
    /// Validate messaging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.redis_url.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS_URL"));
        }
        if !self.redis_url.starts_with("redis://") && !self.redis_url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        Ok(())
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            redis_url: String::new(),
            topic: default_topic(),
            max_stream_len: default_max_stream_len(),
        }
    }
}

fn default_topic() -> String {
    "payments.authorized".to_string()
}

fn default_max_stream_len() -> usize {
    100_000
}
