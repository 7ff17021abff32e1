//! Service configuration
//!
//! Every setting comes from `PAYMENT_AUTH`-prefixed environment variables
//! (optionally seeded from a `.env` file). Nested keys are joined with `__`,
//! so `PAYMENT_AUTH__GATEWAY__MODE=decline` sets `gateway.mode`.
//!
//! Only `database.url` and `messaging.redis_url` are required; every other
//! value has a default suitable for local development.
//!
//! ```no_run
//! use payment_authorization::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration");
//! config.validate().expect("valid configuration");
//! ```

mod database;
mod error;
mod gateway;
mod messaging;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use gateway::{GatewayConfig, GatewayMode};
pub use messaging::MessagingConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root configuration, one field per section.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, request deadline)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection and query timeout)
    pub database: DatabaseConfig,

    /// Messaging configuration (Redis stream for payment events)
    pub messaging: MessagingConfig,

    /// Stub gateway behaviour
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl AppConfig {
    /// Read `.env` (if any) and the process environment into typed sections.
    ///
    /// Fails with `ConfigError::LoadError` when a required key is absent or a
    /// value does not parse.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAYMENT_AUTH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// First failing section wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.messaging.validate()?;
        self.gateway.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
