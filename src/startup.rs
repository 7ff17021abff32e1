//! Application startup and lifecycle management.
//!
//! Wires the PostgreSQL repository, Redis stream publisher and stub gateway
//! into the HTTP router and serves it until a shutdown signal arrives.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::adapters::events::RedisStreamPublisher;
use crate::adapters::gateway::StubGateway;
use crate::adapters::http::{payment_router, PaymentAppState};
use crate::adapters::postgres::{connect_pool, run_migrations, PostgresPaymentRepository};
use crate::config::{AppConfig, ValidationError};
use crate::domain::foundation::DomainError;

/// Errors that stop the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Event stream connection failed: {0}")]
    Messaging(DomainError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application container for managing server lifecycle.
pub struct Application {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: PaymentAppState,
}

impl Application {
    /// Connect adapters and bind the listener.
    pub async fn build(config: AppConfig) -> Result<Self, StartupError> {
        let addr = config.server.socket_addr()?;

        let pool = connect_pool(&config.database).await?;
        if config.database.run_migrations {
            run_migrations(&pool).await?;
        }
        let repository =
            PostgresPaymentRepository::new(pool, config.database.query_timeout());

        let publisher = RedisStreamPublisher::connect(
            &config.messaging.redis_url,
            config.messaging.topic.clone(),
            config.messaging.max_stream_len,
        )
        .await
        .map_err(StartupError::Messaging)?;
        tracing::info!(topic = %publisher.topic(), "Connected to event stream");

        let gateway = StubGateway::from_config(&config.gateway);
        tracing::info!(
            mode = ?config.gateway.mode,
            latency_ms = config.gateway.latency_ms,
            "Using stub payment gateway"
        );

        let state = PaymentAppState::new(
            Arc::new(repository),
            Arc::new(gateway),
            Arc::new(publisher),
        )
        .with_request_timeout(config.server.request_timeout())
        .with_cancel_write_timeout(config.gateway.cancel_write_timeout());

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            e
        })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
            state,
        })
    }

    /// Port actually bound (useful when configured with port 0).
    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> Result<(), StartupError> {
        let app = payment_router(self.state).layer(TraceLayer::new_for_http());

        tracing::info!(addr = %self.local_addr, "Payment authorization service listening");

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
