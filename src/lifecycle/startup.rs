//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Open the product store (connect and ping for MongoDB)
//! - Start the metrics exporter when enabled
//! - Bind the listener last, so traffic only arrives once the store is ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::io;
use std::net::{AddrParseError, SocketAddr};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, ServiceConfig};
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::store::{self, StoreError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open product store: {0}")]
    Store(#[from] StoreError),

    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },
}

/// Initialize every subsystem and return a bound listener with its server.
pub async fn start(config: ServiceConfig) -> Result<(TcpListener, HttpServer), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        backend = ?config.database.backend,
        database = %config.database.name,
        "Opening product store"
    );
    let store = store::open(&config.database).await?;

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let address = config.listener.bind_address.clone();
    let bind_error = |source: io::Error| StartupError::Bind {
        address: address.clone(),
        source,
    };
    let listener = TcpListener::bind(&address).await.map_err(bind_error)?;
    let local_addr = listener.local_addr().map_err(bind_error)?;

    tracing::info!(address = %local_addr, "Server is running on http://{}", local_addr);

    Ok((listener, HttpServer::new(config, store)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;

    fn memory_config(bind_address: &str) -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = bind_address.to_string();
        config.database.backend = StoreBackend::Memory;
        config
    }

    #[tokio::test]
    async fn test_start_with_memory_store() {
        let (listener, server) = start(memory_config("127.0.0.1:0")).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
        assert_eq!(server.config().database.backend, StoreBackend::Memory);
    }

    #[tokio::test]
    async fn test_start_with_metrics_exporter() {
        let mut config = memory_config("127.0.0.1:0");
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "127.0.0.1:0".to_string();

        let (_listener, server) = start(config).await.unwrap();
        assert!(server.config().observability.metrics_enabled);
    }

    #[tokio::test]
    async fn test_unparsable_metrics_address_is_rejected() {
        let mut config = memory_config("127.0.0.1:0");
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".to_string();

        let err = start(config).await.unwrap_err();
        assert!(matches!(err, StartupError::Config(_)));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let err = start(memory_config("not-an-address")).await.unwrap_err();
        assert!(matches!(err, StartupError::Config(_)));
    }

    #[tokio::test]
    async fn test_bind_conflict_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        let err = start(memory_config(&addr)).await.unwrap_err();
        assert!(matches!(err, StartupError::Bind { ref address, .. } if *address == addr));
    }
}
