//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the product routes
//! - Wire up middleware (tracing, request ID, body limit, metrics)
//! - Inject the product model into handlers as state
//! - Serve on a listener until shutdown is triggered

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::http::products::{
    create_product, delete_product, list_products, route_not_found, update_product,
};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::products::ProductModel;
use crate::store::ProductStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductModel,
    pub config: Arc<ServiceConfig>,
}

/// HTTP server for the product API.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    config: Arc<ServiceConfig>,
}

impl HttpServer {
    /// Create a new HTTP server over an already opened store.
    pub fn new(config: ServiceConfig, store: Arc<dyn ProductStore>) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            products: ProductModel::new(store),
            config: config.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route("/products/{id}", put(update_product).delete(delete_product))
            .fallback(route_not_found)
            .method_not_allowed_fallback(route_not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size));

        let router = if config.observability.metrics_enabled {
            router.layer(middleware::from_fn(metrics::track_requests))
        } else {
            router
        };

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(set_request_id_layer())
    }

    /// A handle to the router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
