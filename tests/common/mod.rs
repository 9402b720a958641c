//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use product_api::config::ServiceConfig;
use product_api::http::HttpServer;
use product_api::lifecycle::Shutdown;
use product_api::store::{MemoryStore, ProductStore};
use product_sdk::ProductClient;

/// A server running on an ephemeral port. Shuts down when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ProductClient {
        ProductClient::new(&self.url())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server over an empty in-memory store.
pub async fn spawn_server() -> TestServer {
    spawn_server_with(ServiceConfig::default(), Arc::new(MemoryStore::new())).await
}

/// Start a server with the given config and store.
pub async fn spawn_server_with(config: ServiceConfig, store: Arc<dyn ProductStore>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}
