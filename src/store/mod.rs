//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! ProductModel (validated values)
//!     → ProductStore trait (one atomic single-document call per operation)
//!     → mongo.rs  (MongoDB collection, production)
//!     → memory.rs (DashMap, tests and database-less runs)
//! ```
//!
//! # Design Decisions
//! - Ids are opaque strings; an id the backend cannot decode simply matches nothing
//! - Update and delete return `None` for unknown ids; mapping to 404 happens above
//! - No retries and no multi-document transactions

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{DatabaseConfig, StoreBackend};
use crate::products::schema::ValidationError;
use crate::products::types::{NewProduct, Product, ProductPatch};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver, network or server-side failure.
    #[error("{0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The backend refused a write that would leave an invalid document.
    #[error("{0}")]
    Rejected(#[from] ValidationError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A collection of product documents.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a new document and return it with its generated id.
    async fn insert(&self, product: NewProduct) -> StoreResult<Product>;

    /// Every stored product. Order is unspecified.
    async fn find_all(&self) -> StoreResult<Vec<Product>>;

    /// Apply `patch` to the document with `id`, returning the updated document.
    async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: ProductPatch,
    ) -> StoreResult<Option<Product>>;

    /// Remove the document with `id`, returning it as it was before removal.
    async fn find_by_id_and_delete(&self, id: &str) -> StoreResult<Option<Product>>;
}

/// Open the configured backend. For MongoDB this connects and pings the server.
pub async fn open(config: &DatabaseConfig) -> StoreResult<Arc<dyn ProductStore>> {
    match config.backend {
        StoreBackend::Mongo => Ok(Arc::new(MongoStore::connect(config).await?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
