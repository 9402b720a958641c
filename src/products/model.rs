//! Schema-validated access to the product collection.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::products::schema::{validate_new, validate_patch, ValidationError};
use crate::products::types::Product;
use crate::store::{ProductStore, StoreError};

/// Errors surfaced by product operations.
#[derive(Debug, Error)]
pub enum ProductError {
    /// A field constraint was violated; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No product has the requested id; nothing was written.
    #[error("Product not found")]
    NotFound(String),

    /// The store failed to execute the operation.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ProductError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(validation) => ProductError::Validation(validation),
            other => ProductError::Store(other),
        }
    }
}

/// Result type for product operations.
pub type ProductResult<T> = Result<T, ProductError>;

/// The product model: validates raw input, then delegates to the store.
#[derive(Clone)]
pub struct ProductModel {
    store: Arc<dyn ProductStore>,
}

impl ProductModel {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// Validate `body` against the full schema and insert it.
    pub async fn create(&self, body: &Value) -> ProductResult<Product> {
        let product = validate_new(body)?;
        Ok(self.store.insert(product).await?)
    }

    pub async fn find_all(&self) -> ProductResult<Vec<Product>> {
        Ok(self.store.find_all().await?)
    }

    /// Apply the fields of `body` to product `id`, returning the updated document.
    pub async fn find_by_id_and_update(&self, id: &str, body: &Value) -> ProductResult<Product> {
        let patch = validate_patch(body)?;
        self.store
            .find_by_id_and_update(id, patch)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Remove product `id`, returning it as it was before removal.
    pub async fn find_by_id_and_delete(&self, id: &str) -> ProductResult<Product> {
        self.store
            .find_by_id_and_delete(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }
}
