//! In-process product store.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::products::schema::validate_document;
use crate::products::types::{NewProduct, Product, ProductPatch};
use crate::store::{ProductStore, StoreResult};

/// A stored document plus its insertion sequence number.
#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    product: Product,
}

/// A concurrent map of products keyed by UUID strings.
///
/// Each operation locks only the shard holding its key, which gives the same
/// per-document atomicity a document database offers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    documents: Arc<DashMap<String, Entry>>,
    next_seq: Arc<AtomicU64>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert(&self, product: NewProduct) -> StoreResult<Product> {
        let product = product.with_id(Uuid::new_v4().to_string());
        validate_document(&product)?;

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.documents.insert(
            product.id.clone(),
            Entry {
                seq,
                product: product.clone(),
            },
        );
        tracing::debug!(id = %product.id, "Inserted product");
        Ok(product)
    }

    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        let mut entries: Vec<Entry> = self.documents.iter().map(|r| r.value().clone()).collect();
        entries.sort_by_key(|e| e.seq);
        Ok(entries.into_iter().map(|e| e.product).collect())
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: ProductPatch,
    ) -> StoreResult<Option<Product>> {
        let Some(mut entry) = self.documents.get_mut(id) else {
            return Ok(None);
        };

        let mut updated = entry.product.clone();
        patch.apply_to(&mut updated);
        validate_document(&updated)?;

        entry.product = updated.clone();
        tracing::debug!(id = %id, "Updated product");
        Ok(Some(updated))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> StoreResult<Option<Product>> {
        let removed = self.documents.remove(id).map(|(_, entry)| entry.product);
        if removed.is_some() {
            tracing::debug!(id = %id, "Deleted product");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    fn new_product(name: &str, price: f64) -> NewProduct {
        NewProduct {
            name: name.into(),
            price,
            category: "Stationery".into(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let store = MemoryStore::new();
        let a = store.insert(new_product("Pen", 1.5)).await.unwrap();
        let b = store.insert(new_product("Pen", 1.5)).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_find_all_in_insertion_order() {
        let store = MemoryStore::new();
        assert!(store.find_all().await.unwrap().is_empty());

        for name in ["a", "b", "c", "d"] {
            store.insert(new_product(name, 1.0)).await.unwrap();
        }
        let names: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_update_returns_new_document() {
        let store = MemoryStore::new();
        let pen = store.insert(new_product("Pen", 1.5)).await.unwrap();

        let patch = ProductPatch {
            price: Some(2.0),
            ..Default::default()
        };
        let updated = store.find_by_id_and_update(&pen.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.price, 2.0);
        assert_eq!(updated.name, "Pen");

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![updated]);
    }

    #[tokio::test]
    async fn test_invalid_merge_is_rejected_and_nothing_changes() {
        let store = MemoryStore::new();
        let pen = store.insert(new_product("Pen", 1.5)).await.unwrap();

        let patch = ProductPatch {
            price: Some(-5.0),
            ..Default::default()
        };
        let err = store.find_by_id_and_update(&pen.id, patch).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));

        assert_eq!(store.find_all().await.unwrap(), vec![pen]);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let store = MemoryStore::new();
        assert!(store
            .find_by_id_and_update("missing", ProductPatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(store.find_by_id_and_delete("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_previous_document_once() {
        let store = MemoryStore::new();
        let pen = store.insert(new_product("Pen", 1.5)).await.unwrap();

        let deleted = store.find_by_id_and_delete(&pen.id).await.unwrap();
        assert_eq!(deleted, Some(pen.clone()));
        assert!(store.is_empty());
        assert!(store.find_by_id_and_delete(&pen.id).await.unwrap().is_none());
    }
}
