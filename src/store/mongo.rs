//! MongoDB-backed product store.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::config::DatabaseConfig;
use crate::products::types::{NewProduct, Product, ProductPatch};
use crate::store::{ProductStore, StoreResult};

/// On-disk shape of a product: the schema fields plus the native `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    price: f64,
    category: String,
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Product {
            id: doc.id.to_hex(),
            name: doc.name,
            price: doc.price,
            category: doc.category,
        }
    }
}

/// Build the `$set` body for a patch. Empty when the patch changes nothing.
fn set_document(patch: &ProductPatch) -> Document {
    let mut set = Document::new();
    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(price) = patch.price {
        set.insert("price", price);
    }
    if let Some(category) = &patch.category {
        set.insert("category", category.as_str());
    }
    set
}

/// A product collection in MongoDB.
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<ProductDocument>,
}

impl MongoStore {
    /// Connect to the configured server and verify it answers a ping.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let database = client.database(&config.name);
        database.run_command(doc! { "ping": 1 }).await?;

        tracing::info!(
            database = %config.name,
            collection = %config.collection,
            "Successfully connected to MongoDB"
        );

        Ok(Self {
            collection: database.collection(&config.collection),
        })
    }
}

#[async_trait]
impl ProductStore for MongoStore {
    async fn insert(&self, product: NewProduct) -> StoreResult<Product> {
        // Generate the id client-side so the inserted document can be returned as-is.
        let document = ProductDocument {
            id: ObjectId::new(),
            name: product.name,
            price: product.price,
            category: product.category,
        };
        self.collection.insert_one(&document).await?;
        tracing::debug!(id = %document.id, "Inserted product");
        Ok(document.into())
    }

    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Product::from).collect())
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: ProductPatch,
    ) -> StoreResult<Option<Product>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let filter = doc! { "_id": oid };

        let set = set_document(&patch);
        let updated = if set.is_empty() {
            self.collection.find_one(filter).await?
        } else {
            self.collection
                .find_one_and_update(filter, doc! { "$set": set })
                .return_document(ReturnDocument::After)
                .await?
        };

        if updated.is_some() {
            tracing::debug!(id = %id, "Updated product");
        }
        Ok(updated.map(Product::from))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> StoreResult<Option<Product>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        let deleted = self.collection.find_one_and_delete(doc! { "_id": oid }).await?;
        if deleted.is_some() {
            tracing::debug!(id = %id, "Deleted product");
        }
        Ok(deleted.map(Product::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_document_only_contains_patched_fields() {
        let patch = ProductPatch {
            price: Some(2.0),
            category: Some("Office".into()),
            ..Default::default()
        };
        assert_eq!(set_document(&patch), doc! { "price": 2.0, "category": "Office" });
        assert!(set_document(&ProductPatch::default()).is_empty());
    }

    #[test]
    fn test_document_id_is_hex() {
        let oid = ObjectId::new();
        let product: Product = ProductDocument {
            id: oid,
            name: "Pen".into(),
            price: 1.5,
            category: "Stationery".into(),
        }
        .into();
        assert_eq!(product.id, oid.to_hex());
        assert_eq!(product.id.len(), 24);
    }
}
