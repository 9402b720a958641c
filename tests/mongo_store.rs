//! Tests against a live MongoDB.
//!
//! Run with `cargo test -- --ignored` and a server on localhost (or `MONGODB_URI`).

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use product_api::config::DatabaseConfig;
use product_api::products::{NewProduct, ProductModel, ProductPatch};
use product_api::store::{MongoStore, ProductStore};

fn test_config() -> DatabaseConfig {
    let mut config = DatabaseConfig::default();
    if let Ok(uri) = std::env::var("MONGODB_URI") {
        config.uri = uri;
    }
    // Each run gets its own collection so concurrent runs do not interfere.
    config.collection = format!("products_test_{}", Uuid::new_v4().simple());
    config
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_mongo_crud_cycle() {
    let store = MongoStore::connect(&test_config()).await.unwrap();

    assert!(store.find_all().await.unwrap().is_empty());

    let pen = store
        .insert(NewProduct {
            name: "Pen".into(),
            price: 1.5,
            category: "Stationery".into(),
        })
        .await
        .unwrap();
    assert_eq!(pen.id.len(), 24);

    let patch = ProductPatch {
        price: Some(2.0),
        ..Default::default()
    };
    let updated = store.find_by_id_and_update(&pen.id, patch).await.unwrap().unwrap();
    assert_eq!(updated.price, 2.0);
    assert_eq!(updated.name, "Pen");

    let unchanged = store
        .find_by_id_and_update(&pen.id, ProductPatch::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, updated);

    let deleted = store.find_by_id_and_delete(&pen.id).await.unwrap();
    assert_eq!(deleted, Some(updated));
    assert!(store.find_by_id_and_delete(&pen.id).await.unwrap().is_none());
    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_mongo_unknown_and_undecodable_ids() {
    let store = MongoStore::connect(&test_config()).await.unwrap();

    assert!(store
        .find_by_id_and_delete("65f000000000000000000000")
        .await
        .unwrap()
        .is_none());
    assert!(store.find_by_id_and_delete("not-an-object-id").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_mongo_model_rejects_invalid_update() {
    let store = Arc::new(MongoStore::connect(&test_config()).await.unwrap());
    let model = ProductModel::new(store.clone());

    let pen = model
        .create(&json!({"name": "Pen", "price": 1.5, "category": "Stationery"}))
        .await
        .unwrap();
    assert!(model.find_by_id_and_update(&pen.id, &json!({"price": -5})).await.is_err());
    assert_eq!(store.find_all().await.unwrap(), vec![pen]);
}
