//! In-memory document store

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::store::{Document, DocumentStore};
use crate::error::{AppError, AppResult};

/// Process-local store, one map per collection
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, HashMap<String, Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn put(&self, collection: &str, id: &str, document: Document) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> AppResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
        else {
            return Ok(None);
        };
        document.extend(fields);
        Ok(Some(document.clone()))
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .is_some())
    }

    async fn scan(&self, collection: &str) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_clamped(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
        touch: Document,
    ) -> AppResult<Option<i64>> {
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
        else {
            return Ok(None);
        };
        let current = document.get(field).and_then(Value::as_i64).unwrap_or(0);
        let next = current
            .checked_add(delta)
            .ok_or_else(|| {
                AppError::BadRequest(format!("{} of {}/{} would overflow", field, collection, id))
            })?
            .max(0);
        document.insert(field.to_string(), Value::from(next));
        document.extend(touch);
        Ok(Some(next))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_put_get_scan_delete() {
        let store = MemoryDocumentStore::new();
        store.put("Materials", "a", doc(json!({ "id": "a" }))).await.unwrap();
        store.put("Materials", "b", doc(json!({ "id": "b" }))).await.unwrap();
        store.put("Loans", "c", doc(json!({ "id": "c" }))).await.unwrap();

        assert_eq!(store.scan("Materials").await.unwrap().len(), 2);
        assert!(store.get("Materials", "a").await.unwrap().is_some());
        assert!(store.get("Loans", "a").await.unwrap().is_none());

        assert!(store.delete("Materials", "a").await.unwrap());
        assert!(!store.delete("Materials", "a").await.unwrap());
        assert!(store.scan("Unknown").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_and_reports_missing() {
        let store = MemoryDocumentStore::new();
        store
            .put("Materials", "a", doc(json!({ "id": "a", "name": "Tente", "quantity": 3 })))
            .await
            .unwrap();

        let merged = store
            .update("Materials", "a", doc(json!({ "quantity": 4 })))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(merged["name"], "Tente");
        assert_eq!(merged["quantity"], 4);

        let missing = store
            .update("Materials", "zz", doc(json!({ "quantity": 4 })))
            .await
            .unwrap();
        assert!(missing.is_none());
        assert!(store.get("Materials", "zz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_clamped_never_goes_negative() {
        let store = MemoryDocumentStore::new();
        store.put("Materials", "a", doc(json!({ "id": "a" }))).await.unwrap();

        let touch = doc(json!({ "updatedAt": "2024-01-01T00:00:00Z" }));
        assert_eq!(
            store.add_clamped("Materials", "a", "loanedQuantity", 3, touch.clone()).await.unwrap(),
            Some(3)
        );
        assert_eq!(
            store.add_clamped("Materials", "a", "loanedQuantity", -5, touch.clone()).await.unwrap(),
            Some(0)
        );
        assert_eq!(
            store.add_clamped("Materials", "zz", "loanedQuantity", 1, touch).await.unwrap(),
            None
        );
        let stored = store.get("Materials", "a").await.unwrap().unwrap();
        assert_eq!(stored["updatedAt"], "2024-01-01T00:00:00Z");
    }
    #[tokio::test]
    async fn test_add_clamped_overflow_leaves_value() {
        let store = MemoryDocumentStore::new();
        store
            .put(
                "Materials",
                "a",
                doc(json!({ "id": "a", "loanedQuantity": i64::MAX })),
            )
            .await
            .unwrap();

        let touch = doc(json!({ "updatedAt": "2024-01-01T00:00:00Z" }));
        let err = store
            .add_clamped("Materials", "a", "loanedQuantity", 1, touch)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let stored = store.get("Materials", "a").await.unwrap().unwrap();
        assert_eq!(stored["loanedQuantity"], i64::MAX);
        assert!(stored.get("updatedAt").is_none());
    }
}
