//! Key-value document store abstraction

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::AppResult;

/// A stored document: a JSON object keyed by its `id` field
pub type Document = Map<String, Value>;

/// Document storage addressed by collection and id.
///
/// Implementations must be safe to share between concurrent requests; apart
/// from `add_clamped` no operation is atomic with respect to another.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Fetch one document
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    /// Insert or replace a document
    async fn put(&self, collection: &str, id: &str, document: Document) -> AppResult<()>;

    /// Shallow-merge `fields` into an existing document.
    /// Returns the merged document, or `None` when the id is absent.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> AppResult<Option<Document>>;

    /// Returns `true` if the document existed
    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool>;

    /// All documents of a collection, in no particular order
    async fn scan(&self, collection: &str) -> AppResult<Vec<Document>>;

    /// Atomically set `field` to `max(0, field + delta)` and merge `touch`.
    /// A missing field counts as 0. Returns the new value, or `None` when the
    /// id is absent.
    async fn add_clamped(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
        touch: Document,
    ) -> AppResult<Option<i64>>;

    /// Backend connectivity check
    async fn ping(&self) -> AppResult<()>;
}
