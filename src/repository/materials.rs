//! Materials repository

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use super::{from_document, store::DocumentStore, to_document, touch};
use crate::{
    error::{AppError, AppResult},
    models::material::{Material, UpdateMaterial},
};

pub const LOANED_QUANTITY_FIELD: &str = "loanedQuantity";

#[derive(Clone)]
pub struct MaterialsRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl MaterialsRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: String) -> Self {
        Self { store, collection }
    }

    fn not_found(id: &str) -> AppError {
        AppError::NotFound(format!("Material {} not found", id))
    }

    /// List all materials
    pub async fn list(&self) -> AppResult<Vec<Material>> {
        self.store
            .scan(&self.collection)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Get material by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Material> {
        let document = self
            .store
            .get(&self.collection, id)
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        from_document(document)
    }

    pub async fn create(&self, material: &Material) -> AppResult<()> {
        self.store
            .put(&self.collection, &material.id, to_document(material)?)
            .await
    }

    /// Merge the provided fields and stamp `updatedAt`
    pub async fn update(&self, id: &str, data: &UpdateMaterial) -> AppResult<Material> {
        let mut fields = to_document(data)?;
        fields.extend(touch(Utc::now()));
        let document = self
            .store
            .update(&self.collection, id, fields)
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        from_document(document)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.store.delete(&self.collection, id).await? {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    /// Overwrite the loaned quantity counter
    pub async fn set_loaned_quantity(&self, id: &str, value: i64) -> AppResult<Material> {
        let mut fields = touch(Utc::now());
        fields.insert(LOANED_QUANTITY_FIELD.to_string(), Value::from(value));
        let document = self
            .store
            .update(&self.collection, id, fields)
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        from_document(document)
    }

    /// Add `delta` to the loaned quantity in one store operation, clamped at 0
    pub async fn add_loaned_quantity(&self, id: &str, delta: i64) -> AppResult<i64> {
        self.store
            .add_clamped(
                &self.collection,
                id,
                LOANED_QUANTITY_FIELD,
                delta,
                touch(Utc::now()),
            )
            .await?
            .ok_or_else(|| Self::not_found(id))
    }
}
