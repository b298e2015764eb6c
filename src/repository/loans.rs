//! Loans repository

use std::sync::Arc;

use chrono::Utc;

use super::{from_document, store::DocumentStore, to_document, touch};
use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, UpdateLoan},
};

#[derive(Clone)]
pub struct LoansRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl LoansRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: String) -> Self {
        Self { store, collection }
    }

    fn not_found(id: &str) -> AppError {
        AppError::NotFound(format!("Loan {} not found", id))
    }

    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        self.store
            .scan(&self.collection)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Loan> {
        let document = self
            .store
            .get(&self.collection, id)
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        from_document(document)
    }

    /// Loans referencing a material, whatever their status
    pub async fn list_for_material(&self, material_id: &str) -> AppResult<Vec<Loan>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|loan| loan.material_id == material_id)
            .collect())
    }

    pub async fn create(&self, loan: &Loan) -> AppResult<()> {
        self.store
            .put(&self.collection, &loan.id, to_document(loan)?)
            .await
    }

    pub async fn update(&self, id: &str, data: &UpdateLoan) -> AppResult<Loan> {
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
}
