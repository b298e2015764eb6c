//! Repository layer for document store operations

pub mod loans;
pub mod materials;
pub mod memory;
pub mod postgres;
pub mod store;

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};
use store::{Document, DocumentStore};

/// Main repository struct holding the document store
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn DocumentStore>,
    pub materials: materials::MaterialsRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn DocumentStore>, config: &DatabaseConfig) -> Self {
        Self {
            materials: materials::MaterialsRepository::new(
                store.clone(),
                config.materials_collection.clone(),
            ),
            loans: loans::LoansRepository::new(store.clone(), config.loans_collection.clone()),
            store,
        }
    }
}

/// Serialize a typed record or partial record into a document
pub(crate) fn to_document<T: Serialize>(value: &T) -> AppResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(document) => Ok(document),
        other => Err(AppError::Internal(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

pub(crate) fn from_document<T: DeserializeOwned>(document: Document) -> AppResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// `updatedAt` stamp merged into every write
pub(crate) fn touch(now: DateTime<Utc>) -> Document {
    let mut document = Document::new();
    document.insert(
        "updatedAt".to_string(),
        Value::String(now.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    );
    document
}
