//! Inventory management server
//!
//! REST JSON API for materials (physical assets), loans of those materials and
//! the files attached to them. Loans keep each material's `loanedQuantity`
//! counter in step with the quantities borrowed.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod storage;

pub use api::create_router;
pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig, services: services::Services) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }

    /// State over in-memory document and object stores
    pub fn in_memory(config: AppConfig) -> Self {
        let repository = repository::Repository::new(
            Arc::new(repository::memory::MemoryDocumentStore::new()),
            &config.database,
        );
        let object_store = Arc::new(storage::memory::MemoryObjectStore::new(
            config.object_store.public_base_url.clone(),
        ));
        let services = services::Services::new(repository, object_store, &config);
        Self::new(config, services)
    }
}
