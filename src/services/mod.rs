//! Business logic services

pub mod files;
pub mod loans;
pub mod materials;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository, storage::ObjectStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub materials: materials::MaterialsService,
    pub loans: loans::LoansService,
    pub files: files::FilesService,
}

impl Services {
    /// Create all services over the given stores
    pub fn new(repository: Repository, object_store: Arc<dyn ObjectStore>, config: &AppConfig) -> Self {
        let materials = materials::MaterialsService::new(
            repository.clone(),
            config.consistency.atomic_adjustments,
        );
        Self {
            loans: loans::LoansService::new(repository.clone(), materials.clone()),
            files: files::FilesService::new(object_store, config.object_store.clone()),
            materials,
            repository,
        }
    }
}
