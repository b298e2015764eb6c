//! Material store service

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::material::{CreateMaterial, Material, UpdateMaterial},
    repository::Repository,
};

#[derive(Clone)]
pub struct MaterialsService {
    repository: Repository,
    atomic_adjustments: bool,
}

impl MaterialsService {
    pub fn new(repository: Repository, atomic_adjustments: bool) -> Self {
        Self {
            repository,
            atomic_adjustments,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Material>> {
        self.repository.materials.list().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Material> {
        self.repository.materials.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateMaterial) -> AppResult<Material> {
        data.validate()?;
        let material = data.into_material(Utc::now());
        self.repository.materials.create(&material).await?;
        tracing::info!("Created material {} ({})", material.id, material.name);
        Ok(material)
    }

    pub async fn update(&self, id: &str, data: &UpdateMaterial) -> AppResult<Material> {
        data.validate()?;
        self.repository.materials.update(id, data).await
    }

    /// Delete a material. Loans still referencing it are left untouched.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.materials.delete(id).await?;
        tracing::info!("Deleted material {}", id);
        Ok(())
    }

    /// Apply `delta` to the material's loaned quantity, clamped at 0.
    /// Returns the new value.
    ///
    /// Without atomic adjustments this is a plain read-modify-write: two
    /// concurrent calls on the same material can lose one of the updates.
    pub async fn adjust_loaned_quantity(&self, id: &str, delta: i64) -> AppResult<i64> {
        if self.atomic_adjustments {
            let next = self.repository.materials.add_loaned_quantity(id, delta).await?;
            tracing::debug!("Material {} loaned quantity {:+} -> {}", id, delta, next);
            return Ok(next);
        }

        let material = self.repository.materials.get_by_id(id).await?;
        let next = material
            .loaned_quantity
            .checked_add(delta)
            .ok_or_else(|| overflow(id))?
            .max(0);
        self.repository.materials.set_loaned_quantity(id, next).await?;
        tracing::debug!(
            "Material {} loaned quantity {} {:+} -> {}",
            id,
            material.loaned_quantity,
            delta,
            next
        );
        Ok(next)
    }

    /// Overwrite the loaned quantity with a recomputed value
    pub async fn set_loaned_quantity(&self, id: &str, value: i64) -> AppResult<Material> {
        self.repository.materials.set_loaned_quantity(id, value).await
    }
}

pub(crate) fn overflow(id: &str) -> AppError {
    AppError::BadRequest(format!("Loaned quantity of material {} would overflow", id))
}
