//! Loan ledger service
//!
//! Every loan write is followed by an adjustment of the referenced material's
//! `loanedQuantity`. The two writes are independent: when the adjustment fails
//! the loan write is kept and the failure is reported in the returned
//! [`Adjustment`].

use chrono::Utc;
use validator::Validate;

use super::materials::{overflow, MaterialsService};
use crate::{
    error::AppResult,
    models::{
        loan::{Adjustment, CreateLoan, Loan, LoanChange, UpdateLoan},
        material::Material,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    materials: MaterialsService,
}

impl LoansService {
    pub fn new(repository: Repository, materials: MaterialsService) -> Self {
        Self {
            repository,
            materials,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        self.repository.loans.list().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Loan> {
        self.repository.loans.get_by_id(id).await
    }

    /// Record a loan, then add its quantity to the material
    pub async fn create(&self, data: CreateLoan) -> AppResult<LoanChange> {
        data.validate()?;
        let loan = data.into_loan(Utc::now());
        self.repository.loans.create(&loan).await?;
        tracing::info!(
            "Created loan {} of {} x material {}",
            loan.id,
            loan.quantity,
            loan.material_id
        );

        let adjustment = self.adjust(&loan.material_id, loan.quantity).await;
        Ok(LoanChange { loan, adjustment })
    }

    /// Merge fields into a loan. A quantity change is applied to the material
    /// the loan referenced before the update.
    pub async fn update(&self, id: &str, data: &UpdateLoan) -> AppResult<LoanChange> {
        data.validate()?;
        let previous = self.repository.loans.get_by_id(id).await?;
        let loan = self.repository.loans.update(id, data).await?;

        if loan.material_id != previous.material_id {
            tracing::warn!(
                "Loan {} moved from material {} to {}; loaned quantities are not migrated",
                id,
                previous.material_id,
                loan.material_id
            );
        }

        let adjustment = match data.quantity {
            Some(quantity) if quantity != previous.quantity => {
                self.adjust(&previous.material_id, quantity - previous.quantity)
                    .await
            }
            _ => Adjustment::Unchanged,
        };
        Ok(LoanChange { loan, adjustment })
    }

    /// Delete a loan, then release its quantity on the material
    pub async fn delete(&self, id: &str) -> AppResult<LoanChange> {
        let loan = self.repository.loans.get_by_id(id).await?;
        self.repository.loans.delete(id).await?;
        tracing::info!("Deleted loan {}", id);

        let adjustment = self.adjust(&loan.material_id, -loan.quantity).await;
        Ok(LoanChange { loan, adjustment })
    }

    /// Recompute a material's loaned quantity from the loans referencing it.
    ///
    /// Loan status is not consulted, matching the incremental bookkeeping.
    pub async fn reconcile(&self, material_id: &str) -> AppResult<Material> {
        let material = self.materials.get_by_id(material_id).await?;
        let total = self
            .repository
            .loans
            .list_for_material(material_id)
            .await?
            .iter()
            .try_fold(0i64, |total, loan| total.checked_add(loan.quantity.max(0)))
            .ok_or_else(|| overflow(material_id))?;

        if total != material.loaned_quantity {
            tracing::warn!(
                "Material {} loaned quantity drifted: stored {}, loans sum to {}",
                material_id,
                material.loaned_quantity,
                total
            );
        }
        self.materials.set_loaned_quantity(material_id, total).await
    }

    async fn adjust(&self, material_id: &str, delta: i64) -> Adjustment {
        if delta == 0 {
            return Adjustment::Unchanged;
        }
        match self.materials.adjust_loaned_quantity(material_id, delta).await {
            Ok(loaned_quantity) => Adjustment::Applied {
                material_id: material_id.to_string(),
                delta,
                loaned_quantity,
            },
            Err(e) => {
                tracing::warn!(
                    "Loaned quantity of material {} not adjusted by {}: {}",
                    material_id,
                    delta,
                    e
                );
                Adjustment::Failed {
                    material_id: material_id.to_string(),
                    delta,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::DatabaseConfig, error::AppError, models::material::CreateMaterial,
        repository::memory::MemoryDocumentStore,
    };

    fn services(atomic: bool) -> (MaterialsService, LoansService) {
        let repository = Repository::new(
            Arc::new(MemoryDocumentStore::new()),
            &DatabaseConfig::default(),
        );
        let materials = MaterialsService::new(repository.clone(), atomic);
        let loans = LoansService::new(repository, materials.clone());
        (materials, loans)
    }

    async fn material(materials: &MaterialsService, quantity: i64) -> Material {
        materials
            .create(CreateMaterial {
                name: Some("Baudrier".into()),
                category: Some("Escalade".into()),
                location: Some("Local".into()),
                quantity: Some(quantity),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    fn borrow(material_id: &str, quantity: i64) -> CreateLoan {
        CreateLoan {
            material_id: Some(material_id.to_string()),
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    async fn loaned(materials: &MaterialsService, id: &str) -> i64 {
        materials.get_by_id(id).await.unwrap().loaned_quantity
    }

    #[tokio::test]
    async fn test_lifecycle_keeps_counter_in_step() {
        let (materials, loans) = services(false);
        let m = material(&materials, 5).await;
        assert_eq!(m.loaned_quantity, 0);

        let created = loans.create(borrow(&m.id, 2)).await.unwrap();
        assert_eq!(loaned(&materials, &m.id).await, 2);
        assert!(matches!(
            created.adjustment,
            Adjustment::Applied { delta: 2, loaned_quantity: 2, .. }
        ));

        let updated = loans
            .update(
                &created.loan.id,
                &UpdateLoan {
                    quantity: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.loan.quantity, 3);
        assert_eq!(loaned(&materials, &m.id).await, 3);

        loans.delete(&created.loan.id).await.unwrap();
        assert_eq!(loaned(&materials, &m.id).await, 0);
    }

    #[tokio::test]
    async fn test_update_without_quantity_change_leaves_counter() {
        let (materials, loans) = services(false);
        let m = material(&materials, 5).await;
        let created = loans.create(borrow(&m.id, 2)).await.unwrap();

        let change = loans
            .update(
                &created.loan.id,
                &UpdateLoan {
                    quantity: Some(2),
                    status: Some("returned".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(change.adjustment, Adjustment::Unchanged);
        assert_eq!(change.loan.status, "returned");
        // a returned loan still counts until deleted or zeroed
        assert_eq!(loaned(&materials, &m.id).await, 2);
    }

    #[tokio::test]
    async fn test_update_applies_delta_to_previous_material() {
        let (materials, loans) = services(false);
        let first = material(&materials, 5).await;
        let second = material(&materials, 5).await;
        let created = loans.create(borrow(&first.id, 1)).await.unwrap();

        loans
            .update(
                &created.loan.id,
                &UpdateLoan {
                    material_id: Some(second.id.clone()),
                    quantity: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(loaned(&materials, &first.id).await, 4);
        assert_eq!(loaned(&materials, &second.id).await, 0);
    }

    #[tokio::test]
    async fn test_delete_clamps_at_zero() {
        let (materials, loans) = services(false);
        let m = material(&materials, 5).await;
        let created = loans.create(borrow(&m.id, 3)).await.unwrap();
        materials.set_loaned_quantity(&m.id, 1).await.unwrap();

        loans.delete(&created.loan.id).await.unwrap();
        assert_eq!(loaned(&materials, &m.id).await, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found_twice() {
        let (materials, loans) = services(false);
        let m = material(&materials, 5).await;
        let created = loans.create(borrow(&m.id, 1)).await.unwrap();

        loans.delete(&created.loan.id).await.unwrap();
        for _ in 0..2 {
            let err = loans.delete(&created.loan.id).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)));
        }
        assert_eq!(loaned(&materials, &m.id).await, 0);
    }

    #[tokio::test]
    async fn test_create_against_missing_material_keeps_loan() {
        let (_, loans) = services(false);
        let change = loans.create(borrow("ghost", 2)).await.unwrap();
        assert!(matches!(change.adjustment, Adjustment::Failed { delta: 2, .. }));
        assert_eq!(loans.get_by_id(&change.loan.id).await.unwrap(), change.loan);
    }

    #[tokio::test]
    async fn test_update_after_material_deleted_keeps_loan_update() {
        let (materials, loans) = services(false);
        let m = material(&materials, 5).await;
        let created = loans.create(borrow(&m.id, 2)).await.unwrap();
        materials.delete(&m.id).await.unwrap();

        let change = loans
            .update(
                &created.loan.id,
                &UpdateLoan {
                    quantity: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(matches!(
            &change.adjustment,
            Adjustment::Failed { material_id, delta: 2, .. } if material_id == &m.id
        ));
        assert_eq!(change.loan.quantity, 4);
        assert_eq!(loans.get_by_id(&created.loan.id).await.unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn test_delete_after_material_deleted_removes_loan() {
        let (materials, loans) = services(false);
        let m = material(&materials, 5).await;
        let created = loans.create(borrow(&m.id, 3)).await.unwrap();
        materials.delete(&m.id).await.unwrap();

        let change = loans.delete(&created.loan.id).await.unwrap();
        assert!(matches!(change.adjustment, Adjustment::Failed { delta: -3, .. }));
        assert!(matches!(
            loans.get_by_id(&created.loan.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_update_missing_loan_is_not_found() {
        let (_, loans) = services(false);
        let err = loans
            .update(
                "ghost",
                &UpdateLoan {
                    quantity: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_counter_overflow_keeps_loan_and_counter() {
        for atomic in [false, true] {
            let (materials, loans) = services(atomic);
            let m = material(&materials, 5).await;
            materials.set_loaned_quantity(&m.id, i64::MAX).await.unwrap();

            let change = loans.create(borrow(&m.id, 1)).await.unwrap();
            assert!(matches!(change.adjustment, Adjustment::Failed { delta: 1, .. }));
            assert_eq!(loans.get_by_id(&change.loan.id).await.unwrap(), change.loan);
            assert_eq!(loaned(&materials, &m.id).await, i64::MAX);
        }
    }

    #[tokio::test]
    async fn test_reconcile_overflow_is_rejected() {
        let (materials, loans) = services(false);
        let m = material(&materials, 5).await;
        for _ in 0..2 {
            // stored directly, bypassing request validation
            let loan = borrow(&m.id, i64::MAX).into_loan(Utc::now());
            loans.repository.loans.create(&loan).await.unwrap();
        }

        let err = loans.reconcile(&m.id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(loaned(&materials, &m.id).await, 0);
    }

    #[tokio::test]
    async fn test_reconcile_recomputes_from_loans() {
        let (materials, loans) = services(false);
        let m = material(&materials, 10).await;
        loans.create(borrow(&m.id, 2)).await.unwrap();
        loans.create(borrow(&m.id, 3)).await.unwrap();
        materials.set_loaned_quantity(&m.id, 0).await.unwrap();

        let repaired = loans.reconcile(&m.id).await.unwrap();
        assert_eq!(repaired.loaned_quantity, 5);
        assert!(matches!(
            loans.reconcile("ghost").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creations_with_atomic_adjustments() {
        const N: i64 = 32;
        let (materials, loans) = services(true);
        let m = material(&materials, N).await;

        let handles: Vec<_> = (0..N)
            .map(|_| {
                let loans = loans.clone();
                let id = m.id.clone();
                tokio::spawn(async move { loans.create(borrow(&id, 1)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(loaned(&materials, &m.id).await, N);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creations_with_read_modify_write() {
        const N: i64 = 32;
        let (materials, loans) = services(false);
        let m = material(&materials, N).await;

        let handles: Vec<_> = (0..N)
            .map(|_| {
                let loans = loans.clone();
                let id = m.id.clone();
                tokio::spawn(async move { loans.create(borrow(&id, 1)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Updates may be lost; the counter can only fall short
        let observed = loaned(&materials, &m.id).await;
        if observed != N {
            eprintln!("read-modify-write lost {} of {} adjustments", N - observed, N);
        }
        assert!(observed >= 1 && observed <= N);
        assert_eq!(loans.list().await.unwrap().len() as i64, N);
    }
}
