//! Loan (borrow record) model and related types

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_STATUS: &str = "active";

/// Loan record as stored in the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    /// Borrowed material
    pub material_id: String,
    #[serde(default)]
    pub material_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    /// Units borrowed
    pub quantity: i64,
    pub loan_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_return_date: Option<String>,
    #[serde(default)]
    pub actual_return_date: Option<String>,
    /// Free-form status ("active", "returned", ...). Not interpreted by the
    /// loaned quantity bookkeeping.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

/// Create loan request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoan {
    #[validate(
        required(message = "materialId is required"),
        length(min = 1, message = "materialId must not be empty")
    )]
    pub material_id: Option<String>,
    pub material_name: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    #[validate(
        required(message = "quantity is required"),
        range(
            min = 1,
            max = 2147483647,
            message = "quantity must be between 1 and 2147483647"
        )
    )]
    pub quantity: Option<i64>,
    pub loan_date: Option<String>,
    pub expected_return_date: Option<String>,
    pub actual_return_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl CreateLoan {
    /// Build the stored record. Call `validate()` first.
    pub fn into_loan(self, now: DateTime<Utc>) -> Loan {
        Loan {
            id: Uuid::new_v4().to_string(),
            material_id: self.material_id.unwrap_or_default(),
            material_name: self.material_name.unwrap_or_default(),
            user_id: self.user_id,
            user_name: self.user_name.unwrap_or_default(),
            user_email: self.user_email.unwrap_or_default(),
            quantity: self.quantity.unwrap_or(1),
            loan_date: self
                .loan_date
                .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            expected_return_date: self.expected_return_date,
            actual_return_date: self.actual_return_date,
            status: self.status.unwrap_or_else(default_status),
            notes: self.notes.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Update loan request.
///
/// `quantity` may drop to 0 so an operator can release a returned loan
/// without deleting it.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoan {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "materialId must not be empty"))]
    pub material_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(
        min = 0,
        max = 2147483647,
        message = "quantity must be between 0 and 2147483647"
    ))]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_return_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_return_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Effect of a loan write on its material's loaned quantity
#[derive(Debug, Clone, PartialEq)]
pub enum Adjustment {
    /// The borrowed quantity did not change
    Unchanged,
    Applied {
        material_id: String,
        delta: i64,
        loaned_quantity: i64,
    },
    /// The loan was written but the material counter was not
    Failed {
        material_id: String,
        delta: i64,
        reason: String,
    },
}

impl Adjustment {
    /// Human readable suffix for API messages
    pub fn describe(&self) -> Option<String> {
        match self {
            Adjustment::Unchanged => None,
            Adjustment::Applied {
                material_id,
                loaned_quantity,
                ..
            } => Some(format!(
                "material {} now has {} unit(s) on loan",
                material_id, loaned_quantity
            )),
            Adjustment::Failed {
                material_id,
                delta,
                reason,
            } => Some(format!(
                "loaned quantity of material {} was not adjusted by {}: {}",
                material_id, delta, reason
            )),
        }
    }
}

/// A loan write together with its material adjustment
#[derive(Debug, Clone)]
pub struct LoanChange {
    pub loan: Loan,
    pub adjustment: Adjustment,
}
