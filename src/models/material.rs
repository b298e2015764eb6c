//! Material (physical asset) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_STATUS: &str = "disponible";
pub const DEFAULT_CONDITION: &str = "bon";

/// Material record as stored in the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    pub location: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_condition")]
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    /// Purchase value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    /// Total units owned
    #[serde(default)]
    pub quantity: i64,
    /// Units currently lent out, maintained by the loan ledger
    #[serde(default)]
    pub loaned_quantity: i64,
    /// Public URLs of uploaded pictures
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

fn default_condition() -> String {
    DEFAULT_CONDITION.to_string()
}

/// Create material request
///
/// Required fields are optional at the type level so a missing field is
/// reported as a validation error (400) instead of a decoding failure.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterial {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "category is required"),
        length(min = 1, message = "category must not be empty")
    )]
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub serial_number: Option<String>,
    #[validate(
        required(message = "location is required"),
        length(min = 1, message = "location must not be empty")
    )]
    pub location: Option<String>,
    pub status: Option<String>,
    pub condition: Option<String>,
    pub purchase_date: Option<String>,
    pub value: Option<f64>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub reference: Option<String>,
    pub associated_to: Option<String>,
    pub responsible: Option<String>,
    pub usage: Option<String>,
    pub observations: Option<String>,
    #[validate(
        required(message = "quantity is required"),
        range(
            min = 0,
            max = 2147483647,
            message = "quantity must be between 0 and 2147483647"
        )
    )]
    pub quantity: Option<i64>,
    #[validate(range(
        min = 0,
        max = 2147483647,
        message = "loanedQuantity must be between 0 and 2147483647"
    ))]
    pub loaned_quantity: Option<i64>,
    pub images: Option<Vec<String>>,
}

impl CreateMaterial {
    /// Build the stored record, assigning a fresh id and applying defaults.
    /// Call `validate()` first: missing required fields fall back to empty values.
    pub fn into_material(self, now: DateTime<Utc>) -> Material {
        Material {
            id: Uuid::new_v4().to_string(),
            name: self.name.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            subcategory: self.subcategory,
            serial_number: self.serial_number,
            location: self.location.unwrap_or_default(),
            status: self.status.unwrap_or_else(default_status),
            condition: self.condition.unwrap_or_else(default_condition),
            purchase_date: self.purchase_date,
            value: self.value,
            description: self.description,
            brand: self.brand,
            model: self.model,
            reference: self.reference,
            associated_to: self.associated_to,
            responsible: self.responsible,
            usage: self.usage,
            observations: self.observations,
            quantity: self.quantity.unwrap_or_default(),
            loaned_quantity: self.loaned_quantity.unwrap_or(0),
            images: self.images.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Update material request.
///
/// These are the only mutable fields; anything else in the body is ignored.
/// `loanedQuantity` is owned by the loan ledger and cannot be set here.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterial {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(
        min = 0,
        max = 2147483647,
        message = "quantity must be between 0 and 2147483647"
    ))]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}
