//! Stored file payloads

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Result of a raw upload
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub key: String,
    pub bucket: String,
    pub url: String,
}

/// Result of an image upload
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub file_name: String,
    pub bucket: String,
    pub public_url: String,
}

/// Result of a deletion
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedFile {
    pub file_name: String,
    pub bucket: String,
}

/// Upload options carried in the query string
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Body is base64 text rather than raw bytes
    #[serde(default)]
    pub base64: bool,
}

/// Delete request, as JSON body or query string
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteFileRequest {
    /// Object key, bare or as a full URL
    pub file_name: Option<String>,
}

/// Simulated resize request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResizeRequest {
    /// Base64 image, optionally as a `data:image/...;base64,` URL
    pub image_data: Option<String>,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_quality")]
    pub quality: u8,
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_format() -> String {
    "jpeg".to_string()
}

fn default_quality() -> u8 {
    80
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Simulated resize result. The stored bytes are the original ones.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResizedImage {
    pub original_size: usize,
    pub resized_size: usize,
    pub dimensions: Dimensions,
    pub format: String,
    pub quality: u8,
    pub key: String,
    pub url: String,
}
