//! File storage service: uploads, deletions and simulated resizing

use std::sync::Arc;

use axum::body::Bytes;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    config::ObjectStoreConfig,
    error::{AppError, AppResult},
    models::file::{
        DeletedFile, Dimensions, ResizeRequest, ResizedImage, StoredFile, StoredImage,
    },
    storage::ObjectStore,
};

static DATA_URL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/[a-z]+;base64,").expect("valid regex"));

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone)]
pub struct FilesService {
    store: Arc<dyn ObjectStore>,
    config: ObjectStoreConfig,
}

impl FilesService {
    pub fn new(store: Arc<dyn ObjectStore>, config: ObjectStoreConfig) -> Self {
        Self { store, config }
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Store an arbitrary file under `uploads/<millis>.bin`
    pub async fn upload(
        &self,
        body: Bytes,
        content_type: Option<&str>,
        base64: bool,
    ) -> AppResult<StoredFile> {
        let body = decode_body(body, base64)?;
        let key = format!("uploads/{}.bin", Utc::now().timestamp_millis());
        let bucket = self.config.uploads_bucket.clone();
        let url = self
            .store
            .put(
                &bucket,
                &key,
                body,
                content_type.unwrap_or(DEFAULT_CONTENT_TYPE),
            )
            .await?;
        tracing::info!("Uploaded {} to {}", key, bucket);
        Ok(StoredFile { key, bucket, url })
    }

    /// Store an image under `image-<millis>.<ext>`
    pub async fn upload_image(
        &self,
        body: Bytes,
        content_type: Option<&str>,
        base64: bool,
    ) -> AppResult<StoredImage> {
        let body = decode_body(body, base64)?;
        let (extension, content_type) = image_extension(content_type);
        let file_name = format!("image-{}.{}", Utc::now().timestamp_millis(), extension);
        let bucket = self.config.images_bucket.clone();
        let public_url = self.store.put(&bucket, &file_name, body, content_type).await?;
        tracing::info!("Uploaded image {} to {}", file_name, bucket);
        Ok(StoredImage {
            file_name,
            bucket,
            public_url,
        })
    }

    /// Delete an image by key. A URL or path is reduced to its last segment.
    pub async fn delete(&self, file_name: Option<&str>) -> AppResult<DeletedFile> {
        let file_name = file_name
            .map(|name| name.rsplit('/').next().unwrap_or(name).trim())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                AppError::Validation(
                    "fileName is required (JSON body, path or query parameter)".to_string(),
                )
            })?
            .to_string();
        let bucket = self.config.images_bucket.clone();
        self.store.delete(&bucket, &file_name).await?;
        tracing::info!("Deleted {} from {}", file_name, bucket);
        Ok(DeletedFile { file_name, bucket })
    }

    /// Store the decoded image as if it had been resized.
    /// No pixels are touched: the reported sizes are those of the original.
    pub async fn resize(&self, request: ResizeRequest) -> AppResult<ResizedImage> {
        let image_data = request
            .image_data
            .filter(|data| !data.is_empty())
            .ok_or_else(|| AppError::Validation("imageData is required".to_string()))?;
        let encoded = DATA_URL_PREFIX.replace(&image_data, "");
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AppError::BadRequest(format!("imageData is not valid base64: {}", e)))?;
        let original_size = bytes.len();

        let key = format!(
            "resized/{}_{}x{}.{}",
            Utc::now().timestamp_millis(),
            request.width,
            request.height,
            request.format
        );
        let content_type = format!("image/{}", request.format);
        let url = self
            .store
            .put(
                &self.config.assets_bucket,
                &key,
                Bytes::from(bytes),
                &content_type,
            )
            .await?;

        Ok(ResizedImage {
            original_size,
            resized_size: original_size,
            dimensions: Dimensions {
                width: request.width,
                height: request.height,
            },
            format: request.format,
            quality: request.quality,
            key,
            url,
        })
    }
}

fn decode_body(body: Bytes, base64: bool) -> AppResult<Bytes> {
    if body.is_empty() {
        return Err(AppError::Validation("No file data provided".to_string()));
    }
    if !base64 {
        return Ok(body);
    }
    let text = std::str::from_utf8(&body)
        .map_err(|_| AppError::BadRequest("base64 body is not text".to_string()))?;
    STANDARD
        .decode(text.trim())
        .map(Bytes::from)
        .map_err(|e| AppError::BadRequest(format!("Body is not valid base64: {}", e)))
}

/// File extension and stored content type for an image upload
fn image_extension(content_type: Option<&str>) -> (&'static str, &'static str) {
    match content_type.map(|ct| ct.split(';').next().unwrap_or(ct).trim()) {
        Some("image/png") => ("png", "image/png"),
        Some("image/gif") => ("gif", "image/gif"),
        Some("image/webp") => ("webp", "image/webp"),
        _ => ("jpg", "image/jpeg"),
    }
}
