//! S3 object store (AWS or an S3-compatible endpoint such as LocalStack)

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::Region, error::DisplayErrorContext, primitives::ByteStream, Client,
};
use axum::body::Bytes;

use super::{public_url, ObjectStore};
use crate::{
    config::ObjectStoreConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build the client from configuration; credentials come from the usual
    /// AWS provider chain (environment, profile, instance role).
    pub async fn from_config(config: &ObjectStoreConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            public_base_url: config.public_base_url.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> AppResult<String> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::ObjectStore(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!("Stored s3://{}/{}", bucket, key);
        Ok(public_url(&self.public_base_url, bucket, key))
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        // DeleteObject succeeds on missing keys, so check with HEAD first
        if let Err(e) = self.client.head_object().bucket(bucket).key(key).send().await {
            if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                return Err(AppError::NotFound(format!(
                    "File {} not found in {}",
                    key, bucket
                )));
            }
            return Err(AppError::ObjectStore(DisplayErrorContext(&e).to_string()));
        }

        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::ObjectStore(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        self.client
            .list_buckets()
            .send()
            .await
            .map_err(|e| AppError::ObjectStore(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
