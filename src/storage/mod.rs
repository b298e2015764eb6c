//! Object storage for uploaded files

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::error::AppResult;

/// Blob storage addressed by bucket and key
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Store an object and return its public URL
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> AppResult<String>;

    /// Remove an object. Fails with `NotFound` when it does not exist.
    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()>;

    async fn ping(&self) -> AppResult<()>;
}

/// Path-style public URL of an object
pub fn public_url(base_url: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), bucket, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_trims_trailing_slash() {
        assert_eq!(
            public_url("http://localhost:4566/", "images", "image-1.jpg"),
            "http://localhost:4566/images/image-1.jpg"
        );
    }
}
