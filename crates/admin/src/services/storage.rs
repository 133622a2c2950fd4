//! Object storage client for product images.
//!
//! Thin reqwest client over the storage provider's HTTP API. Images live
//! in the public `product-images` bucket; an upload returns the public
//! URL that goes straight into the product's `images` array.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::config::StorageConfig;

/// Bucket for product images.
const BUCKET: &str = "product-images";

/// Errors from object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP transport failed.
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage service answered with an error status.
    #[error("storage service error ({status}): {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The uploaded file has a type the bucket does not accept.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
}

/// Content types the bucket accepts, with their extensions.
const ACCEPTED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/avif", "avif"),
];

/// Client for the object storage HTTP API.
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    service_key: SecretString,
}

impl StorageClient {
    /// Create a storage client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: &StorageConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        })
    }

    /// Upload an image and return its public URL.
    ///
    /// The object key is a fresh UUID with the extension derived from the
    /// content type, so re-uploading a file never overwrites an image an
    /// order snapshot may still reference.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::UnsupportedContentType` for anything that is
    /// not an accepted image type, `Upstream` when the service rejects the
    /// upload.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(
        &self,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let extension = ACCEPTED_TYPES
            .iter()
            .find(|(t, _)| *t == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| StorageError::UnsupportedContentType(content_type.to_string()))?;

        let path = format!("{}.{extension}", Uuid::new_v4());
        let url = format!("{}/storage/v1/object/{BUCKET}/{path}", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.service_key.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        Ok(format!(
            "{}/storage/v1/object/public/{BUCKET}/{path}",
            self.base_url
        ))
    }

    /// Delete an image by its public URL. Unknown URLs are ignored so a
    /// product edit that drops a hand-entered external URL still saves.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Upstream` when the service rejects the
    /// deletion of an object it owns.
    #[instrument(skip(self))]
    pub async fn delete(&self, public_url: &str) -> Result<(), StorageError> {
        let prefix = format!("{}/storage/v1/object/public/{BUCKET}/", self.base_url);
        let Some(path) = public_url.strip_prefix(&prefix) else {
            return Ok(());
        };

        let url = format!("{}/storage/v1/object/{BUCKET}/{path}", self.base_url);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(self.service_key.expose_secret())
            .send()
            .await?;

        // A missing object is already the state we want.
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND
        {
            return Err(Self::upstream_error(response).await);
        }

        Ok(())
    }

    async fn upstream_error(response: reqwest::Response) -> StorageError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        StorageError::Upstream { status, body }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> StorageClient {
        let config = StorageConfig {
            url: "https://storage.example.com/".to_string(),
            service_key: SecretString::from("k".repeat(48)),
        };
        StorageClient::new(&config).unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(client().base_url, "https://storage.example.com");
    }

    #[test]
    fn unknown_content_type_is_rejected_before_any_request() {
        let err = futures_block(client().upload("application/pdf", vec![1, 2, 3])).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedContentType(_)));
    }

    #[test]
    fn deleting_an_external_url_is_a_no_op() {
        assert!(futures_block(client().delete("https://cdn.example.com/banner.jpg")).is_ok());
    }

    fn futures_block<F: Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(fut)
    }
}
