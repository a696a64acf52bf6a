//! `BlobStore` trait with HTTP and local-filesystem backends.
//!
//! Every backend returns the public URL of the stored object:
//! `{cdn_base}{key}`.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{StorageBackend, StorageConfig};
use crate::pipeline::error::ExternalError;

/// Async capability: persist bytes under `key` and return their URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, bytes: Vec<u8>, key: &str, content_type: &str) -> Result<String, ExternalError>;
}

/// Build the backend selected in `config`.
pub fn store_from_config(config: &StorageConfig) -> Arc<dyn BlobStore> {
    match config.backend {
        StorageBackend::Local => Arc::new(LocalBlobStore::new(&config.local_dir, &config.cdn_base)),
        StorageBackend::Http => Arc::new(HttpBlobStore::from_config(config)),
    }
}

fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}

// ---------------------------------------------------------------------------
// HttpBlobStore
// ---------------------------------------------------------------------------

/// Uploads with `PUT {upload_url}/{key}`.
pub struct HttpBlobStore {
    client: reqwest::Client,
    upload_url: String,
    token: Option<String>,
    cdn_base: String,
}

impl HttpBlobStore {
    pub fn from_config(config: &StorageConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            upload_url: config.upload_url.clone(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            cdn_base: config.cdn_base.clone(),
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(&self, bytes: Vec<u8>, key: &str, content_type: &str) -> Result<String, ExternalError> {
        let size = bytes.len();
        let mut req = self
            .client
            .put(public_url(&self.upload_url, key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        req.send().await?.error_for_status()?;
        log::debug!("store: uploaded {key} ({size} bytes, {content_type})");
        Ok(public_url(&self.cdn_base, key))
    }
}

// ---------------------------------------------------------------------------
// LocalBlobStore
// ---------------------------------------------------------------------------

/// Writes objects below a root directory, mirroring the key layout.
pub struct LocalBlobStore {
    root: PathBuf,
    cdn_base: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, cdn_base: &str) -> Self {
        Self {
            root: root.into(),
            cdn_base: cdn_base.to_string(),
        }
    }

    /// Filesystem path for `key`; keys escaping the root are rejected.
    fn path_for(&self, key: &str) -> Result<PathBuf, ExternalError> {
        let relative = Path::new(key.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || key.trim().is_empty() {
            return Err(ExternalError::Io(format!("invalid object key `{key}`")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, bytes: Vec<u8>, key: &str, content_type: &str) -> Result<String, ExternalError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        log::debug!("store: wrote {} ({} bytes, {content_type})", path.display(), bytes.len());
        Ok(public_url(&self.cdn_base, key))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
