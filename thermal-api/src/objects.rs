//! Filesystem-backed object store
//!
//! Objects live under a bucket directory, addressed by `/`-separated keys.
//! Binary assets are never streamed through the JSON API; clients receive a
//! signed `/objects/...` URL instead.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thermal_common::geojson::{parse_feature_collection, FeatureCollection};
use thermal_common::keys::{shots_key, validate_key};
use thermal_common::models::MosaicSelector;
use thermal_common::signing::{SignatureError, UrlSigner};
use thermal_common::sources::FeatureSource;
use thermal_common::{Error, Result};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct FsObjectStore {
    root: PathBuf,
    signer: Arc<UrlSigner>,
    url_ttl: Duration,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>, signer: UrlSigner, url_ttl: Duration) -> Self {
        Self {
            root: root.into(),
            signer: Arc::new(signer),
            url_ttl,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    /// Object content; a missing object is [`Error::NotFound`]
    pub async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("Object not found: {}", key)))
            }
            Err(e) => Err(Error::SourceUnavailable(format!(
                "Cannot read object {}: {}",
                key, e
            ))),
        }
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::SourceUnavailable(format!(
                "Cannot stat object {}: {}",
                key, e
            ))),
        }
    }

    /// Time-limited URL for `key`
    pub fn presign(&self, key: &str) -> Result<String> {
        let url = self
            .signer
            .presign(key, self.url_ttl, chrono::Utc::now().timestamp())?;
        debug!("Issued signed URL for {}", key);
        Ok(url)
    }

    /// Check a signed URL's parameters against the current time
    pub fn verify(
        &self,
        key: &str,
        expires_at: i64,
        signature: &str,
    ) -> std::result::Result<(), SignatureError> {
        self.signer
            .verify(key, expires_at, signature, chrono::Utc::now().timestamp())
    }
}

#[async_trait]
impl FeatureSource for FsObjectStore {
    async fn fetch_feature_collection(&self, mosaic: &MosaicSelector) -> Result<FeatureCollection> {
        let key = shots_key(mosaic);
        let bytes = self.get(&key).await.map_err(|e| match e {
            Error::NotFound(_) => {
                Error::SourceUnavailable(format!("Camera feed not found: {}", key))
            }
            Error::SourceUnavailable(msg) => Error::SourceUnavailable(msg),
            // Selector segments outside the key alphabet
            Error::InvalidInput(msg) => Error::InvalidInput(msg),
            other => Error::SourceUnavailable(other.to_string()),
        })?;
        parse_feature_collection(&bytes)
    }
}

/// Content type served for an object key, by extension
pub fn content_type_for(key: &str) -> &'static str {
    let extension = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "tif" | "tiff" => "image/tiff",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "geojson" => "application/geo+json",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}
