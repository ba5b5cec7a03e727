//! Collaborator capabilities consumed by the pipeline
//!
//! Implementations map every backend failure to
//! [`Error::SourceUnavailable`](crate::Error::SourceUnavailable) and do not
//! retry.

use crate::geojson::FeatureCollection;
use crate::models::{CaptureRecord, MosaicSelector, PadSelector};
use crate::Result;
use async_trait::async_trait;

/// Record store query for the captures of one pad
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Capture records of `pad` in store order; empty when the pad has none
    async fn query_capture_records(&self, pad: &PadSelector) -> Result<Vec<CaptureRecord>>;
}

/// Object store fetch of a pad's camera-position feed
#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Parsed feed; a missing or malformed object is `SourceUnavailable`
    async fn fetch_feature_collection(&self, mosaic: &MosaicSelector)
        -> Result<FeatureCollection>;
}
