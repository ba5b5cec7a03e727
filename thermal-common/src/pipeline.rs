//! Selector-level operations exposed to the routing layer
//!
//! Each operation issues one logical read per collaborator and then runs the
//! pure computation over the result.

use crate::coverage::{estimate_coverage, CoverageSummary, SensorProfile};
use crate::enrich::{enrich_features, Enrichment};
use crate::models::{MosaicSelector, PadSelector};
use crate::sources::{CaptureSource, FeatureSource};
use crate::{Error, Result};
use tracing::{debug, info, warn};

/// Camera positions of a pad, joined with its capture records
pub async fn enrich_camera_positions<C, F>(
    mosaic: &MosaicSelector,
    captures: &C,
    features: &F,
) -> Result<Enrichment>
where
    C: CaptureSource + ?Sized,
    F: FeatureSource + ?Sized,
{
    let collection = features.fetch_feature_collection(mosaic).await?;
    let records = captures.query_capture_records(&mosaic.pad).await?;
    debug!(
        "Joining {} camera positions against {} capture records for {}",
        collection.len(),
        records.len(),
        mosaic
    );

    let enrichment = enrich_features(collection, &records);

    if !enrichment.unmatched.is_empty() {
        warn!(
            "{} of {} camera positions for {} have no capture record (first: {})",
            enrichment.unmatched.len(),
            enrichment.collection.len(),
            mosaic,
            enrichment.unmatched[0]
        );
    }
    info!(
        "Retrieved {} camera positions for {}",
        enrichment.collection.len(),
        mosaic
    );

    Ok(enrichment)
}

/// Coverage estimate over the capture altitudes of a pad
pub async fn estimate_pad_coverage<C>(
    pad: &PadSelector,
    captures: &C,
    profile: &SensorProfile,
) -> Result<CoverageSummary>
where
    C: CaptureSource + ?Sized,
{
    let altitudes: Vec<f64> = captures
        .query_capture_records(pad)
        .await?
        .iter()
        .map(|record| record.altitude_m)
        .collect();

    estimate_coverage(&altitudes, profile).map_err(|e| match e {
        Error::InsufficientData(_) => {
            Error::InsufficientData(format!("no captures recorded for pad {}", pad))
        }
        other => other,
    })
}
