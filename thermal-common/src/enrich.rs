//! Camera-position enrichment
//!
//! Joins the photogrammetry camera feed against capture records by optical
//! filename and derives a compass heading from each camera's rotation.

use crate::geojson::{EnrichedCollection, EnrichedProperties, Feature, FeatureCollection};
use crate::models::CaptureRecord;
use std::collections::HashMap;
use std::f64::consts::TAU;

/// Result of joining a camera feed against capture records
#[derive(Debug, Clone)]
pub struct Enrichment {
    /// One output feature per input feature, in input order
    pub collection: EnrichedCollection,
    /// Filenames of features that matched no capture record, in feed order
    pub unmatched: Vec<String>,
}

impl Enrichment {
    pub fn matched_count(&self) -> usize {
        self.collection.len() - self.unmatched.len()
    }
}

/// Index capture records by optical filename
///
/// When a filename recurs, the record appearing later in `records` wins.
pub fn build_capture_index(records: &[CaptureRecord]) -> HashMap<&str, &CaptureRecord> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        index.insert(record.optical_filename.as_str(), record);
    }
    index
}

/// Property names written by enrichment; raw values under these names are replaced
const RECORD_KEYS: [&str; 5] = [
    "capture_id",
    "thermal_filename",
    "altitude",
    "temperature_min",
    "temperature_max",
];
const YAW_KEY: &str = "yaw_degrees";

/// Camera heading in degrees, normalized into `[0, 360)`
pub fn yaw_degrees(yaw_radians: f64) -> f64 {
    let degrees = yaw_radians.rem_euclid(TAU).to_degrees();
    // rem_euclid can round up to exactly TAU for tiny negative inputs, and
    // keeps the sign of a zero remainder
    if degrees >= 360.0 || degrees == 0.0 {
        0.0
    } else {
        degrees
    }
}

/// Enrich every feature of `collection` with its matching capture record
///
/// Unmatched features are kept unchanged (apart from `yaw_degrees`) and their
/// filenames reported in [`Enrichment::unmatched`]. A raw property that shares
/// a name with an attached field is dropped in favor of the attached value.
pub fn enrich_features(collection: FeatureCollection, records: &[CaptureRecord]) -> Enrichment {
    let index = build_capture_index(records);
    let mut unmatched = Vec::new();

    let features = collection
        .features
        .into_iter()
        .map(|mut feature| {
            let yaw = feature.properties.rotation.map(|r| yaw_degrees(r[0]));
            if yaw.is_some() {
                feature.properties.other.remove(YAW_KEY);
            }

            let mut properties = match index.get(feature.properties.filename.as_str()) {
                Some(record) => {
                    for key in RECORD_KEYS {
                        feature.properties.other.remove(key);
                    }
                    EnrichedProperties {
                        capture_id: Some(record.capture_id.clone()),
                        thermal_filename: Some(record.thermal_filename.clone()),
                        altitude: Some(record.altitude_m),
                        temperature_min: Some(record.temperature_min),
                        temperature_max: Some(record.temperature_max),
                        ..EnrichedProperties::passthrough(feature.properties)
                    }
                }
                None => {
                    unmatched.push(feature.properties.filename.clone());
                    EnrichedProperties::passthrough(feature.properties)
                }
            };
            properties.yaw_degrees = yaw;

            Feature {
                kind: feature.kind,
                geometry: feature.geometry,
                properties,
                foreign_members: feature.foreign_members,
            }
        })
        .collect();

    Enrichment {
        collection: FeatureCollection {
            kind: collection.kind,
            features,
            foreign_members: collection.foreign_members,
        },
        unmatched,
    }
}
