//! GeoJSON camera-position feed types
//!
//! The feed is a `FeatureCollection` of `Point` features, one per camera
//! trigger, with `filename` and `rotation` properties. Unknown members and
//! properties are carried through untouched.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollectionKind {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureKind {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeometryKind {
    #[default]
    Point,
}

/// `[longitude, latitude]` or `[longitude, latitude, altitude]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    pub coordinates: Vec<f64>,
}

impl PointGeometry {
    pub fn new(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            kind: GeometryKind::Point,
            coordinates: vec![longitude, latitude, altitude],
        }
    }

    pub fn altitude(&self) -> Option<f64> {
        self.coordinates.get(2).copied()
    }
}

/// Raw per-capture properties as written by the photogrammetry pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub filename: String,
    /// Yaw, pitch, roll in radians
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Raw properties extended with capture metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedProperties {
    #[serde(flatten)]
    pub raw: FeatureProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thermal_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaw_degrees: Option<f64>,
}

impl EnrichedProperties {
    /// Properties with no enrichment attached yet
    pub fn passthrough(raw: FeatureProperties) -> Self {
        Self {
            raw,
            capture_id: None,
            thermal_filename: None,
            altitude: None,
            temperature_min: None,
            temperature_max: None,
            yaw_degrees: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.capture_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature<P = FeatureProperties> {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub geometry: PointGeometry,
    pub properties: P,
    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

impl Feature {
    pub fn point(geometry: PointGeometry, properties: FeatureProperties) -> Self {
        Self {
            kind: FeatureKind::Feature,
            geometry,
            properties,
            foreign_members: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection<P = FeatureProperties> {
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    pub features: Vec<Feature<P>>,
    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

impl<P> FeatureCollection<P> {
    pub fn new(features: Vec<Feature<P>>) -> Self {
        Self {
            kind: CollectionKind::FeatureCollection,
            features,
            foreign_members: Map::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

pub type EnrichedCollection = FeatureCollection<EnrichedProperties>;

/// Parse a camera-position feed
///
/// Any structural problem (not JSON, wrong `type`, missing geometry or
/// properties, non-point geometry, fewer than two coordinates) is reported as
/// [`Error::SourceUnavailable`].
pub fn parse_feature_collection(bytes: &[u8]) -> Result<FeatureCollection> {
    let collection: FeatureCollection = serde_json::from_slice(bytes)
        .map_err(|e| Error::SourceUnavailable(format!("Malformed camera feed: {}", e)))?;

    for (index, feature) in collection.features.iter().enumerate() {
        let n = feature.geometry.coordinates.len();
        if !(2..=3).contains(&n) {
            return Err(Error::SourceUnavailable(format!(
                "Malformed camera feed: feature {} ({}) has {} coordinates",
                index, feature.properties.filename, n
            )));
        }
    }

    Ok(collection)
}
