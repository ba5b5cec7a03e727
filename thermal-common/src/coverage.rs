//! Ground coverage estimation from capture altitudes
//!
//! Assumes nadir shots. The per-image footprint is a rectangle whose width is
//! set by the camera's horizontal field of view at the mean altitude; the
//! overlap factor scales the summed footprints down to the share of each
//! image that is unique coverage. This is a coarse approximation, not a
//! geometric union of footprints.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Named, versioned camera model used for coverage estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorProfile {
    pub name: String,
    pub version: u32,
    /// Horizontal field of view
    pub fov_degrees: f64,
    /// Image height / width
    pub aspect_ratio: f64,
    /// Fraction of each footprint counted as unique coverage
    pub overlap_factor: f64,
}

impl SensorProfile {
    /// DJI Mavic 2 Enterprise Advanced thermal camera (640x512, 60% overlap)
    pub fn dji_m2ea_thermal() -> Self {
        Self {
            name: "dji-m2ea-thermal".to_string(),
            version: 1,
            fov_degrees: 68.9,
            aspect_ratio: 512.0 / 640.0,
            overlap_factor: 0.4,
        }
    }

    /// `name@version`, as reported alongside estimates
    pub fn label(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// Ground footprint (width, height) in meters of one nadir image
    pub fn footprint_at(&self, altitude_m: f64) -> (f64, f64) {
        let fov_radians = self.fov_degrees.to_radians();
        let width = 2.0 * altitude_m * (fov_radians / 2.0).tan();
        (width, width * self.aspect_ratio)
    }
}

impl Default for SensorProfile {
    fn default() -> Self {
        Self::dji_m2ea_thermal()
    }
}

/// Aggregate coverage for the captures of one pad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub total_images: usize,
    pub coverage_area_m2: f64,
    pub avg_altitude_m: f64,
    pub camera_fov_deg: f64,
    pub sensor_profile: String,
}

/// Estimate ground coverage from per-capture altitudes
///
/// Fails with [`Error::InsufficientData`] when `altitudes` is empty. Zero or
/// negative altitudes are not validated and flow into the estimate as-is.
pub fn estimate_coverage(altitudes: &[f64], profile: &SensorProfile) -> Result<CoverageSummary> {
    if altitudes.is_empty() {
        return Err(Error::InsufficientData(
            "no capture altitudes available for coverage estimate".to_string(),
        ));
    }

    let count = altitudes.len();
    let avg_altitude = altitudes.iter().sum::<f64>() / count as f64;
    let (width, height) = profile.footprint_at(avg_altitude);
    let area_per_image = width * height;

    Ok(CoverageSummary {
        total_images: count,
        coverage_area_m2: area_per_image * count as f64 * profile.overlap_factor,
        avg_altitude_m: avg_altitude,
        camera_fov_deg: profile.fov_degrees,
        sensor_profile: profile.label(),
    })
}
