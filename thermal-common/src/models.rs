//! Dataset models and selectors
//!
//! All numeric fields are `f64`. Field-name and calibration normalization
//! happens in the record store adapter, so nothing here carries optional
//! variants of the same value.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Hierarchy placement of a pad for one acquisition period
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PadSelector {
    pub site: String,
    pub sector: String,
    pub period: String,
    pub pad_id: String,
}

impl PadSelector {
    pub fn new(
        site: impl Into<String>,
        sector: impl Into<String>,
        period: impl Into<String>,
        pad_id: impl Into<String>,
    ) -> Self {
        Self {
            site: site.into(),
            sector: sector.into(),
            period: period.into(),
            pad_id: pad_id.into(),
        }
    }
}

impl fmt::Display for PadSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.site, self.sector, self.period, self.pad_id)
    }
}

/// A pad selector plus the mosaic variant whose outputs are requested
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MosaicSelector {
    pub pad: PadSelector,
    pub variant: MosaicVariant,
}

impl MosaicSelector {
    pub fn new(pad: PadSelector, variant: MosaicVariant) -> Self {
        Self { pad, variant }
    }
}

impl fmt::Display for MosaicSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.pad, self.variant)
    }
}

/// Processing output produced for a pad/period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MosaicVariant {
    /// Plain-color image
    #[default]
    Optical,
    /// Calibrated-temperature color map
    Medical,
    /// Alert-oriented color map
    HotspotAlert,
}

impl MosaicVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            MosaicVariant::Optical => "optical",
            MosaicVariant::Medical => "medical",
            MosaicVariant::HotspotAlert => "hotspot_alert",
        }
    }
}

impl fmt::Display for MosaicVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MosaicVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "optical" => Ok(MosaicVariant::Optical),
            "medical" => Ok(MosaicVariant::Medical),
            "hotspot_alert" => Ok(MosaicVariant::HotspotAlert),
            other => Err(Error::InvalidInput(format!(
                "Unknown mosaic type '{}' (expected optical, medical or hotspot_alert)",
                other
            ))),
        }
    }
}

/// Color palette of a rendered thermal image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    #[default]
    Medical,
    HotspotAlert,
}

impl Palette {
    pub fn as_str(&self) -> &'static str {
        match self {
            Palette::Medical => "medical",
            Palette::HotspotAlert => "hotspot_alert",
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Palette {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "medical" => Ok(Palette::Medical),
            "hotspot_alert" => Ok(Palette::HotspotAlert),
            other => Err(Error::InvalidInput(format!(
                "Unknown palette '{}' (expected medical or hotspot_alert)",
                other
            ))),
        }
    }
}

/// Whether a capture's temperatures have been radiometrically calibrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationStatus {
    #[default]
    Uncalibrated,
    Calibrated,
}

impl FromStr for CalibrationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "calibrated" => Ok(CalibrationStatus::Calibrated),
            "uncalibrated" | "raw" => Ok(CalibrationStatus::Uncalibrated),
            other => Err(Error::SourceUnavailable(format!(
                "Unknown calibration status '{}'",
                other
            ))),
        }
    }
}

/// One physical photograph (paired optical + thermal image)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    pub capture_id: String,
    pub site_id: String,
    pub sector_id: String,
    pub period: String,
    pub pad_id: String,
    pub optical_filename: String,
    pub thermal_filename: String,
    pub altitude_m: f64,
    pub temperature_min: f64,
    /// Calibrated maximum when `calibration_status` is calibrated, sensor maximum otherwise
    pub temperature_max: f64,
    pub calibration_status: CalibrationStatus,
}

/// Radiometric parameters of a thermal capture
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorParams {
    pub emissivity: Option<f64>,
    pub distance: Option<f64>,
    pub reflection: Option<f64>,
    pub ambient_temp: Option<f64>,
    pub humidity: Option<f64>,
}

/// Temperature range across the whole dataset used for color normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetTemperatureRange {
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub mean_temp_c: f64,
    #[serde(default = "default_normalization")]
    pub normalization: String,
    #[serde(default)]
    pub sample_size: i64,
}

fn default_normalization() -> String {
    "unknown".to_string()
}

/// Full capture row as exposed to the image endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureDetail {
    pub record: CaptureRecord,
    /// Sensor maximum, regardless of calibration
    pub raw_temperature_max: f64,
    pub temperature_avg: Option<f64>,
    pub calibrated_avg: Option<f64>,
    pub thermal_params: Option<SensorParams>,
    pub calibration_params: Option<SensorParams>,
    pub optical_key: Option<String>,
    /// Palette name → object key
    pub colored_images: BTreeMap<String, String>,
    pub mosaic_variants: Vec<MosaicVariant>,
    pub dataset_temperature_range: Option<DatasetTemperatureRange>,
}

impl CaptureDetail {
    pub fn colored_image_key(&self, palette: Palette) -> Option<&str> {
        self.colored_images.get(palette.as_str()).map(String::as_str)
    }
}

/// Pad listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadRecord {
    pub pad_id: String,
    pub site: String,
    pub sector: String,
    pub pad_name: String,
    pub geo_location_area: serde_json::Value,
}

/// Pad name derived from a pad id when the record carries none
///
/// `leyte_malitbog_PAD_msb` → `msb`; ids without the marker are returned whole.
pub fn pad_name_from_id(pad_id: &str) -> String {
    pad_id
        .rsplit("_PAD_")
        .next()
        .unwrap_or(pad_id)
        .to_string()
}

/// Pipe measurement for one pad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub measurement_id: String,
    pub site_id: String,
    pub sector_id: String,
    pub period: String,
    pub pad_id: String,
    pub aggregate_stats: serde_json::Value,
    pub region_measurements: serde_json::Value,
    pub geo_bounds: Option<serde_json::Value>,
    pub processing_params: Option<serde_json::Value>,
}
