//! Per-capture image links and thermal statistics

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use thermal_common::models::{
    CalibrationStatus, CaptureDetail, DatasetTemperatureRange, Palette, SensorParams,
};
use tracing::info;

use super::params::non_empty;
use super::SignedUrlResponse;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PaletteQuery {
    pub palette: Option<String>,
}

/// Temperature statistics of one capture
///
/// Calibrated captures report the calibrated maximum and average together
/// with the calibration parameters; others report sensor values and the
/// original radiometric parameters.
#[derive(Debug, Serialize)]
pub struct ThermalStats {
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: Option<f64>,
    pub is_calibrated: bool,
    pub palette: Palette,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_params: Option<SensorParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_params: Option<SensorParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_temperature_range: Option<DatasetTemperatureRange>,
}

impl ThermalStats {
    pub fn from_capture(capture: CaptureDetail) -> Self {
        let record = &capture.record;
        match record.calibration_status {
            CalibrationStatus::Calibrated => Self {
                min_temp: record.temperature_min,
                max_temp: record.temperature_max,
                avg_temp: capture.calibrated_avg,
                is_calibrated: true,
                palette: Palette::Medical,
                calibration_params: Some(capture.calibration_params.unwrap_or_default()),
                original_params: None,
                dataset_temperature_range: capture.dataset_temperature_range,
            },
            CalibrationStatus::Uncalibrated => Self {
                min_temp: record.temperature_min,
                max_temp: capture.raw_temperature_max,
                avg_temp: capture.temperature_avg,
                is_calibrated: false,
                palette: Palette::Medical,
                calibration_params: None,
                original_params: Some(capture.thermal_params.unwrap_or_default()),
                dataset_temperature_range: capture.dataset_temperature_range,
            },
        }
    }
}

async fn load_capture(state: &AppState, capture_id: &str) -> ApiResult<CaptureDetail> {
    state
        .records
        .get_capture(capture_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Capture not found: {}", capture_id)))
}

/// GET /api/optical/:capture_id
pub async fn get_optical_image(
    State(state): State<AppState>,
    Path(capture_id): Path<String>,
) -> ApiResult<Json<SignedUrlResponse>> {
    let capture = load_capture(&state, &capture_id).await?;
    let key = capture.optical_key.as_deref().ok_or_else(|| {
        ApiError::NotFound(format!("No optical image for capture {}", capture_id))
    })?;

    let url = state.objects.presign(key)?;
    Ok(Json(SignedUrlResponse { url }))
}

/// GET /api/thermal/:capture_id?palette=
///
/// Palette defaults to `medical`.
pub async fn get_thermal_image(
    State(state): State<AppState>,
    Path(capture_id): Path<String>,
    Query(query): Query<PaletteQuery>,
) -> ApiResult<Json<SignedUrlResponse>> {
    let palette = match non_empty(&query.palette) {
        Some(raw) => raw.parse::<Palette>()?,
        None => Palette::default(),
    };

    let capture = load_capture(&state, &capture_id).await?;
    let key = capture.colored_image_key(palette).ok_or_else(|| {
        ApiError::NotFound(format!(
            "No {} thermal image for capture {}",
            palette, capture_id
        ))
    })?;

    let url = state.objects.presign(key)?;
    Ok(Json(SignedUrlResponse { url }))
}

/// GET /api/thermal/:capture_id/stats
pub async fn get_thermal_stats(
    State(state): State<AppState>,
    Path(capture_id): Path<String>,
) -> ApiResult<Json<ThermalStats>> {
    let capture = load_capture(&state, &capture_id).await?;
    let stats = ThermalStats::from_capture(capture);
    info!(
        "Retrieved thermal stats for {} (calibrated: {})",
        capture_id, stats.is_calibrated
    );
    Ok(Json(stats))
}
