//! Pipe measurement endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use thermal_common::models::{Measurement, PadSelector};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MeasurementPath {
    pub site: String,
    pub sector: String,
    pub period: String,
    pub pad_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SectorPath {
    pub site: String,
    pub sector: String,
    pub period: String,
}

#[derive(Debug, Serialize)]
pub struct SectorMeasurements {
    pub site: String,
    pub sector: String,
    pub period: String,
    pub count: usize,
    pub measurements: Vec<Measurement>,
}

/// GET /api/pipemeasure/measurement/:site/:sector/:period/:pad_id
pub async fn get_pipe_measurement(
    State(state): State<AppState>,
    Path(path): Path<MeasurementPath>,
) -> ApiResult<Json<Measurement>> {
    let pad = PadSelector::new(path.site, path.sector, path.period, path.pad_id);
    state
        .records
        .get_measurement(&pad)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No measurement data available for PAD: {}",
                pad.pad_id
            ))
        })
}

/// GET /api/pipemeasure/measurements/:site/:sector/:period
///
/// Every pad's measurement for the sector and period; an empty list is not an error.
pub async fn get_sector_measurements(
    State(state): State<AppState>,
    Path(path): Path<SectorPath>,
) -> ApiResult<Json<SectorMeasurements>> {
    let measurements = state
        .records
        .list_measurements(&path.site, &path.sector, &path.period)
        .await?;

    info!(
        "Retrieved {} measurements for {}/{}/{}",
        measurements.len(),
        path.site,
        path.sector,
        path.period
    );

    Ok(Json(SectorMeasurements {
        count: measurements.len(),
        site: path.site,
        sector: path.sector,
        period: path.period,
        measurements,
    }))
}
