//! SQLite record store adapter
//!
//! Maps rows to the mandatory-field models. Calibration selection and JSON
//! column decoding happen here, and every query failure or inconsistent row
//! surfaces as [`Error::SourceUnavailable`].

use crate::models::{
    pad_name_from_id, CalibrationStatus, CaptureDetail, CaptureRecord, DatasetTemperatureRange,
    Measurement, MosaicVariant, PadRecord, PadSelector, SensorParams,
};
use crate::sources::CaptureSource;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sqlx::{FromRow, SqlitePool};
use std::collections::BTreeMap;
use tracing::debug;

const CAPTURE_COLUMNS: &str = "capture_id, site_id, sector_id, period, pad_id, \
     optical_filename, thermal_filename, altitude_m, temperature_min, temperature_max, \
     temperature_avg, calibration_status, calibrated_max, calibrated_avg, thermal_params, \
     calibration_params, optical_key, colored_images, mosaic_variants, dataset_temperature_range";

const MEASUREMENT_COLUMNS: &str = "measurement_id, site_id, sector_id, period, pad_id, \
     aggregate_stats, region_measurements, geo_bounds, processing_params";

#[derive(Debug, FromRow)]
struct CaptureRow {
    capture_id: String,
    site_id: String,
    sector_id: String,
    period: String,
    pad_id: String,
    optical_filename: String,
    thermal_filename: String,
    altitude_m: f64,
    temperature_min: f64,
    temperature_max: f64,
    temperature_avg: Option<f64>,
    calibration_status: String,
    calibrated_max: Option<f64>,
    calibrated_avg: Option<f64>,
    thermal_params: Option<String>,
    calibration_params: Option<String>,
    optical_key: Option<String>,
    colored_images: String,
    mosaic_variants: String,
    dataset_temperature_range: Option<String>,
}

impl CaptureRow {
    fn to_record(&self) -> Result<CaptureRecord> {
        let calibration_status: CalibrationStatus = self.calibration_status.parse()?;
        let temperature_max = match calibration_status {
            CalibrationStatus::Calibrated => self.calibrated_max.ok_or_else(|| {
                Error::SourceUnavailable(format!(
                    "Capture {} is calibrated but has no calibrated maximum",
                    self.capture_id
                ))
            })?,
            CalibrationStatus::Uncalibrated => self.temperature_max,
        };

        Ok(CaptureRecord {
            capture_id: self.capture_id.clone(),
            site_id: self.site_id.clone(),
            sector_id: self.sector_id.clone(),
            period: self.period.clone(),
            pad_id: self.pad_id.clone(),
            optical_filename: self.optical_filename.clone(),
            thermal_filename: self.thermal_filename.clone(),
            altitude_m: self.altitude_m,
            temperature_min: self.temperature_min,
            temperature_max,
            calibration_status,
        })
    }

    fn into_detail(self) -> Result<CaptureDetail> {
        let record = self.to_record()?;
        let id = &self.capture_id;

        let thermal_params = decode_optional::<SensorParams>(id, "thermal_params", &self.thermal_params)?;
        let calibration_params =
            decode_optional::<SensorParams>(id, "calibration_params", &self.calibration_params)?;
        let colored_images =
            decode_json::<BTreeMap<String, String>>(id, "colored_images", &self.colored_images)?;
        let mosaic_variants =
            decode_json::<Vec<MosaicVariant>>(id, "mosaic_variants", &self.mosaic_variants)?;
        let dataset_temperature_range = decode_optional::<DatasetTemperatureRange>(
            id,
            "dataset_temperature_range",
            &self.dataset_temperature_range,
        )?;

        Ok(CaptureDetail {
            record,
            raw_temperature_max: self.temperature_max,
            temperature_avg: self.temperature_avg,
            calibrated_avg: self.calibrated_avg,
            thermal_params,
            calibration_params,
            optical_key: self.optical_key,
            colored_images,
            mosaic_variants,
            dataset_temperature_range,
        })
    }
}

#[derive(Debug, FromRow)]
struct MeasurementRow {
    measurement_id: String,
    site_id: String,
    sector_id: String,
    period: String,
    pad_id: String,
    aggregate_stats: String,
    region_measurements: String,
    geo_bounds: Option<String>,
    processing_params: Option<String>,
}

impl MeasurementRow {
    fn into_measurement(self) -> Result<Measurement> {
        let id = &self.measurement_id;
        Ok(Measurement {
            aggregate_stats: decode_json(id, "aggregate_stats", &self.aggregate_stats)?,
            region_measurements: decode_json(id, "region_measurements", &self.region_measurements)?,
            geo_bounds: decode_optional(id, "geo_bounds", &self.geo_bounds)?,
            processing_params: decode_optional(id, "processing_params", &self.processing_params)?,
            measurement_id: self.measurement_id,
            site_id: self.site_id,
            sector_id: self.sector_id,
            period: self.period,
            pad_id: self.pad_id,
        })
    }
}

fn decode_json<T: DeserializeOwned>(row_id: &str, column: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| {
        Error::SourceUnavailable(format!("Malformed {} for {}: {}", column, row_id, e))
    })
}

fn decode_optional<T: DeserializeOwned>(
    row_id: &str,
    column: &str,
    raw: &Option<String>,
) -> Result<Option<T>> {
    raw.as_deref()
        .map(|value| decode_json(row_id, column, value))
        .transpose()
}

/// Read-side access to the pads, captures and measurements tables
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Single capture by primary key
    pub async fn get_capture(&self, capture_id: &str) -> Result<Option<CaptureDetail>> {
        let sql = format!("SELECT {} FROM captures WHERE capture_id = ?", CAPTURE_COLUMNS);
        let row: Option<CaptureRow> = sqlx::query_as(&sql)
            .bind(capture_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::unavailable)?;

        row.map(CaptureRow::into_detail).transpose()
    }

    /// Full capture rows of a pad, in store order
    pub async fn query_capture_details(&self, pad: &PadSelector) -> Result<Vec<CaptureDetail>> {
        self.fetch_capture_rows(pad)
            .await?
            .into_iter()
            .map(CaptureRow::into_detail)
            .collect()
    }

    pub async fn count_captures(&self, pad: &PadSelector) -> Result<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM captures
             WHERE site_id = ? AND sector_id = ? AND period = ? AND pad_id = ?",
        )
        .bind(&pad.site)
        .bind(&pad.sector)
        .bind(&pad.period)
        .bind(&pad.pad_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::unavailable)
    }

    /// Distinct sites, ascending
    pub async fn list_sites(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT DISTINCT site FROM pads ORDER BY site ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::unavailable)
    }

    /// Distinct sectors of a site, ascending
    pub async fn list_sectors(&self, site: &str) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT DISTINCT sector FROM pads WHERE site = ? ORDER BY sector ASC")
            .bind(site)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::unavailable)
    }

    /// Distinct periods with captures in a site/sector, most recent first
    pub async fn list_periods(&self, site: &str, sector: &str) -> Result<Vec<String>> {
        sqlx::query_scalar(
            "SELECT DISTINCT period FROM captures
             WHERE site_id = ? AND sector_id = ?
             ORDER BY period DESC",
        )
        .bind(site)
        .bind(sector)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::unavailable)
    }

    /// Pads of a site/sector, sorted by display name
    pub async fn list_pads(&self, site: &str, sector: &str) -> Result<Vec<PadRecord>> {
        let rows: Vec<(String, String, String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT pad_id, site, sector, pad_name, geo_location_area FROM pads
             WHERE site = ? AND sector = ?",
        )
        .bind(site)
        .bind(sector)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::unavailable)?;

        let mut pads = rows
            .into_iter()
            .map(|(pad_id, site, sector, pad_name, area)| -> Result<PadRecord> {
                let geo_location_area = decode_optional(&pad_id, "geo_location_area", &area)?
                    .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));
                Ok(PadRecord {
                    pad_name: pad_name.unwrap_or_else(|| pad_name_from_id(&pad_id)),
                    pad_id,
                    site,
                    sector,
                    geo_location_area,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        pads.sort_by(|a, b| a.pad_name.cmp(&b.pad_name));
        Ok(pads)
    }

    /// Pipe measurement of one pad
    pub async fn get_measurement(&self, pad: &PadSelector) -> Result<Option<Measurement>> {
        let sql = format!(
            "SELECT {} FROM measurements
             WHERE site_id = ? AND sector_id = ? AND period = ? AND pad_id = ?
             LIMIT 1",
            MEASUREMENT_COLUMNS
        );
        let row: Option<MeasurementRow> = sqlx::query_as(&sql)
            .bind(&pad.site)
            .bind(&pad.sector)
            .bind(&pad.period)
            .bind(&pad.pad_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::unavailable)?;

        row.map(MeasurementRow::into_measurement).transpose()
    }

    /// All pipe measurements of a sector/period, ordered by pad
    pub async fn list_measurements(
        &self,
        site: &str,
        sector: &str,
        period: &str,
    ) -> Result<Vec<Measurement>> {
        let sql = format!(
            "SELECT {} FROM measurements
             WHERE site_id = ? AND sector_id = ? AND period = ?
             ORDER BY pad_id ASC",
            MEASUREMENT_COLUMNS
        );
        let rows: Vec<MeasurementRow> = sqlx::query_as(&sql)
            .bind(site)
            .bind(sector)
            .bind(period)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::unavailable)?;

        rows.into_iter().map(MeasurementRow::into_measurement).collect()
    }

    async fn fetch_capture_rows(&self, pad: &PadSelector) -> Result<Vec<CaptureRow>> {
        let sql = format!(
            "SELECT {} FROM captures
             WHERE site_id = ? AND sector_id = ? AND period = ? AND pad_id = ?
             ORDER BY rowid ASC",
            CAPTURE_COLUMNS
        );
        let rows: Vec<CaptureRow> = sqlx::query_as(&sql)
            .bind(&pad.site)
            .bind(&pad.sector)
            .bind(&pad.period)
            .bind(&pad.pad_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::unavailable)?;

        debug!("Fetched {} capture rows for {}", rows.len(), pad);
        Ok(rows)
    }
}

#[async_trait]
impl CaptureSource for SqliteRecordStore {
    async fn query_capture_records(&self, pad: &PadSelector) -> Result<Vec<CaptureRecord>> {
        self.fetch_capture_rows(pad)
            .await?
            .iter()
            .map(CaptureRow::to_record)
            .collect()
    }
}
