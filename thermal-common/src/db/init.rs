//! Record store schema
//!
//! The API only ever reads these tables. Creation lives here so ingestion
//! tooling and tests build exactly the layout the adapter queries.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Open (creating if needed) a record store at `db_path` and ensure its schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new record store: {}", db_path.display());
    } else {
        info!("Opened existing record store: {}", db_path.display());
    }

    // Rollback journal (not WAL) so read-only connections need no -shm file
    sqlx::query("PRAGMA journal_mode = DELETE")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all record store tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_pads_table(pool).await?;
    create_captures_table(pool).await?;
    create_measurements_table(pool).await?;
    Ok(())
}

async fn create_pads_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pads (
            pad_id TEXT PRIMARY KEY,
            site TEXT NOT NULL,
            sector TEXT NOT NULL,
            pad_name TEXT,
            geo_location_area TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_pads_site_sector ON pads(site, sector)")
        .execute(pool)
        .await?;

    Ok(())
}

/// One row per capture
///
/// `temperature_min`/`temperature_max` are sensor values. `calibrated_max` and
/// `calibrated_avg` are set once `calibration_status` is `calibrated`.
/// JSON columns: `thermal_params`, `calibration_params` (SensorParams),
/// `colored_images` (palette → key), `mosaic_variants` (array),
/// `dataset_temperature_range`.
async fn create_captures_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS captures (
            capture_id TEXT PRIMARY KEY,
            site_id TEXT NOT NULL,
            sector_id TEXT NOT NULL,
            period TEXT NOT NULL,
            pad_id TEXT NOT NULL,
            optical_filename TEXT NOT NULL,
            thermal_filename TEXT NOT NULL DEFAULT '',
            altitude_m REAL NOT NULL,
            temperature_min REAL NOT NULL,
            temperature_max REAL NOT NULL,
            temperature_avg REAL,
            calibration_status TEXT NOT NULL DEFAULT 'uncalibrated',
            calibrated_max REAL,
            calibrated_avg REAL,
            thermal_params TEXT,
            calibration_params TEXT,
            optical_key TEXT,
            colored_images TEXT NOT NULL DEFAULT '{}',
            mosaic_variants TEXT NOT NULL DEFAULT '[]',
            dataset_temperature_range TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_captures_pad ON captures(site_id, sector_id, period, pad_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_measurements_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS measurements (
            measurement_id TEXT PRIMARY KEY,
            site_id TEXT NOT NULL,
            sector_id TEXT NOT NULL,
            period TEXT NOT NULL,
            pad_id TEXT NOT NULL,
            aggregate_stats TEXT NOT NULL,
            region_measurements TEXT NOT NULL DEFAULT '[]',
            geo_bounds TEXT,
            processing_params TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_measurements_pad ON measurements(site_id, sector_id, period, pad_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
