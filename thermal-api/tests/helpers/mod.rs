//! Shared fixture for thermal-api integration tests
//!
//! Builds a root folder holding a seeded record store and object bucket, then
//! serves it through the real router over a read-only connection.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use thermal_api::{build_router, db::connect_readonly, AppState, FsObjectStore};
use thermal_common::db::{init_database, SqliteRecordStore};
use thermal_common::signing::UrlSigner;
use thermal_common::SensorProfile;

pub const SECRET: &str = "integration-secret";
pub const BASE_URL: &str = "http://localhost:5001";

pub const SITE: &str = "leyte";
pub const SECTOR: &str = "malitbog";
pub const PERIOD: &str = "20250228-PMSB";
pub const OLD_PERIOD: &str = "20240115-PMSB";
pub const PAD: &str = "leyte_malitbog_PAD_msb";
pub const ALPHA_PAD: &str = "leyte_malitbog_PAD_alpha";
pub const ZETA_PAD: &str = "leyte_malitbog_PAD_zeta";

pub const ORTHOPHOTO_KEY: &str =
    "mosaics/leyte/malitbog/20250228-PMSB/leyte_malitbog_PAD_msb/optical/viewer/odm_orthophoto.tif";

pub struct TestApp {
    /// Keeps the root folder alive for the test's duration
    pub root: TempDir,
    pub router: Router,
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Response<Body> {
        tower::ServiceExt::oneshot(self.router.clone(), test_request(uri))
            .await
            .unwrap()
    }

    /// Status and JSON body of `GET uri`
    pub async fn get_json(&self, uri: &str) -> (axum::http::StatusCode, Value) {
        let response = self.get(uri).await;
        let status = response.status();
        (status, extract_json(response.into_body()).await)
    }
}

pub fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn extract_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

pub async fn extract_json(body: Body) -> Value {
    let bytes = extract_bytes(body).await;
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Path and query of an issued URL, for replaying it against the router
pub fn local_uri(url: &str) -> String {
    url.strip_prefix(BASE_URL)
        .expect("Issued URL should use the configured base")
        .to_string()
}

pub fn signer() -> UrlSigner {
    UrlSigner::new(SECRET, BASE_URL)
}

pub async fn setup_app() -> TestApp {
    let root = tempfile::tempdir().unwrap();
    let db_path = root.path().join("thermal.db");

    let pool = init_database(&db_path)
        .await
        .expect("Should create record store");
    seed_records(&pool).await;
    pool.close().await;

    let object_root = root.path().join("objects");
    seed_objects(&object_root);

    let readonly = connect_readonly(&db_path)
        .await
        .expect("Should reopen record store read-only");
    let objects = FsObjectStore::new(object_root, signer(), Duration::from_secs(3600));
    let state = AppState::new(
        SqliteRecordStore::new(readonly),
        objects,
        SensorProfile::default(),
    );

    TestApp {
        root,
        router: build_router(state),
    }
}

async fn insert_pad(
    pool: &SqlitePool,
    pad_id: &str,
    site: &str,
    sector: &str,
    pad_name: Option<&str>,
    area: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO pads (pad_id, site, sector, pad_name, geo_location_area)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(pad_id)
    .bind(site)
    .bind(sector)
    .bind(pad_name)
    .bind(area)
    .execute(pool)
    .await
    .unwrap();
}

async fn insert_raw_capture(
    pool: &SqlitePool,
    capture_id: &str,
    period: &str,
    pad_id: &str,
    optical_filename: &str,
    altitude: f64,
) {
    sqlx::query(
        "INSERT INTO captures (capture_id, site_id, sector_id, period, pad_id,
             optical_filename, thermal_filename, altitude_m, temperature_min, temperature_max)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 18.0, 40.0)",
    )
    .bind(capture_id)
    .bind(SITE)
    .bind(SECTOR)
    .bind(period)
    .bind(pad_id)
    .bind(optical_filename)
    .bind(format!("T_{}", optical_filename))
    .bind(altitude)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_records(pool: &SqlitePool) {
    insert_pad(
        pool,
        PAD,
        SITE,
        SECTOR,
        Some("msb"),
        Some("[[124.81, 11.07], [124.82, 11.08]]"),
    )
    .await;
    // No stored name: derived from the identifier
    insert_pad(pool, ALPHA_PAD, SITE, SECTOR, None, None).await;
    insert_pad(pool, ZETA_PAD, SITE, SECTOR, Some("zeta"), None).await;
    insert_pad(pool, "leyte_tongonan_PAD_t1", SITE, "tongonan", Some("t1"), None).await;
    insert_pad(pool, "negros_palinpinon_PAD_p1", "negros", "palinpinon", Some("p1"), None).await;

    // Uncalibrated capture with every optional column populated
    sqlx::query(
        r#"INSERT INTO captures (capture_id, site_id, sector_id, period, pad_id,
               optical_filename, thermal_filename, altitude_m, temperature_min, temperature_max,
               temperature_avg, calibration_status, thermal_params, optical_key,
               colored_images, mosaic_variants, dataset_temperature_range)
           VALUES ('cap-001', ?, ?, ?, ?, 'DJI_0001.JPG', 'DJI_0001_T.JPG', 445.5, 20.0, 55.0,
               30.0, 'uncalibrated',
               '{"emissivity": 0.95, "distance": 25.0, "reflection": 23.0, "ambient_temp": 28.0, "humidity": 70.0}',
               'optical/cap-001.jpg',
               '{"medical": "thermal/medical/cap-001.png"}',
               '["optical", "medical"]',
               '{"min_temp_c": 18.5, "max_temp_c": 72.0, "mean_temp_c": 31.0, "normalization": "percentile", "sample_size": 120}')"#,
    )
    .bind(SITE)
    .bind(SECTOR)
    .bind(PERIOD)
    .bind(PAD)
    .execute(pool)
    .await
    .unwrap();

    // Calibrated capture: reported maximum comes from calibrated_max
    sqlx::query(
        r#"INSERT INTO captures (capture_id, site_id, sector_id, period, pad_id,
               optical_filename, thermal_filename, altitude_m, temperature_min, temperature_max,
               temperature_avg, calibration_status, calibrated_max, calibrated_avg,
               calibration_params, colored_images)
           VALUES ('cap-002', ?, ?, ?, ?, 'DJI_0002.JPG', 'DJI_0002_T.JPG', 445.5, 21.0, 50.0,
               29.0, 'calibrated', 60.5, 33.2,
               '{"emissivity": 0.9, "distance": 30.0, "reflection": 22.0, "ambient_temp": 27.5, "humidity": 65.0}',
               '{"hotspot_alert": "thermal/hotspot_alert/cap-002.png"}')"#,
    )
    .bind(SITE)
    .bind(SECTOR)
    .bind(PERIOD)
    .bind(PAD)
    .execute(pool)
    .await
    .unwrap();

    insert_raw_capture(pool, "cap-101", PERIOD, ALPHA_PAD, "DJI_0101.JPG", 120.0).await;
    insert_raw_capture(pool, "cap-900", OLD_PERIOD, PAD, "DJI_0900.JPG", 300.0).await;

    sqlx::query(
        r#"INSERT INTO measurements (measurement_id, site_id, sector_id, period, pad_id,
               aggregate_stats, region_measurements, geo_bounds)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind("m-msb")
    .bind(SITE)
    .bind(SECTOR)
    .bind(PERIOD)
    .bind(PAD)
    .bind(json!({"total_length_m": 152.4, "anomaly_count": 3}).to_string())
    .bind(json!([{"region_id": 1, "length_m": 12.5}]).to_string())
    .bind(json!({"min_lon": 124.81, "max_lon": 124.82}).to_string())
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        r#"INSERT INTO measurements (measurement_id, site_id, sector_id, period, pad_id,
               aggregate_stats)
           VALUES ('m-alpha', ?, ?, ?, ?, '{"total_length_m": 40.0}')"#,
    )
    .bind(SITE)
    .bind(SECTOR)
    .bind(PERIOD)
    .bind(ALPHA_PAD)
    .execute(pool)
    .await
    .unwrap();
}

fn write_object(root: &Path, key: &str, bytes: &[u8]) {
    let path = root.join(key);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

fn shots_feed() -> Value {
    json!({
        "type": "FeatureCollection",
        "name": "shots",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [124.811, 11.071, 446.0]},
                "properties": {
                    "filename": "DJI_0001.JPG",
                    "rotation": [std::f64::consts::PI, 0.0, 0.0],
                    "focal": 0.79
                }
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [124.812, 11.072, 446.5]},
                "properties": {
                    "filename": "DJI_0002.JPG",
                    "rotation": [-std::f64::consts::FRAC_PI_2, 0.0, 0.0]
                }
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [124.813, 11.073]},
                "properties": {"filename": "DJI_9999.JPG"}
            }
        ]
    })
}

fn seed_objects(root: &Path) {
    let msb = "mosaics/leyte/malitbog/20250228-PMSB/leyte_malitbog_PAD_msb";
    let zeta = "mosaics/leyte/malitbog/20250228-PMSB/leyte_malitbog_PAD_zeta";

    write_object(root, ORTHOPHOTO_KEY, b"II*\0orthophoto");
    write_object(
        root,
        &format!("{}/optical/viewer/shots.geojson", msb),
        shots_feed().to_string().as_bytes(),
    );
    write_object(
        root,
        &format!("{}/medical/viewer/shots.geojson", msb),
        b"this is not geojson",
    );
    // Orthomosaic without captures: still incomplete
    write_object(
        root,
        &format!("{}/optical/viewer/odm_orthophoto.tif", zeta),
        b"II*\0zeta",
    );
    write_object(root, "optical/cap-001.jpg", b"\xff\xd8\xffoptical");
    write_object(root, "thermal/medical/cap-001.png", b"\x89PNGmedical");
}
