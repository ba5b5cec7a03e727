//! thermal-api library - read-only thermal imagery REST API
//!
//! Serves the Site → Sector → Period → Pad → Capture hierarchy from the
//! record store, and signed URLs for assets in the object store.

use axum::Router;
use std::sync::Arc;
use thermal_common::db::SqliteRecordStore;
use thermal_common::SensorProfile;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod objects;

pub use objects::FsObjectStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store (read-only connection pool)
    pub records: SqliteRecordStore,
    /// Object store holding mosaics, camera feeds and capture images
    pub objects: FsObjectStore,
    /// Camera model used for coverage estimates
    pub sensor: Arc<SensorProfile>,
}

impl AppState {
    /// Create new application state
    pub fn new(records: SqliteRecordStore, objects: FsObjectStore, sensor: SensorProfile) -> Self {
        Self {
            records,
            objects,
            sensor: Arc::new(sensor),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let discovery = Router::new()
        .route("/api/sites", get(api::get_sites))
        .route("/api/sectors", get(api::get_sectors))
        .route("/api/periods", get(api::get_periods))
        .route("/api/pads", get(api::get_pads));

    let mosaic = Router::new()
        .route("/api/mosaic/metadata", get(api::get_mosaic_metadata))
        .route("/api/mosaic/orthomosaic", get(api::get_orthomosaic_url))
        .route("/api/mosaic/cameras", get(api::get_cameras))
        .route("/api/coverage/stats", get(api::get_coverage_stats));

    let images = Router::new()
        .route("/api/optical/:capture_id", get(api::get_optical_image))
        .route("/api/thermal/:capture_id", get(api::get_thermal_image))
        .route("/api/thermal/:capture_id/stats", get(api::get_thermal_stats));

    let measurements = Router::new()
        .route(
            "/api/pipemeasure/measurement/:site/:sector/:period/:pad_id",
            get(api::get_pipe_measurement),
        )
        .route(
            "/api/pipemeasure/measurements/:site/:sector/:period",
            get(api::get_sector_measurements),
        );

    let public = Router::new()
        .route("/", get(api::service_index))
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/objects/*key", get(api::get_object))
        .merge(api::health_routes());

    Router::new()
        .merge(discovery)
        .merge(mosaic)
        .merge(images)
        .merge(measurements)
        .merge(public)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
