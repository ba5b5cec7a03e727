//! HTTP API handlers for thermal-api

pub mod buildinfo;
pub mod coverage;
pub mod discovery;
pub mod health;
pub mod images;
pub mod index;
pub mod measurements;
pub mod mosaic;
pub mod objects;
pub mod params;

pub use buildinfo::get_build_info;
pub use coverage::get_coverage_stats;
pub use discovery::{get_pads, get_periods, get_sectors, get_sites};
pub use health::health_routes;
pub use images::{get_optical_image, get_thermal_image, get_thermal_stats};
pub use index::service_index;
pub use measurements::{get_pipe_measurement, get_sector_measurements};
pub use mosaic::{get_cameras, get_mosaic_metadata, get_orthomosaic_url};
pub use objects::get_object;

use serde::Serialize;

/// `{"url": ...}` body returned for every signed asset link
#[derive(Debug, Serialize)]
pub struct SignedUrlResponse {
    pub url: String,
}
