//! Service index at `/`

use axum::Json;
use serde_json::{json, Value};

/// GET /
///
/// Lists the endpoint groups served by this module.
pub async fn service_index() -> Json<Value> {
    Json(json!({
        "service": "thermal-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "discovery": [
                "/api/sites",
                "/api/sectors?site={site}",
                "/api/periods?site={site}&sector={sector}",
                "/api/pads?site={site}&sector={sector}[&period={period}]"
            ],
            "mosaic": [
                "/api/mosaic/metadata",
                "/api/mosaic/orthomosaic",
                "/api/mosaic/cameras"
            ],
            "images": [
                "/api/optical/{capture_id}",
                "/api/thermal/{capture_id}?palette={palette}",
                "/api/thermal/{capture_id}/stats"
            ],
            "stats": ["/api/coverage/stats"],
            "pipemeasure": [
                "/api/pipemeasure/measurement/{site}/{sector}/{period}/{pad_id}",
                "/api/pipemeasure/measurements/{site}/{sector}/{period}"
            ],
            "system": ["/health", "/api/buildinfo"]
        }
    }))
}
