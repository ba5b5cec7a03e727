//! Liveness probe; touches neither store

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

const MODULE_NAME: &str = "thermal-api";

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
}

impl Liveness {
    fn ok() -> Self {
        Self {
            status: "ok",
            module: MODULE_NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// GET /health
pub async fn health_check() -> Json<Liveness> {
    Json(Liveness::ok())
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
