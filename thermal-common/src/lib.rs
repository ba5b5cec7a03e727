//! # Thermal Common Library
//!
//! Shared code for the thermal viewer services including:
//! - Dataset models (captures, pads, measurements) and selectors
//! - Error taxonomy
//! - Configuration loading
//! - GeoJSON camera-position types
//! - Camera-position enrichment and coverage estimation
//! - Object key layout and signed URLs
//! - SQLite record store adapter

pub mod config;
pub mod coverage;
pub mod db;
pub mod enrich;
pub mod error;
pub mod geojson;
pub mod keys;
pub mod models;
pub mod pipeline;
pub mod signing;
pub mod sources;

pub use coverage::{estimate_coverage, CoverageSummary, SensorProfile};
pub use enrich::{enrich_features, Enrichment};
pub use error::{Error, Result};
pub use models::{CaptureRecord, MosaicSelector, MosaicVariant, PadSelector, Palette};
