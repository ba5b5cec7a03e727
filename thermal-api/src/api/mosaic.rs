//! Mosaic viewer endpoints: metadata, orthomosaic link and camera positions

use axum::{
    extract::{Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thermal_common::keys::orthophoto_key;
use thermal_common::models::MosaicVariant;
use thermal_common::pipeline::enrich_camera_positions;

use super::params::SelectorQuery;
use super::SignedUrlResponse;
use crate::error::ApiResult;
use crate::AppState;

/// Response header carrying the number of camera positions with no capture record
pub const UNMATCHED_FEATURES_HEADER: &str = "x-unmatched-features";

#[derive(Debug, Serialize)]
pub struct MosaicMetadata {
    pub exists: bool,
    pub image_count: usize,
    pub site: String,
    pub sector: String,
    pub period: String,
    pub pad_id: String,
    pub mosaic_type: MosaicVariant,
}

/// GET /api/mosaic/metadata
///
/// `exists` reflects the mosaic variants recorded on the pad's first capture.
pub async fn get_mosaic_metadata(
    State(state): State<AppState>,
    Query(query): Query<SelectorQuery>,
) -> ApiResult<Json<MosaicMetadata>> {
    let mosaic = query.mosaic()?;
    let captures = state.records.query_capture_details(&mosaic.pad).await?;

    let exists = captures
        .first()
        .map(|first| first.mosaic_variants.contains(&mosaic.variant))
        .unwrap_or(false);

    let pad = mosaic.pad;
    Ok(Json(MosaicMetadata {
        exists,
        image_count: captures.len(),
        site: pad.site,
        sector: pad.sector,
        period: pad.period,
        pad_id: pad.pad_id,
        mosaic_type: mosaic.variant,
    }))
}

/// GET /api/mosaic/orthomosaic
pub async fn get_orthomosaic_url(
    State(state): State<AppState>,
    Query(query): Query<SelectorQuery>,
) -> ApiResult<Json<SignedUrlResponse>> {
    let mosaic = query.mosaic()?;
    let url = state.objects.presign(&orthophoto_key(&mosaic))?;
    Ok(Json(SignedUrlResponse { url }))
}

/// GET /api/mosaic/cameras
///
/// Camera positions enriched with capture metadata. Positions without a
/// capture record are returned unchanged and counted in
/// [`UNMATCHED_FEATURES_HEADER`].
pub async fn get_cameras(
    State(state): State<AppState>,
    Query(query): Query<SelectorQuery>,
) -> ApiResult<Response> {
    let mosaic = query.mosaic()?;
    let enrichment = enrich_camera_positions(&mosaic, &state.records, &state.objects).await?;

    let unmatched = HeaderValue::from(enrichment.unmatched.len());
    let mut response = Json(enrichment.collection).into_response();
    response
        .headers_mut()
        .insert(UNMATCHED_FEATURES_HEADER, unmatched);
    Ok(response)
}
