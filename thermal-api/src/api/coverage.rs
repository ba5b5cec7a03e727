//! Coverage statistics endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use thermal_common::pipeline::estimate_pad_coverage;
use thermal_common::CoverageSummary;

use super::params::SelectorQuery;
use crate::error::ApiResult;
use crate::AppState;

/// GET /api/coverage/stats?site&sector&period&pad_id
///
/// A pad without captures is 422, not an all-zero summary.
pub async fn get_coverage_stats(
    State(state): State<AppState>,
    Query(query): Query<SelectorQuery>,
) -> ApiResult<Json<CoverageSummary>> {
    let pad = query.pad()?;
    let summary = estimate_pad_coverage(&pad, &state.records, &state.sensor).await?;
    Ok(Json(summary))
}
