//! Dataset discovery: sites, sectors, periods and pads

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use thermal_common::keys::orthophoto_key;
use thermal_common::models::{MosaicSelector, MosaicVariant, PadRecord, PadSelector};
use thermal_common::Error;
use tracing::{debug, info};

use super::params::non_empty;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DiscoveryQuery {
    pub site: Option<String>,
    pub sector: Option<String>,
    /// Only on `/api/pads`: restrict to pads complete for this period
    pub period: Option<String>,
}

impl DiscoveryQuery {
    fn site(&self) -> ApiResult<&str> {
        non_empty(&self.site).ok_or_else(|| ApiError::BadRequest("site parameter required".into()))
    }

    fn site_and_sector(&self) -> ApiResult<(&str, &str)> {
        match (non_empty(&self.site), non_empty(&self.sector)) {
            (Some(site), Some(sector)) => Ok((site, sector)),
            _ => Err(ApiError::BadRequest(
                "site and sector parameters required".into(),
            )),
        }
    }
}

/// GET /api/sites
pub async fn get_sites(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.records.list_sites().await?))
}

/// GET /api/sectors?site=
pub async fn get_sectors(
    State(state): State<AppState>,
    Query(query): Query<DiscoveryQuery>,
) -> ApiResult<Json<Vec<String>>> {
    let site = query.site()?;
    Ok(Json(state.records.list_sectors(site).await?))
}

/// GET /api/periods?site=&sector=
///
/// Most recent period first.
pub async fn get_periods(
    State(state): State<AppState>,
    Query(query): Query<DiscoveryQuery>,
) -> ApiResult<Json<Vec<String>>> {
    let (site, sector) = query.site_and_sector()?;
    Ok(Json(state.records.list_periods(site, sector).await?))
}

/// GET /api/pads?site=&sector=[&period=]
///
/// Sorted by pad name. With `period`, a pad is listed only when it has at
/// least one capture for that period and its optical orthomosaic exists.
pub async fn get_pads(
    State(state): State<AppState>,
    Query(query): Query<DiscoveryQuery>,
) -> ApiResult<Json<Vec<PadRecord>>> {
    let (site, sector) = query.site_and_sector()?;
    let pads = state.records.list_pads(site, sector).await?;

    let Some(period) = non_empty(&query.period) else {
        return Ok(Json(pads));
    };

    let total = pads.len();
    let mut complete = Vec::with_capacity(total);
    for pad in pads {
        let selector = PadSelector::new(site, sector, period, pad.pad_id.as_str());
        if is_pad_complete(&state, selector).await? {
            complete.push(pad);
        } else {
            debug!("Filtered out incomplete pad: {}", pad.pad_id);
        }
    }

    info!(
        "Returning {} complete pads of {} for {}/{}/{}",
        complete.len(),
        total,
        site,
        sector,
        period
    );
    Ok(Json(complete))
}

async fn is_pad_complete(state: &AppState, pad: PadSelector) -> ApiResult<bool> {
    if state.records.count_captures(&pad).await? == 0 {
        return Ok(false);
    }

    let key = orthophoto_key(&MosaicSelector::new(pad, MosaicVariant::Optical));
    match state.objects.exists(&key).await {
        Ok(exists) => Ok(exists),
        // An identifier that cannot form a key has no mosaic
        Err(Error::InvalidInput(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
