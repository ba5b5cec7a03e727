//! Query-string selectors shared by the mosaic and coverage endpoints

use serde::Deserialize;
use thermal_common::models::{MosaicSelector, MosaicVariant, PadSelector};

use crate::error::{ApiError, ApiResult};

const SELECTOR_REQUIRED: &str = "site, sector, period, and pad_id required";

/// `?site=&sector=&period=&pad_id=[&mosaic_type=]`
///
/// Fields are optional at the extractor level so that a missing parameter
/// yields the API's own 400 body rather than axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SelectorQuery {
    pub site: Option<String>,
    pub sector: Option<String>,
    pub period: Option<String>,
    pub pad_id: Option<String>,
    pub mosaic_type: Option<String>,
}

impl SelectorQuery {
    pub fn pad(&self) -> ApiResult<PadSelector> {
        match (
            non_empty(&self.site),
            non_empty(&self.sector),
            non_empty(&self.period),
            non_empty(&self.pad_id),
        ) {
            (Some(site), Some(sector), Some(period), Some(pad_id)) => {
                Ok(PadSelector::new(site, sector, period, pad_id))
            }
            _ => Err(ApiError::BadRequest(SELECTOR_REQUIRED.to_string())),
        }
    }

    /// Pad selector plus variant; `mosaic_type` defaults to `optical`
    pub fn mosaic(&self) -> ApiResult<MosaicSelector> {
        let pad = self.pad()?;
        let variant = match non_empty(&self.mosaic_type) {
            Some(raw) => raw.parse::<MosaicVariant>()?,
            None => MosaicVariant::default(),
        };
        Ok(MosaicSelector::new(pad, variant))
    }
}

/// Present and non-empty query value
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
