//! Signed object downloads
//!
//! Serves the targets of URLs issued by the JSON endpoints. The signature is
//! checked before the key touches the filesystem.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use thermal_common::signing::SignatureError;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::objects::content_type_for;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    pub expires: Option<i64>,
    pub signature: Option<String>,
}

/// GET /objects/*key?expires=&signature=
pub async fn get_object(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<SignedQuery>,
) -> ApiResult<Response> {
    let (Some(expires), Some(signature)) = (query.expires, query.signature.as_deref()) else {
        return Err(ApiError::Forbidden("Missing URL signature".to_string()));
    };

    state
        .objects
        .verify(&key, expires, signature)
        .map_err(|e: SignatureError| {
            warn!("Rejected object request for {}: {}", key, e);
            ApiError::Forbidden(e.to_string())
        })?;

    let bytes = state.objects.get(&key).await?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&key))], bytes).into_response())
}
