//! Search / discover route
//!
//! Caller-facing entry point of the discovery engine. Malformed input is the
//! only error surfaced to the caller; upstream trouble still answers 200
//! with an empty page and a short cache lifetime.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::models::{FilterSpec, SearchParams};
use crate::AppState;

fn bad_request(message: String) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

/// GET /api/search?query=&type=&page=&pageSize=&genre=&year=&...
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let Query(params) = params.map_err(|e| bad_request(e.body_text()))?;

    let spec = FilterSpec::from_params(&params, &state.config.default_watch_region)
        .map_err(|e| bad_request(e.to_string()))?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("search", %request_id, page = spec.page);

    let outcome = state
        .discovery
        .search(&spec)
        .instrument(span)
        .await
        .map_err(|e| bad_request(e.to_string()))?;

    let cache_control = state.cache_hints.header_value(outcome.freshness);

    Ok((
        [(header::CACHE_CONTROL, cache_control)],
        Json(outcome.envelope),
    )
        .into_response())
}
