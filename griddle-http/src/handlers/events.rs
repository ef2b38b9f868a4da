use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use griddle::events::{build_catalog, normalize_events, Catalog};
use griddle::query::run_query;
use griddle::{EventCollection, GriddleError};

use super::AppState;
use crate::dto::{QueryRequest, QueryResponse};

/// Raw record of a single event from a stored upload.
#[utoipa::path(
    get,
    path = "/event/{temp_id}/{event_id}",
    tag = "events",
    params(
        ("temp_id" = String, Path, description = "Upload handle returned by /upload"),
        ("event_id" = String, Path, description = "Event identifier inside the upload")
    ),
    responses(
        (status = 200, description = "The event record", body = serde_json::Value),
        (status = 404, description = "Unknown or expired upload, or unknown event id")
    )
)]
pub async fn event_detail(
    State(state): State<Arc<AppState>>,
    Path((temp_id, event_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, GriddleError> {
    let data = state.uploads.load(&temp_id)?;
    let events = EventCollection::from_json(&data)?;
    let record = events
        .get(&event_id)
        .cloned()
        .ok_or(GriddleError::EventNotFound(event_id))?;
    Ok(Json(record))
}

/// Run a DSL query over a stored upload or an inline payload.
#[utoipa::path(
    post,
    path = "/api/query",
    tag = "events",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Query rows and metadata", body = QueryResponse),
        (status = 400, description = "Invalid query or input"),
        (status = 404, description = "Unknown or expired upload")
    )
)]
pub async fn query_events(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, GriddleError> {
    let data = match (&req.temp_id, req.json_data) {
        (Some(temp_id), _) => state.uploads.load(temp_id)?,
        (None, Some(json_data)) => json_data,
        (None, None) => {
            return Err(GriddleError::InvalidInput(
                "provide temp_id or json_data".to_string(),
            ))
        }
    };

    let events = EventCollection::from_json(&data)?;
    let rows = normalize_events(&events);
    let outcome = run_query(&rows, &req.query)?;
    Ok(Json(outcome.into()))
}

/// Column list and value counts of a stored upload's normalized rows.
#[utoipa::path(
    get,
    path = "/api/catalog/{temp_id}",
    tag = "events",
    params(
        ("temp_id" = String, Path, description = "Upload handle returned by /upload")
    ),
    responses(
        (status = 200, description = "Catalog of the normalized table", body = serde_json::Value),
        (status = 404, description = "Unknown or expired upload")
    )
)]
pub async fn catalog(
    State(state): State<Arc<AppState>>,
    Path(temp_id): Path<String>,
) -> Result<Json<Catalog>, GriddleError> {
    let data = state.uploads.load(&temp_id)?;
    let events = EventCollection::from_json(&data)?;
    Ok(Json(build_catalog(&normalize_events(&events))))
}
