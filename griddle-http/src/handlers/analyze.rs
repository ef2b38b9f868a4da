use axum::{extract::State, Json};
use std::sync::Arc;

use griddle::{AnalysisParams, AnalysisSummary, GriddleError};

use super::AppState;
use crate::dto::AnalyzeRequest;

/// Programmatic analysis over an inline payload.
///
/// The response carries exactly the summary field set; `output_content` is
/// byte-identical to what the CLI prints for the same input.
#[utoipa::path(
    post,
    path = "/api/analyze",
    tag = "analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis summary", body = AnalysisSummary),
        (status = 400, description = "Invalid parameters or input shape")
    )
)]
pub async fn analyze_events(
    State(_state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisSummary>, GriddleError> {
    let params = AnalysisParams {
        filter_param: req.filter_param,
        root_id: req.root_id,
        show_ids: req.show_ids,
    };
    let summary = griddle::analyze(&req.json_data, &params)?;
    Ok(Json(summary))
}
