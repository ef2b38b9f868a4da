use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;

use griddle::{AnalysisParams, GriddleError};

use super::AppState;
use crate::dto::UploadResponse;

const ALLOWED_EXTENSIONS: &[&str] = &["json"];

/// Upload a tracker export and analyze it in one round trip.
///
/// Expects multipart form fields `file`, `filter_param`, `root_id` and an
/// optional `show_ids` checkbox value. The parsed payload stays available
/// under the returned `temp_id` for event-detail and query requests.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "analysis",
    responses(
        (status = 200, description = "Analysis of the uploaded file", body = UploadResponse),
        (status = 400, description = "Missing file, wrong extension, malformed JSON, or bad parameters")
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, GriddleError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut filter_param = String::new();
    let mut root_id = String::new();
    let mut show_ids = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GriddleError::InvalidUpload(format!("malformed multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    GriddleError::InvalidUpload(format!("failed to read file field: {}", e))
                })?;
                file = Some((filename, bytes.to_vec()));
            }
            "filter_param" => {
                filter_param = read_text(field).await?.trim().to_string();
            }
            "root_id" => {
                root_id = read_text(field).await?.trim().to_string();
            }
            "show_ids" => {
                let value = read_text(field).await?;
                show_ids = matches!(value.trim(), "on" | "true" | "1");
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| GriddleError::InvalidUpload("no file selected".to_string()))?;
    if filename.is_empty() {
        return Err(GriddleError::InvalidUpload("no file selected".to_string()));
    }
    if !allowed_file(&filename) {
        return Err(GriddleError::InvalidUpload(format!(
            "invalid file type for '{}', expected .json",
            filename
        )));
    }

    let json_data: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
        GriddleError::InvalidInput(format!("invalid JSON in '{}': {}", filename, e))
    })?;

    let params = AnalysisParams {
        filter_param,
        root_id,
        show_ids,
    };
    let summary = griddle::analyze(&json_data, &params)?;
    let temp_id = state.uploads.insert(&json_data, &filename)?;

    tracing::info!(
        filename = %filename,
        total = summary.total_events,
        target = summary.target_events,
        "upload analyzed"
    );

    Ok(Json(UploadResponse {
        filename,
        filter_param: params.filter_param,
        root_id: params.root_id,
        show_ids: params.show_ids,
        temp_id,
        uploaded_at: chrono::Utc::now(),
        summary,
    }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, GriddleError> {
    field
        .text()
        .await
        .map_err(|e| GriddleError::InvalidUpload(format!("failed to read form field: {}", e)))
}

fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
