use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use griddle::AnalysisSummary;

/// Body of `POST /api/analyze`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// The raw export: a JSON object mapping event ids to flat records.
    #[schema(value_type = Object)]
    pub json_data: serde_json::Value,
    pub filter_param: String,
    pub root_id: String,
    #[serde(default)]
    pub show_ids: bool,
}

/// Response of `POST /upload`: the analysis summary plus upload bookkeeping.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub filename: String,
    pub filter_param: String,
    pub root_id: String,
    pub show_ids: bool,
    /// Handle for follow-up requests against the stored payload.
    pub temp_id: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    pub summary: AnalysisSummary,
}

/// Body of `POST /api/query`. Exactly one of `temp_id` / `json_data` is
/// required; `temp_id` wins when both are present.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryRequest {
    #[serde(default)]
    pub temp_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub json_data: Option<serde_json::Value>,
    pub query: String,
}

/// Rows plus execution metadata, mirroring `griddle::query::QueryOutcome`.
#[derive(Debug, Serialize, ToSchema)]
pub struct QueryResponse {
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<serde_json::Value>,
    #[schema(value_type = Object)]
    pub meta: serde_json::Value,
}

impl From<griddle::query::QueryOutcome> for QueryResponse {
    fn from(outcome: griddle::query::QueryOutcome) -> Self {
        QueryResponse {
            rows: outcome.rows,
            meta: outcome.meta,
        }
    }
}
