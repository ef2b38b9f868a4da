use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GriddleError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Upload not found: {0}")]
    UploadNotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GriddleError>;

impl From<std::io::Error> for GriddleError {
    fn from(e: std::io::Error) -> Self {
        GriddleError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for GriddleError {
    fn from(e: serde_json::Error) -> Self {
        GriddleError::Json(e.to_string())
    }
}

impl GriddleError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GriddleError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GriddleError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            GriddleError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            GriddleError::Json(_) => StatusCode::BAD_REQUEST,
            GriddleError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GriddleError::UploadNotFound(_) => StatusCode::NOT_FOUND,
            GriddleError::EventNotFound(_) => StatusCode::NOT_FOUND,
            GriddleError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            GriddleError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── status_code mapping ─────────────────────────────────────────────

    #[test]
    fn invalid_input_is_400() {
        let e = GriddleError::InvalidInput("not an object".into());
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_parameter_is_400() {
        let e = GriddleError::InvalidParameter("filter_param is empty".into());
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_query_is_400() {
        let e = GriddleError::InvalidQuery("bad clause".into());
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upload_not_found_is_404() {
        let e = GriddleError::UploadNotFound("abc123".into());
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn event_not_found_is_404() {
        let e = GriddleError::EventNotFound("e42".into());
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn io_error_is_500() {
        let e = GriddleError::Io("disk full".into());
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn json_error_is_400() {
        let e = GriddleError::Json("invalid json".into());
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_upload_is_400() {
        let e = GriddleError::InvalidUpload("expected a .json file".into());
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn config_error_is_500() {
        let e = GriddleError::Config("bad bind addr".into());
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ── Display / Error trait ───────────────────────────────────────────

    #[test]
    fn error_display_includes_message() {
        let e = GriddleError::UploadNotFound("tmp_9".into());
        let msg = format!("{}", e);
        assert!(msg.contains("tmp_9"));
    }

    // ── From conversions ────────────────────────────────────────────────

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let gr_err: GriddleError = io_err.into();
        assert!(matches!(gr_err, GriddleError::Io(_)));
        assert!(gr_err.to_string().contains("file not found"));
    }

    #[test]
    fn from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let gr_err: GriddleError = json_err.into();
        assert!(matches!(gr_err, GriddleError::Json(_)));
    }

    // ── into_response() HTTP status correctness ──────────────────────────
    // These tests verify the ACTUAL HTTP response status code, not just status_code().
    // Both must agree — divergence means clients see different codes than logging.

    #[cfg(feature = "axum-support")]
    mod into_response_tests {
        use super::*;
        use axum::response::IntoResponse;

        fn status_from_response(e: GriddleError) -> http::StatusCode {
            e.into_response().status()
        }

        #[test]
        fn upload_not_found_http_response_is_404() {
            assert_eq!(
                status_from_response(GriddleError::UploadNotFound("t".into())),
                StatusCode::NOT_FOUND
            );
        }

        #[test]
        fn into_response_status_matches_status_code_for_all_variants() {
            let errors: Vec<GriddleError> = vec![
                GriddleError::InvalidInput("i".into()),
                GriddleError::InvalidParameter("p".into()),
                GriddleError::InvalidQuery("q".into()),
                GriddleError::Json("j".into()),
                GriddleError::Io("io".into()),
                GriddleError::UploadNotFound("u".into()),
                GriddleError::EventNotFound("e".into()),
                GriddleError::InvalidUpload("f".into()),
                GriddleError::Config("c".into()),
            ];
            for e in errors {
                let expected = e.status_code();
                let actual = status_from_response(e.clone());
                assert_eq!(
                    actual, expected,
                    "into_response() status ({}) != status_code() ({}) for {:?}",
                    actual, expected, e
                );
            }
        }
    }
}

// Axum IntoResponse implementation (feature-gated)
#[cfg(feature = "axum-support")]
use axum::response::{IntoResponse, Json, Response};
#[cfg(feature = "axum-support")]
use serde::Serialize;

#[cfg(feature = "axum-support")]
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[cfg(feature = "axum-support")]
impl IntoResponse for GriddleError {
    fn into_response(self) -> Response {
        let (status, error_code, message, suggestion) = match &self {
            GriddleError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_input",
                format!("Invalid input: {}", msg),
                Some("json_data must be a JSON object mapping event ids to records".to_string()),
            ),
            GriddleError::InvalidParameter(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_parameter",
                format!("Invalid parameter: {}", msg),
                Some("Provide non-empty filter_param and root_id".to_string()),
            ),
            GriddleError::InvalidQuery(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_query", msg.clone(), None)
            }
            GriddleError::Json(e) => (
                StatusCode::BAD_REQUEST,
                "json_error",
                format!("JSON error: {}", e),
                None,
            ),
            GriddleError::Io(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                format!("IO error: {}", e),
                None,
            ),
            GriddleError::UploadNotFound(temp_id) => (
                StatusCode::NOT_FOUND,
                "upload_not_found",
                format!("Upload '{}' not found", temp_id),
                Some("Uploads expire after a while; upload the file again".to_string()),
            ),
            GriddleError::EventNotFound(event_id) => (
                StatusCode::NOT_FOUND,
                "event_not_found",
                format!("Event '{}' not found", event_id),
                None,
            ),
            GriddleError::InvalidUpload(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_upload",
                msg.clone(),
                Some("Upload a .json file".to_string()),
            ),
            GriddleError::Config(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "config_error",
                format!("Configuration error: {}", e),
                None,
            ),
        };

        let error_response = ErrorResponse {
            error: error_code.to_string(),
            message,
            request_id: format!("req_gr_{}", uuid::Uuid::new_v4()),
            suggestion,
        };

        (status, Json(error_response)).into_response()
    }
}
