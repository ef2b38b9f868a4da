use utoipa::OpenApi;

use crate::dto::{AnalyzeRequest, QueryRequest, QueryResponse, UploadResponse};
use griddle::AnalysisSummary;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Griddle API",
        description = "Event-tracking audit: upload a JSON export or post it inline, classify events against a derived filter key, and report match statistics."
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::analyze::analyze_events,
        crate::handlers::upload::upload_file,
        crate::handlers::events::event_detail,
        crate::handlers::events::query_events,
        crate::handlers::events::catalog,
    ),
    components(schemas(
        AnalyzeRequest,
        UploadResponse,
        QueryRequest,
        QueryResponse,
        AnalysisSummary,
    )),
    tags(
        (name = "analysis", description = "Event classification and statistics"),
        (name = "events", description = "Stored uploads: event details, queries, catalog"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
