//! Event classification and statistics engine.
//!
//! The whole pipeline is a single-pass, stateless transformation:
//! raw JSON -> [`EventCollection`] -> [`classify::Classification`] ->
//! [`AnalysisSummary`] with the canonical text report attached. Each analysis
//! runs on independently owned data, so the surrounding service can invoke it
//! concurrently without coordination.

pub mod classify;
pub mod key;
pub mod report;
pub mod summary;

pub use classify::{classify, Classification, EventOutcome};
pub use key::build_filter_key;
pub use report::format_report;
pub use summary::{aggregate, AnalysisSummary};

use crate::error::Result;
use crate::types::{AnalysisParams, EventCollection};

/// Run one full analysis over raw JSON event data.
///
/// Validates the parameters and the input shape before any classification:
///
/// * [`crate::GriddleError::InvalidParameter`] — empty `filter_param` or
///   `root_id`;
/// * [`crate::GriddleError::InvalidInput`] — `json_data` is not a JSON
///   object.
///
/// On success returns the complete [`AnalysisSummary`], `output_content`
/// included. Deterministic: identical inputs yield an identical summary.
pub fn analyze(json_data: &serde_json::Value, params: &AnalysisParams) -> Result<AnalysisSummary> {
    let filter_key = build_filter_key(&params.root_id, &params.filter_param)?;
    let events = EventCollection::from_json(json_data)?;

    let classification = classify(&events, &filter_key);
    let mut summary = aggregate(&classification, params.show_ids);
    summary.output_content = format_report(&summary, params);

    tracing::debug!(
        filter_key = %filter_key,
        total = summary.total_events,
        target = summary.target_events,
        "analysis complete"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> AnalysisParams {
        AnalysisParams::new("fbc", "305546688")
    }

    #[test]
    fn validates_parameters_before_touching_input() {
        // Even an invalid json_data is not inspected when parameters fail.
        let bad_params = AnalysisParams::new("", "305546688");
        let err = analyze(&json!([1, 2]), &bad_params).unwrap_err();
        assert!(matches!(err, crate::GriddleError::InvalidParameter(_)));
    }

    #[test]
    fn rejects_non_object_input() {
        let err = analyze(&json!(["e1", "e2"]), &params()).unwrap_err();
        assert!(matches!(err, crate::GriddleError::InvalidInput(_)));
    }

    #[test]
    fn fills_output_content() {
        let summary = analyze(&json!({}), &params()).unwrap();
        assert!(summary.output_content.starts_with("total events: 0"));
    }

    #[test]
    fn analyze_is_deterministic() {
        let data = json!({
            "e1": {"output__305546688__querystring__fbc": "v"},
            "e2": {"output__305546688__querystring__fbc": null},
        });
        let p = params().with_show_ids(true);
        let a = analyze(&data, &p).unwrap();
        let b = analyze(&data, &p).unwrap();
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }
}
