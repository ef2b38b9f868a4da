//! End-to-end coverage of `analyze`: the audit pipeline from raw JSON to the
//! canonical report.

use crate::{analyze, AnalysisParams, GriddleError};
use serde_json::json;

fn params() -> AnalysisParams {
    AnalysisParams::new("fbc", "305546688")
}

#[test]
fn empty_collection_yields_zeroes() {
    let summary = analyze(&json!({}), &params()).unwrap();
    assert_eq!(summary.total_events, 0);
    assert_eq!(summary.target_events, 0);
    assert_eq!(summary.failed_events, 0);
    assert_eq!(summary.success_rate, 0.0);
}

#[test]
fn mixed_collection_with_ids() {
    let data = json!({
        "e1": {"output__305546688__querystring__fbc": "v"},
        "e2": {"output__305546688__querystring__fbc": null},
    });
    let summary = analyze(&data, &params().with_show_ids(true)).unwrap();
    assert_eq!(summary.total_events, 2);
    assert_eq!(summary.target_events, 1);
    assert_eq!(summary.failed_events, 1);
    assert_eq!(summary.success_rate, 50.0);
    assert_eq!(summary.target_event_ids.as_deref().unwrap(), ["e1"]);
    assert_eq!(summary.failed_event_ids.as_deref().unwrap(), ["e2"]);
}

#[test]
fn absent_key_classifies_as_failed() {
    let data = json!({"e1": {"other_field": "x"}});
    let summary = analyze(&data, &params()).unwrap();
    assert_eq!(summary.total_events, 1);
    assert_eq!(summary.target_events, 0);
    assert_eq!(summary.failed_events, 1);
    assert_eq!(summary.success_rate, 0.0);
}

#[test]
fn empty_filter_param_rejected_before_classification() {
    let data = json!({"e1": {"output__305546688__querystring__fbc": "v"}});
    let err = analyze(&data, &AnalysisParams::new("", "305546688")).unwrap_err();
    assert!(matches!(err, GriddleError::InvalidParameter(_)));
}

#[test]
fn array_input_rejected() {
    let err = analyze(&json!(["e1"]), &params()).unwrap_err();
    assert!(matches!(err, GriddleError::InvalidInput(_)));
}

#[test]
fn totals_invariant_holds_across_shapes() {
    let data = json!({
        "a": {"output__305546688__querystring__fbc": 0},
        "b": {"output__305546688__querystring__fbc": ""},
        "c": {"output__305546688__querystring__fbc": false},
        "d": {"output__305546688__querystring__fbc": null},
        "e": {},
        "f": "malformed",
    });
    let summary = analyze(&data, &params()).unwrap();
    assert_eq!(summary.total_events, 6);
    assert_eq!(summary.target_events + summary.failed_events, summary.total_events);
    // 0, "" and false are present and non-null, so they match.
    assert_eq!(summary.target_events, 3);
    assert_eq!(summary.success_rate, 50.0);
}

#[test]
fn report_matches_summary() {
    let data = json!({
        "e1": {"output__305546688__querystring__fbc": "v"},
        "e2": {"output__305546688__querystring__fbc": null},
        "e3": {},
    });
    let summary = analyze(&data, &params().with_show_ids(true)).unwrap();
    assert_eq!(
        summary.output_content,
        "total events: 3\n\
         target events: 1\n\
         failed events: 2\n\
         success rate: 33.33%\n\
         \n\
         list of ids of target events\n\
         e1\n\
         \n\
         list of ids of failed events\n\
         e2\n\
         e3"
    );
}

#[test]
fn wire_shape_matches_api_contract() {
    let data = json!({
        "e1": {"output__305546688__querystring__fbc": "v"},
    });
    let summary = analyze(&data, &params().with_show_ids(true)).unwrap();
    let value = serde_json::to_value(&summary).unwrap();
    let obj = value.as_object().unwrap();
    for field in [
        "total_events",
        "target_events",
        "failed_events",
        "success_rate",
        "target_event_ids",
        "failed_event_ids",
        "output_content",
    ] {
        assert!(obj.contains_key(field), "missing field {field}");
    }
    assert_eq!(obj.len(), 7);
}

#[test]
fn different_root_ids_select_different_keys() {
    let data = json!({
        "e1": {"output__111__querystring__fbc": "v"},
        "e2": {"output__222__querystring__fbc": "v"},
    });
    let for_111 = analyze(&data, &AnalysisParams::new("fbc", "111")).unwrap();
    assert_eq!(for_111.target_events, 1);
    let for_222 = analyze(&data, &AnalysisParams::new("fbc", "222")).unwrap();
    assert_eq!(for_222.target_events, 1);
    let for_333 = analyze(&data, &AnalysisParams::new("fbc", "333")).unwrap();
    assert_eq!(for_333.target_events, 0);
}
