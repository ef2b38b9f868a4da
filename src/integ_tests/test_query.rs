//! Pipeline coverage for normalization + query: raw export in, grouped
//! counts out.

use crate::events::{build_catalog, normalize_events};
use crate::query::run_query;
use crate::types::EventCollection;
use serde_json::json;

fn export() -> EventCollection {
    EventCollection::from_json(&json!({
        "evt_001": {
            "date": "2024-03-01",
            "status": "success",
            "object_id": "305546688",
            "object_title": "Spring launch",
            "output__305546688__event_id": "in_001",
            "output__305546688__meta__primary_email": "ada@example.com",
            "output__305546688__meta__handl_fbc": "fb.1.1710000000.abc",
            "output__305546688__meta__handl_utm_source": "facebook",
            "output__305546688__checkout__event_name": "Purchase",
            "output__305546688__isfire": "yes"
        },
        "evt_002": {
            "date": "2024-03-01",
            "status": "success",
            "object_id": "305546688",
            "output__305546688__checkout__event_name": "Purchase",
            "output__305546688__isfire": "no"
        },
        "evt_003": {
            "date": "2024-03-02",
            "status": "held",
            "object_id": "305546688",
            "output__305546688__signup__event_name": "CompleteRegistration",
            "output__305546688__isfire": "yes"
        },
        "evt_004": {
            "date": "2024-03-02",
            "status": "success"
        }
    }))
    .unwrap()
}

#[test]
fn normalization_feeds_query_pipeline() {
    let rows = normalize_events(&export());
    assert_eq!(rows.len(), 4);

    let outcome = run_query(&rows, "count by status").unwrap();
    assert_eq!(outcome.rows[0]["status"], "success");
    assert_eq!(outcome.rows[0]["count"], 3);
    assert_eq!(outcome.rows[1]["status"], "held");
    assert_eq!(outcome.rows[1]["count"], 1);
}

#[test]
fn fired_purchases_query() {
    let rows = normalize_events(&export());
    let outcome = run_query(
        &rows,
        r#"where event_name == "Purchase" and isfire == true | select *"#,
    )
    .unwrap();
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0]["event_id"], "evt_001");
    assert_eq!(outcome.rows[0]["email"], "ada@example.com");
    assert_eq!(outcome.rows[0]["utm_source"], "facebook");
}

#[test]
fn catalog_reflects_the_export() {
    let rows = normalize_events(&export());
    let catalog = build_catalog(&rows);
    assert_eq!(catalog.events_counts.by_status["success"], 3);
    assert_eq!(catalog.events_counts.by_status["held"], 1);
    assert_eq!(catalog.events_counts.by_event_name["Purchase"], 2);
    assert_eq!(catalog.events_counts.by_isfire["yes"], 2);
}

#[test]
fn grouping_by_two_columns() {
    let rows = normalize_events(&export());
    let outcome = run_query(&rows, "count by date, status").unwrap();
    assert_eq!(outcome.rows.len(), 3);
    assert_eq!(outcome.rows[0]["date"], "2024-03-01");
    assert_eq!(outcome.rows[0]["status"], "success");
    assert_eq!(outcome.rows[0]["count"], 2);
    assert_eq!(outcome.meta["group_by"], json!(["date", "status"]));
}

#[test]
fn audit_and_query_views_agree() {
    // The classification engine and the query layer look at the same data
    // from different angles; their counts must line up.
    let events = export();
    let rows = normalize_events(&events);

    let with_fbc = run_query(&rows, r#"where fbc != "" | select *"#)
        .unwrap()
        .rows
        .iter()
        .filter(|r| !r["fbc"].is_null())
        .count();

    let summary = crate::analyze(
        &serde_json::json!({
            "evt_001": {"output__305546688__querystring__fbc": "fb.1.1710000000.abc"},
            "evt_002": {},
            "evt_003": {},
            "evt_004": {},
        }),
        &crate::AnalysisParams::new("fbc", "305546688"),
    )
    .unwrap();

    assert_eq!(with_fbc, 1);
    assert_eq!(summary.target_events, 1);
    assert_eq!(summary.total_events, 4);
}
