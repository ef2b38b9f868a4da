use serde::{Deserialize, Serialize};

use super::classify::Classification;
use crate::types::EventId;

/// The sole output artifact of an analysis run, immutable once produced.
///
/// Serializes to the wire shape shared by the CLI and the HTTP API; the id
/// lists are present only when the caller asked for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AnalysisSummary {
    pub total_events: usize,
    pub target_events: usize,
    pub failed_events: usize,
    /// Percentage of target events out of total, rounded to two decimals.
    /// `0.0` for an empty collection.
    pub success_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_event_ids: Option<Vec<EventId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_event_ids: Option<Vec<EventId>>,
    /// Canonical text report, byte-identical between CLI and API consumers.
    #[serde(default)]
    pub output_content: String,
}

/// Aggregate a classification into counts and the success rate.
///
/// `output_content` is left empty here; [`super::report::format_report`]
/// fills it in.
pub fn aggregate(classification: &Classification, show_ids: bool) -> AnalysisSummary {
    let total_events = classification.len();
    let target_events = classification.outcomes.iter().filter(|o| o.matched).count();
    let failed_events = total_events - target_events;

    let success_rate = if total_events == 0 {
        0.0
    } else {
        round2(target_events as f64 / total_events as f64 * 100.0)
    };

    let (target_event_ids, failed_event_ids) = if show_ids {
        let mut target = Vec::with_capacity(target_events);
        let mut failed = Vec::with_capacity(failed_events);
        for outcome in &classification.outcomes {
            if outcome.matched {
                target.push(outcome.event_id.clone());
            } else {
                failed.push(outcome.event_id.clone());
            }
        }
        (Some(target), Some(failed))
    } else {
        (None, None)
    };

    AnalysisSummary {
        total_events,
        target_events,
        failed_events,
        success_rate,
        target_event_ids,
        failed_event_ids,
        output_content: String::new(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
