use super::summary::AnalysisSummary;
use crate::types::AnalysisParams;

/// Render the canonical text report for an analysis.
///
/// The first four lines are a compatibility contract with downstream
/// consumers and must stay byte-for-byte stable:
///
/// ```text
/// total events: 2
/// target events: 1
/// failed events: 1
/// success rate: 50.00%
/// ```
///
/// When id listings were requested, each non-empty list follows under its own
/// label, separated from the summary block by a blank line. Lines are joined
/// with `\n` and the report carries no trailing newline.
pub fn format_report(summary: &AnalysisSummary, params: &AnalysisParams) -> String {
    let mut lines = vec![
        format!("total events: {}", summary.total_events),
        format!("target events: {}", summary.target_events),
        format!("failed events: {}", summary.failed_events),
        format!("success rate: {:.2}%", summary.success_rate),
    ];

    if params.show_ids {
        if let Some(ids) = summary.target_event_ids.as_deref() {
            if !ids.is_empty() {
                lines.push("\nlist of ids of target events".to_string());
                lines.extend(ids.iter().cloned());
            }
        }
        if let Some(ids) = summary.failed_event_ids.as_deref() {
            if !ids.is_empty() {
                lines.push("\nlist of ids of failed events".to_string());
                lines.extend(ids.iter().cloned());
            }
        }
    }

    lines.join("\n")
}
