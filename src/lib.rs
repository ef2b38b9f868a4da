//! Griddle — event-tracking audit engine.
//!
//! Takes a tracker export (a JSON object mapping event ids to flat records),
//! derives a filter key from a root id and a filter parameter, and reports
//! how many events captured that parameter. The core is pure and synchronous;
//! the HTTP and CLI surfaces live in the `griddle-http` and `griddle-server`
//! crates.
//!
//! ```
//! use griddle::{analyze, AnalysisParams};
//! use serde_json::json;
//!
//! let data = json!({
//!     "e1": { "output__305546688__querystring__fbc": "fb.1.123" },
//!     "e2": { "output__305546688__querystring__fbc": null },
//! });
//! let params = AnalysisParams::new("fbc", "305546688");
//! let summary = analyze(&data, &params).unwrap();
//! assert_eq!(summary.target_events, 1);
//! assert_eq!(summary.success_rate, 50.0);
//! ```

pub mod analysis;
pub mod error;
pub mod events;
pub mod query;
pub mod types;

#[cfg(test)]
mod integ_tests;

pub use analysis::{analyze, AnalysisSummary};
pub use error::{GriddleError, Result};
pub use types::{AnalysisParams, EventCollection, EventId};
