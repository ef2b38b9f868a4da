use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event identifier — the key of one entry in the uploaded JSON object.
pub type EventId = String;

/// An ordered collection of events keyed by event id.
///
/// Wraps the source JSON object directly; `serde_json`'s `preserve_order`
/// feature keeps the insertion order of the source file, so iteration is
/// deterministic. Field values inside each record are never interpreted
/// beyond a presence/null check at the derived filter key.
#[derive(Debug, Clone, Default)]
pub struct EventCollection {
    events: serde_json::Map<String, Value>,
}

impl EventCollection {
    /// Parse an [`EventCollection`] from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GriddleError::InvalidInput`] if the value is not a
    /// JSON object. An empty object is valid (zero events).
    pub fn from_json(json: &Value) -> crate::error::Result<Self> {
        use crate::error::GriddleError;

        let events = json
            .as_object()
            .ok_or_else(|| {
                GriddleError::InvalidInput("expected a JSON object of events".to_string())
            })?
            .clone();

        Ok(EventCollection { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate events in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.events.iter()
    }

    /// Look up a single event record by id.
    pub fn get(&self, event_id: &str) -> Option<&Value> {
        self.events.get(event_id)
    }
}

/// Caller-supplied parameters for one analysis run.
///
/// `filter_param` and `root_id` are embedded verbatim into the derived filter
/// key; both must be non-empty after trimming (validated by
/// [`crate::analysis::key::build_filter_key`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub filter_param: String,
    pub root_id: String,
    #[serde(default)]
    pub show_ids: bool,
}

impl AnalysisParams {
    pub fn new(filter_param: impl Into<String>, root_id: impl Into<String>) -> Self {
        AnalysisParams {
            filter_param: filter_param.into(),
            root_id: root_id.into(),
            show_ids: false,
        }
    }

    pub fn with_show_ids(mut self, show_ids: bool) -> Self {
        self.show_ids = show_ids;
        self
    }
}
