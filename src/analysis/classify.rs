use crate::types::{EventCollection, EventId};

/// Match verdict for a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome {
    pub event_id: EventId,
    pub matched: bool,
}

/// Full classification of a collection, one outcome per event in input order.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub outcomes: Vec<EventOutcome>,
}

impl Classification {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Classify every event against the derived filter key.
///
/// An event is a target iff the key is present in its record and the value is
/// not JSON null. Absent key, explicit null, or a malformed record (anything
/// that is not a JSON object) all classify as failed — a bad record never
/// aborts the batch. The test is presence + non-null only: `0`, `""` and
/// `false` all count as matches.
pub fn classify(events: &EventCollection, key: &str) -> Classification {
    let outcomes = events
        .iter()
        .map(|(event_id, record)| {
            let matched = record
                .as_object()
                .and_then(|fields| fields.get(key))
                .is_some_and(|value| !value.is_null());
            EventOutcome {
                event_id: event_id.clone(),
                matched,
            }
        })
        .collect();

    Classification { outcomes }
}
