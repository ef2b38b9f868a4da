//! Flattening of raw event records into tabular rows.
//!
//! Tracker exports carry their interesting values under namespaced keys like
//! `output__305546688__meta__handl_fbc`. Normalization pulls the well-known
//! fields out by key suffix so the query layer can treat events as flat rows
//! with stable column names.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::types::EventCollection;

/// Column names of a normalized row, in output order.
pub const COLUMNS: &[&str] = &[
    "event_id",
    "input_event_id",
    "date",
    "status",
    "object_id",
    "object_title",
    "email",
    "event_url",
    "zap_url",
    "updated_by_name",
    "fbc",
    "fbp",
    "ip_address",
    "landing_url",
    "user_agent",
    "utm_campaign",
    "utm_content",
    "utm_medium",
    "utm_source",
    "contact_name",
    "contact_phone",
    "contact_phone_country",
    "event_name",
    "isfire",
];

/// Placeholder bucket for missing values in counts and groupings, so absent
/// and present values never compare against each other.
pub const NONE_BUCKET: &str = "<none>";

/// One event flattened to its well-known tracking fields.
#[derive(Debug, Clone, Serialize, Default)]
pub struct NormalizedEvent {
    pub event_id: String,
    pub input_event_id: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub object_id: Option<String>,
    pub object_title: Option<String>,
    pub email: Option<String>,
    pub event_url: Option<String>,
    pub zap_url: Option<String>,
    pub updated_by_name: Option<String>,
    // Facebook tracking
    pub fbc: Option<String>,
    pub fbp: Option<String>,
    pub ip_address: Option<String>,
    pub landing_url: Option<String>,
    pub user_agent: Option<String>,
    // UTM tracking
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_source: Option<String>,
    // Contact information
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_phone_country: Option<String>,
    pub event_name: Option<String>,
    pub isfire: Option<String>,
}

impl NormalizedEvent {
    /// Value of a column by name; `None` for an unknown column.
    pub fn column(&self, name: &str) -> Option<Option<&str>> {
        let value = match name {
            "event_id" => return Some(Some(self.event_id.as_str())),
            "input_event_id" => &self.input_event_id,
            "date" => &self.date,
            "status" => &self.status,
            "object_id" => &self.object_id,
            "object_title" => &self.object_title,
            "email" => &self.email,
            "event_url" => &self.event_url,
            "zap_url" => &self.zap_url,
            "updated_by_name" => &self.updated_by_name,
            "fbc" => &self.fbc,
            "fbp" => &self.fbp,
            "ip_address" => &self.ip_address,
            "landing_url" => &self.landing_url,
            "user_agent" => &self.user_agent,
            "utm_campaign" => &self.utm_campaign,
            "utm_content" => &self.utm_content,
            "utm_medium" => &self.utm_medium,
            "utm_source" => &self.utm_source,
            "contact_name" => &self.contact_name,
            "contact_phone" => &self.contact_phone,
            "contact_phone_country" => &self.contact_phone_country,
            "event_name" => &self.event_name,
            "isfire" => &self.isfire,
            _ => return None,
        };
        Some(value.as_deref())
    }
}

/// Flatten every event in the collection, in source order.
///
/// A malformed (non-object) record yields a row with only its `event_id`
/// set; normalization never fails.
pub fn normalize_events(events: &EventCollection) -> Vec<NormalizedEvent> {
    events
        .iter()
        .map(|(event_id, record)| normalize_one(event_id, record))
        .collect()
}

fn normalize_one(event_id: &str, record: &Value) -> NormalizedEvent {
    let mut row = NormalizedEvent {
        event_id: event_id.to_string(),
        ..Default::default()
    };

    let Some(fields) = record.as_object() else {
        return row;
    };

    row.date = fields.get("date").and_then(scalar_to_string);
    row.status = fields.get("status").and_then(scalar_to_string);
    row.object_id = fields.get("object_id").and_then(scalar_to_string);
    row.object_title = fields.get("object_title").and_then(scalar_to_string);

    for (key, value) in fields {
        let extracted = || scalar_to_string(value);
        if key.starts_with("output__") && key.ends_with("__event_id") {
            row.input_event_id = extracted();
        } else if key.ends_with("__primary_email") {
            row.email = extracted();
        } else if key.ends_with("__event_url") {
            row.event_url = extracted();
        } else if key.ends_with("__parent_task_history_link") {
            row.zap_url = extracted();
        } else if key.ends_with("__updated_by_name") && row.updated_by_name.is_none() {
            // Only the first occurrence per event counts.
            row.updated_by_name = extracted();
        } else if key.ends_with("__handl_fbc") {
            row.fbc = extracted();
        } else if key.ends_with("__handl_fbp") {
            row.fbp = extracted();
        } else if key.ends_with("__handl_ip") {
            row.ip_address = extracted();
        } else if key.ends_with("__handl_url") {
            row.landing_url = extracted();
        } else if key.ends_with("__handl_user_agent") {
            row.user_agent = extracted();
        } else if key.ends_with("__handl_utm_campaign") {
            row.utm_campaign = extracted();
        } else if key.ends_with("__handl_utm_content") {
            row.utm_content = extracted();
        } else if key.ends_with("__handl_utm_medium") {
            row.utm_medium = extracted();
        } else if key.ends_with("__handl_utm_source") {
            row.utm_source = extracted();
        } else if key.ends_with("__lead__contact__name") && row.contact_name.is_none() {
            row.contact_name = extracted();
        } else if key.ends_with("__lead__contact__phone__phone") && row.contact_phone.is_none() {
            row.contact_phone = extracted();
        } else if key.ends_with("__lead__contact__phone__country")
            && row.contact_phone_country.is_none()
        {
            row.contact_phone_country = extracted();
        }
    }

    let prefer_root = row.object_id.clone().unwrap_or_default();
    row.event_name = first_output_scalar(fields, "event_name", Some(&prefer_root));
    row.isfire = first_output_scalar(fields, "isfire", None);

    row
}

/// First scalar value under `output__<root>__...__<suffix>`.
///
/// Keys under the preferred root win outright; otherwise the shortest
/// matching key wins (stable for equal lengths).
fn first_output_scalar(
    fields: &serde_json::Map<String, Value>,
    suffix: &str,
    prefer_root: Option<&str>,
) -> Option<String> {
    let wanted = format!("__{}", suffix);

    if let Some(root) = prefer_root.filter(|r| !r.is_empty()) {
        let prefix = format!("output__{}__", root);
        for (key, value) in fields {
            if key.starts_with(&prefix) && key.ends_with(&wanted) {
                if let Some(s) = scalar_to_string(value) {
                    return Some(s);
                }
            }
        }
    }

    let mut hits: Vec<(usize, &String, String)> = fields
        .iter()
        .filter(|(key, _)| key.starts_with("output__") && key.ends_with(&wanted))
        .filter_map(|(key, value)| scalar_to_string(value).map(|s| (key.len(), key, s)))
        .collect();
    hits.sort_by_key(|(len, _, _)| *len);
    hits.into_iter().next().map(|(_, _, s)| s)
}

/// Stringified scalar, trimmed. Arrays, objects and null yield `None`.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Catalog of the normalized table: columns plus value counts of the
/// low-cardinality fields.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub columns: Vec<String>,
    pub events_counts: EventsCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventsCounts {
    pub by_status: IndexMap<String, usize>,
    pub by_event_name: IndexMap<String, usize>,
    pub by_isfire: IndexMap<String, usize>,
}

/// Build the catalog for a set of normalized rows.
pub fn build_catalog(rows: &[NormalizedEvent]) -> Catalog {
    Catalog {
        columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        events_counts: EventsCounts {
            by_status: value_counts(rows.iter().map(|r| r.status.as_deref()), None),
            by_event_name: value_counts(rows.iter().map(|r| r.event_name.as_deref()), Some(50)),
            by_isfire: value_counts(rows.iter().map(|r| r.isfire.as_deref()), None),
        },
    }
}

/// Count values, sorting by count descending (ties keep first-seen order).
/// Missing values are counted under [`NONE_BUCKET`] so they never compare
/// against real values.
fn value_counts<'a>(
    values: impl Iterator<Item = Option<&'a str>>,
    top: Option<usize>,
) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for value in values {
        let bucket = value.unwrap_or(NONE_BUCKET).to_string();
        *counts.entry(bucket).or_insert(0) += 1;
    }
    counts.sort_by(|_, a, _, b| b.cmp(a));
    if let Some(top) = top {
        counts.truncate(top);
    }
    counts
}
