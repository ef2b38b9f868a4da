//! Execution of parsed queries over normalized event rows.

use serde::Serialize;
use serde_json::{json, Value};

use super::parser::{Condition, ParsedQuery};
use crate::error::{GriddleError, Result};
use crate::events::{NormalizedEvent, NONE_BUCKET};

/// Safety guardrail for bare projections with no explicit window.
const DEFAULT_LIMIT: usize = 100;

/// Values treated as boolean when a condition compares against a literal.
const TRUE_LIKE: &[&str] = &["yes", "true", "1"];
const FALSE_LIKE: &[&str] = &["no", "false", "0", ""];

/// Result of one query: rows plus execution metadata.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub rows: Vec<Value>,
    pub meta: Value,
}

/// Run a DSL query against normalized rows.
///
/// # Errors
///
/// [`GriddleError::InvalidQuery`] on syntax errors or unknown columns.
pub fn run_query(rows: &[NormalizedEvent], dsl: &str) -> Result<QueryOutcome> {
    if rows.is_empty() {
        return Ok(QueryOutcome {
            rows: vec![],
            meta: json!({ "note": "no data" }),
        });
    }

    let query = super::parser::parse_query(dsl)?;
    validate_columns(&query)?;

    let filtered: Vec<&NormalizedEvent> = rows
        .iter()
        .filter(|row| query.conditions.iter().all(|c| matches_condition(row, c)))
        .collect();

    let explicit_window = query.limit.is_some() || query.offset != 0;

    if let Some(group_by) = &query.group_by {
        let grouped = group_rows(&filtered, group_by);
        let total = grouped.len();
        let windowed = if explicit_window {
            window(&grouped, query.offset, query.limit)
        } else {
            grouped
        };
        let mut meta = json!({
            "group_by": group_by,
            "total_rows": total,
            "limit": query.limit,
            "offset": query.offset,
        });
        if query.want_count {
            meta["count"] = json!(true);
        }
        return Ok(QueryOutcome {
            rows: windowed,
            meta,
        });
    }

    let total_rows = filtered.len();
    let projected: Vec<Value> = filtered
        .iter()
        .map(|row| serde_json::to_value(row).unwrap_or(Value::Null))
        .collect();

    if query.select_all {
        let out = if explicit_window {
            window(&projected, query.offset, query.limit)
        } else {
            projected
        };
        return Ok(QueryOutcome {
            meta: json!({
                "select": "*",
                "rows": out.len(),
                "total_rows": total_rows,
                "limit": query.limit,
                "offset": query.offset,
            }),
            rows: out,
        });
    }

    if !explicit_window {
        let out: Vec<Value> = projected.into_iter().take(DEFAULT_LIMIT).collect();
        return Ok(QueryOutcome {
            meta: json!({
                "rows": out.len(),
                "total_rows": total_rows,
                "limit": DEFAULT_LIMIT,
                "offset": 0,
                "note": "default limit applied",
            }),
            rows: out,
        });
    }

    let out = window(&projected, query.offset, query.limit);
    Ok(QueryOutcome {
        meta: json!({
            "rows": out.len(),
            "total_rows": total_rows,
            "limit": query.limit,
            "offset": query.offset,
        }),
        rows: out,
    })
}

fn validate_columns(query: &ParsedQuery) -> Result<()> {
    let known = |name: &str| crate::events::COLUMNS.contains(&name);

    for condition in &query.conditions {
        if !known(condition.column()) {
            return Err(GriddleError::InvalidQuery(format!(
                "unknown column: {}",
                condition.column()
            )));
        }
    }
    if let Some(group_by) = &query.group_by {
        for column in group_by {
            if !known(column) {
                return Err(GriddleError::InvalidQuery(format!(
                    "unknown column: {}",
                    column
                )));
            }
        }
    }
    Ok(())
}

fn matches_condition(row: &NormalizedEvent, condition: &Condition) -> bool {
    // Column existence is validated up front, so a miss here means the value
    // is absent for this row.
    let cell = row.column(condition.column()).flatten();
    match condition {
        Condition::Equals { value, .. } => cell == Some(value.as_str()),
        Condition::NotEquals { value, .. } => cell != Some(value.as_str()),
        Condition::EqualsBool { value, .. } => bool_like(cell) == Some(*value),
        Condition::In { values, .. } => {
            cell.is_some_and(|c| values.iter().any(|v| v == c))
        }
    }
}

/// Map loosely-typed tracker values onto booleans; `None` when neither side
/// matches.
fn bool_like(cell: Option<&str>) -> Option<bool> {
    let v = cell?.trim().to_lowercase();
    if TRUE_LIKE.contains(&v.as_str()) {
        return Some(true);
    }
    if FALSE_LIKE.contains(&v.as_str()) {
        return Some(false);
    }
    None
}

/// Grouped row counts, groups in first-seen order.
fn group_rows(rows: &[&NormalizedEvent], group_by: &[String]) -> Vec<Value> {
    let mut counts: indexmap::IndexMap<Vec<String>, usize> = indexmap::IndexMap::new();

    for row in rows {
        let key: Vec<String> = group_by
            .iter()
            .map(|column| {
                row.column(column)
                    .flatten()
                    .unwrap_or(NONE_BUCKET)
                    .to_string()
            })
            .collect();
        *counts.entry(key).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(key, count)| {
            let mut obj = serde_json::Map::new();
            for (column, value) in group_by.iter().zip(key) {
                obj.insert(column.clone(), Value::String(value));
            }
            obj.insert("count".to_string(), json!(count));
            Value::Object(obj)
        })
        .collect()
}

fn window(rows: &[Value], offset: usize, limit: Option<usize>) -> Vec<Value> {
    let start = offset.min(rows.len());
    let slice = match limit {
        Some(limit) => &rows[start..(start + limit).min(rows.len())],
        None => &rows[start..],
    };
    slice.to_vec()
}
