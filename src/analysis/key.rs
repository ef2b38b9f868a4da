use crate::error::{GriddleError, Result};

/// Build the derived filter key for one analysis run.
///
/// The key follows the fixed tracker-export convention
/// `output__{root_id}__querystring__{filter_param}` and is recomputed once per
/// analysis, then reused for every event lookup.
///
/// Both values are embedded verbatim — no escaping. A `root_id` or
/// `filter_param` that itself contains `__` can collide with the template
/// separators; callers own that constraint.
///
/// # Errors
///
/// Returns [`GriddleError::InvalidParameter`] when either argument is empty
/// after trimming.
pub fn build_filter_key(root_id: &str, filter_param: &str) -> Result<String> {
    if root_id.trim().is_empty() {
        return Err(GriddleError::InvalidParameter(
            "root_id must not be empty".to_string(),
        ));
    }
    if filter_param.trim().is_empty() {
        return Err(GriddleError::InvalidParameter(
            "filter_param must not be empty".to_string(),
        ));
    }
    Ok(format!("output__{}__querystring__{}", root_id, filter_param))
}
