//! Integration tests kept inline so `cargo test --lib` covers the full
//! pipeline in one process.
//!
//! These exercise library APIs only; HTTP-level coverage lives with the
//! handlers in `griddle-http`.

mod test_analysis;
mod test_query;
