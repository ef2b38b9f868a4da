use std::sync::Arc;

use crate::upload_store::UploadStore;

pub mod analyze;
pub mod events;
pub mod health;
pub mod upload;

pub struct AppState {
    pub uploads: Arc<UploadStore>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(uploads: Arc<UploadStore>) -> Self {
        AppState {
            uploads,
            start_time: std::time::Instant::now(),
        }
    }
}

pub use analyze::analyze_events;
pub use events::{catalog, event_detail, query_events};
pub use health::health;
pub use upload::upload_file;
