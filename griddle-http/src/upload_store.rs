//! Short-lived storage for parsed uploads.
//!
//! The upload handler parses a file once, parks the parsed payload here under
//! a fresh `temp_id`, and later requests (event detail, queries, catalog)
//! read it back without re-uploading. Payloads live as JSON files in a
//! process-owned temp directory; the directory is removed when the process
//! exits. Entries expire after a TTL and the store holds at most
//! `max_entries` payloads, evicting the oldest first.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use tempfile::TempDir;

use griddle::error::{GriddleError, Result};

const DEFAULT_TTL_SECS: u64 = 3600;
const DEFAULT_MAX_ENTRIES: usize = 100;

pub struct UploadStore {
    dir: TempDir,
    entries: DashMap<String, UploadEntry>,
    ttl: Duration,
    max_entries: usize,
}

struct UploadEntry {
    path: PathBuf,
    filename: String,
    created_at: Instant,
}

impl UploadStore {
    /// Create a store with the TTL from `GRIDDLE_UPLOAD_TTL_SECS` (default
    /// 3600s) and the default entry cap.
    pub fn new() -> Result<Self> {
        let ttl_secs = std::env::var("GRIDDLE_UPLOAD_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECS);
        Self::with_settings(Duration::from_secs(ttl_secs), DEFAULT_MAX_ENTRIES)
    }

    pub fn with_settings(ttl: Duration, max_entries: usize) -> Result<Self> {
        let dir = TempDir::with_prefix("griddle-uploads-")
            .map_err(|e| GriddleError::Io(format!("failed to create upload dir: {}", e)))?;
        Ok(UploadStore {
            dir,
            entries: DashMap::new(),
            ttl,
            max_entries,
        })
    }

    /// Park a parsed payload; returns the `temp_id` handle.
    pub fn insert(&self, data: &Value, filename: &str) -> Result<String> {
        self.evict_expired();
        if self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }

        let temp_id = uuid::Uuid::new_v4().to_string();
        let path = self.dir.path().join(format!("upload_{}.json", temp_id));
        std::fs::write(&path, serde_json::to_vec(data)?)?;

        self.entries.insert(
            temp_id.clone(),
            UploadEntry {
                path,
                filename: filename.to_string(),
                created_at: Instant::now(),
            },
        );
        tracing::debug!(temp_id = %temp_id, filename = %filename, "upload stored");
        Ok(temp_id)
    }

    /// Read a payload back. Expired or unknown ids surface as
    /// [`GriddleError::UploadNotFound`].
    pub fn load(&self, temp_id: &str) -> Result<Value> {
        let path = {
            let entry = self
                .entries
                .get(temp_id)
                .ok_or_else(|| GriddleError::UploadNotFound(temp_id.to_string()))?;
            if entry.created_at.elapsed() > self.ttl {
                drop(entry);
                self.remove(temp_id);
                return Err(GriddleError::UploadNotFound(temp_id.to_string()));
            }
            entry.path.clone()
        };

        let bytes = std::fs::read(&path)
            .map_err(|_| GriddleError::UploadNotFound(temp_id.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Original filename of a stored upload, if still held.
    pub fn filename(&self, temp_id: &str) -> Option<String> {
        self.entries.get(temp_id).map(|e| e.filename.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry past its TTL.
    pub fn evict_expired(&self) {
        let ttl = self.ttl;
        let mut removed_paths = Vec::new();
        self.entries.retain(|_, entry| {
            let keep = entry.created_at.elapsed() <= ttl;
            if !keep {
                removed_paths.push(entry.path.clone());
            }
            keep
        });
        for path in removed_paths {
            let _ = std::fs::remove_file(path);
        }
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|e| e.value().created_at)
            .map(|e| e.key().clone());
        if let Some(temp_id) = oldest {
            tracing::debug!(temp_id = %temp_id, "upload store full, evicting oldest");
            self.remove(&temp_id);
        }
    }

    fn remove(&self, temp_id: &str) {
        if let Some((_, entry)) = self.entries.remove(temp_id) {
            let _ = std::fs::remove_file(entry.path);
        }
    }
}
