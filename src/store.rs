//! Local record store
//!
//! A read-only view of the property records the data-entry page persists.
//! The browser kept them under a single storage key; here they live in one
//! JSON file named after that key.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::records::{records_from_rows, PropertyRecord};

/// Storage key of the persisted record array
pub const STORE_KEY: &str = "sabir_realestate_properties_v1";

/// Default location: `<data_local_dir>/rentboard/<STORE_KEY>.json`
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("rentboard"))
        .unwrap_or_else(|| PathBuf::from("./rentboard_data"))
        .join(format!("{}.json", STORE_KEY))
}

/// Errors that can occur reading the local store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only local record store
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record
    ///
    /// A missing or empty file, invalid JSON, or a value that is not an
    /// array all yield no records. Other I/O failures are errors.
    pub fn load(&self) -> Result<Vec<PropertyRecord>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "local store not found");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        Ok(parse_records(&raw))
    }
}

/// Parse the persisted form, tolerating garbage
pub fn parse_records(raw: &str) -> Vec<PropertyRecord> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => records_from_rows(&items),
        Ok(_) => {
            tracing::warn!("local store does not hold an array, ignoring it");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "local store is not valid JSON, ignoring it");
            Vec::new()
        }
    }
}
