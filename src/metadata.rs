use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{error, warn};

/// Lifecycle metadata captured at a document's last successful processing.
/// A record exists iff the document has been processed at least once;
/// absence means "never processed", not "processing failed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub content_hash: String,
    pub processed_at: DateTime<Utc>,
    pub raw_path: String,
    pub processed_path: String,
    pub size_bytes: u64,
}

/// Durable name → record map, persisted as a single pretty-printed JSON
/// snapshot. Loaded eagerly, rewritten wholesale on every mutation.
pub struct MetadataStore {
    path: PathBuf,
    records: Mutex<BTreeMap<String, DocumentRecord>>,
}

impl MetadataStore {
    /// Opens the store, loading the snapshot if present. A corrupt snapshot
    /// is logged and treated as empty: "nothing has ever been processed" is
    /// the recovery state, not a fatal error.
    pub fn open(path: PathBuf) -> Self {
        let records = Self::load(&path);
        Self {
            path,
            records: Mutex::new(records),
        }
    }

    fn load(path: &Path) -> BTreeMap<String, DocumentRecord> {
        if !path.exists() {
            return BTreeMap::new();
        }
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("failed to load metadata from {}: {err}", path.display());
                return BTreeMap::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(err) => {
                warn!("failed to parse metadata in {}: {err}", path.display());
                BTreeMap::new()
            }
        }
    }

    /// Persists the full map, temp-file-then-rename so readers never observe
    /// a partial snapshot. On failure the in-memory map remains the source
    /// of truth for the rest of the process lifetime.
    fn save(&self, records: &BTreeMap<String, DocumentRecord>) {
        let serialized = match serde_json::to_vec_pretty(records) {
            Ok(serialized) => serialized,
            Err(err) => {
                error!("failed to serialize metadata: {err}");
                return;
            }
        };
        let tmp = self.path.with_extension("json.tmp");
        if let Err(err) = fs::write(&tmp, &serialized) {
            error!("failed to write metadata to {}: {err}", tmp.display());
            return;
        }
        if let Err(err) = fs::rename(&tmp, &self.path) {
            error!("failed to replace metadata at {}: {err}", self.path.display());
        }
    }

    pub fn upsert(&self, name: &str, record: DocumentRecord) {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        records.insert(name.to_string(), record);
        self.save(&records);
    }

    pub fn get(&self, name: &str) -> Option<DocumentRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Read-only snapshot of all records.
    pub fn all(&self) -> BTreeMap<String, DocumentRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
