use crate::config::{self, Config};
use crate::hash;
use crate::improve::{ImproveError, Improver};
use crate::metadata::{DocumentRecord, MetadataStore};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{error, info};

/// Terminal outcomes of the `process` workflow. Every step short-circuits
/// here; nothing is retried within a single invocation.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("improvement service is not configured; set {}", config::IMPROVE_COMMAND_ENV)]
    NotConfigured,
    #[error("raw file '{0}' does not exist")]
    NotFound(String),
    #[error("could not read raw file '{0}'")]
    Unreadable(String),
    #[error("improvement service failed: {0}")]
    Service(#[from] ImproveError),
    #[error("failed to write processed file '{0}'")]
    WriteFailed(String),
}

#[derive(Debug)]
pub struct ProcessOutcome {
    pub processed_path: PathBuf,
    /// First 300 characters of the improved text.
    pub preview: String,
}

pub const PREVIEW_CHARS: usize = 300;

/// Domain facade over the raw/processed directories and the metadata store.
/// The improvement capability is injected at construction so tests can
/// substitute a stub.
pub struct DocumentStorage {
    raw_dir: PathBuf,
    processed_dir: PathBuf,
    index_dir: PathBuf,
    metadata: MetadataStore,
    improver: Option<Box<dyn Improver>>,
    // serializes overlapping process() calls for the same document name
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DocumentStorage {
    pub fn new(config: &Config, improver: Option<Box<dyn Improver>>) -> Self {
        Self {
            raw_dir: config.raw_dir(),
            processed_dir: config.processed_dir(),
            index_dir: config.index_dir(),
            metadata: MetadataStore::open(config.metadata_path()),
            improver,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    /// All supported files in the raw directory, sorted by name.
    pub fn list_raw(&self) -> Vec<PathBuf> {
        list_supported_files(&self.raw_dir)
    }

    /// All supported files in the processed directory, sorted by name.
    pub fn list_processed(&self) -> Vec<PathBuf> {
        list_supported_files(&self.processed_dir)
    }

    /// Content of a raw file, or `None` when the file is missing or not
    /// valid UTF-8. Decode failures are logged and reported as absence.
    pub fn read_raw(&self, filename: &str) -> Option<String> {
        read_text_file(&self.raw_dir.join(filename))
    }

    pub fn read_processed(&self, filename: &str) -> Option<String> {
        read_text_file(&self.processed_dir.join(filename))
    }

    /// Creates or overwrites a processed file. Returns false on any I/O
    /// failure; the failure is logged, never thrown.
    pub fn write_processed(&self, filename: &str, content: &str) -> bool {
        let path = self.processed_dir.join(filename);
        match fs::write(&path, content) {
            Ok(()) => {
                info!("saved processed file: {filename}");
                true
            }
            Err(err) => {
                error!("failed to write processed {filename}: {err}");
                false
            }
        }
    }

    /// Staleness check: true when the file has no record or its current
    /// content hash differs from the recorded one. A file that no longer
    /// exists is reported as not needing processing.
    pub fn needs_processing(&self, raw_file: &Path) -> bool {
        if !raw_file.exists() {
            return false;
        }
        let Some(name) = raw_file.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let Some(record) = self.metadata.get(name) else {
            return true;
        };
        hash::hash_file(raw_file) != record.content_hash
    }

    /// `list_raw` filtered to stale files, preserving the sorted order.
    pub fn files_needing_processing(&self) -> Vec<PathBuf> {
        self.list_raw()
            .into_iter()
            .filter(|file| self.needs_processing(file))
            .collect()
    }

    pub fn document_info(&self, filename: &str) -> Option<DocumentRecord> {
        self.metadata.get(filename)
    }

    pub fn all_documents(&self) -> BTreeMap<String, DocumentRecord> {
        self.metadata.all()
    }

    /// Records a successful processing run: the raw file's current hash and
    /// size, stamped now. Call only after the processed write is confirmed.
    pub fn mark_processed(&self, raw_file: &Path, processed_file: &Path) {
        let Some(name) = raw_file.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let size_bytes = fs::metadata(raw_file).map(|m| m.len()).unwrap_or(0);
        let record = DocumentRecord {
            content_hash: hash::hash_file(raw_file),
            processed_at: Utc::now(),
            raw_path: raw_file.display().to_string(),
            processed_path: processed_file.display().to_string(),
            size_bytes,
        };
        self.metadata.upsert(name, record);
        info!("marked {name} as processed");
    }

    /// The processing workflow: config check → exists → read → improve →
    /// write → mark. Metadata is updated only after a confirmed write, so a
    /// failed run never makes a document look up to date.
    pub fn process(&self, filename: &str) -> Result<ProcessOutcome, ProcessError> {
        let improver = self.improver.as_deref().ok_or(ProcessError::NotConfigured)?;

        let lock = self.document_lock(filename);
        let _held = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let raw_path = self.raw_dir.join(filename);
        if !raw_path.is_file() {
            return Err(ProcessError::NotFound(filename.to_string()));
        }

        let content = self
            .read_raw(filename)
            .ok_or_else(|| ProcessError::Unreadable(filename.to_string()))?;

        let improved = improver.improve(&content)?;

        if !self.write_processed(filename, &improved) {
            return Err(ProcessError::WriteFailed(filename.to_string()));
        }

        let processed_path = self.processed_dir.join(filename);
        self.mark_processed(&raw_path, &processed_path);

        Ok(ProcessOutcome {
            processed_path,
            preview: improved.chars().take(PREVIEW_CHARS).collect(),
        })
    }

    fn document_lock(&self, filename: &str) -> Arc<Mutex<()>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        in_flight
            .entry(filename.to_string())
            .or_default()
            .clone()
    }
}

fn list_supported_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            error!("failed to list {}: {err}", dir.display());
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && config::is_supported_extension(path))
        .collect();
    files.sort();
    files
}

fn read_text_file(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            None
        }
    }
}
