use std::env;
use std::io;
use std::path::PathBuf;

/// File extensions visible to every listing operation. Anything else in the
/// data directories is ignored.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "text"];

pub const METADATA_FILE_NAME: &str = "document_metadata.json";

pub const DATA_DIR_ENV: &str = "NOTES_DATA_DIR";
pub const IMPROVE_COMMAND_ENV: &str = "NOTES_IMPROVE_COMMAND";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Shell command implementing the external text-improvement capability.
    /// Unset means `process_raw_file` terminates with a configuration error.
    pub improve_command: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let improve_command = env::var(IMPROVE_COMMAND_ENV)
            .ok()
            .filter(|command| !command.trim().is_empty());

        Self {
            data_dir,
            improve_command,
        }
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.index_dir().join(METADATA_FILE_NAME)
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [self.raw_dir(), self.processed_dir(), self.index_dir()] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

pub fn is_supported_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}
