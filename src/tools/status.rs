use crate::storage::DocumentStorage;
use crate::tools::text_result;
use serde_json::{Value, json};

pub fn check_needing_processing(storage: &DocumentStorage) -> Value {
    let stale = storage.files_needing_processing();
    if stale.is_empty() {
        return text_result(
            "All files are up to date - no processing needed",
            Some(json!({"count": 0, "files": []})),
        );
    }

    let names: Vec<String> = stale
        .iter()
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()))
        .map(String::from)
        .collect();

    let mut text = format!("Found {} files needing processing:", names.len());
    for name in &names {
        text.push_str("\n- ");
        text.push_str(name);
    }

    text_result(text, Some(json!({"count": names.len(), "files": names})))
}

pub fn server_status(storage: &DocumentStorage) -> Value {
    let raw_count = storage.list_raw().len();
    let processed_count = storage.list_processed().len();
    let stale_count = storage.files_needing_processing().len();

    let text = format!(
        "{} v{}\n\n\
         Raw Files: {raw_count}\n\
         Processed Files: {processed_count}\n\
         Files Needing Processing: {stale_count}\n\n\
         Directory Structure:\n\
         - Raw Files: {}\n\
         - Processed Files: {}\n\
         - Index Files: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        storage.raw_dir().display(),
        storage.processed_dir().display(),
        storage.index_dir().display(),
    );

    text_result(
        text,
        Some(json!({
            "server": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "raw_files": raw_count,
            "processed_files": processed_count,
            "files_needing_processing": stale_count,
            "raw_dir": storage.raw_dir().display().to_string(),
            "processed_dir": storage.processed_dir().display().to_string(),
            "index_dir": storage.index_dir().display().to_string(),
        })),
    )
}
