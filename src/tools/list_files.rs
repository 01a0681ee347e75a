use crate::storage::DocumentStorage;
use crate::tools::text_result;
use serde_json::{Value, json};
use std::path::PathBuf;

pub fn list_raw(storage: &DocumentStorage) -> Value {
    listing("raw", storage.list_raw())
}

pub fn list_processed(storage: &DocumentStorage) -> Value {
    listing("processed", storage.list_processed())
}

fn listing(label: &str, files: Vec<PathBuf>) -> Value {
    let names: Vec<String> = files
        .iter()
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()))
        .map(String::from)
        .collect();

    let mut text = format!("Found {} {label} files:", names.len());
    for name in &names {
        text.push_str("\n- ");
        text.push_str(name);
    }

    text_result(
        text,
        Some(json!({"count": names.len(), "files": names})),
    )
}
