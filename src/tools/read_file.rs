use crate::mcp::errors;
use crate::storage::DocumentStorage;
use crate::tools::{error_result, text_result};
use serde_json::{Value, json};

pub fn read_raw(storage: &DocumentStorage, args: &Value) -> Value {
    let filename = filename_arg(args);
    match storage.read_raw(filename) {
        Some(content) => text_result(
            format!("Content of '{filename}':\n\n{content}"),
            Some(json!({"filename": filename, "content": content})),
        ),
        None => error_result(
            errors::NOT_FOUND,
            format!("could not read file '{filename}' or file does not exist"),
        ),
    }
}

pub fn read_processed(storage: &DocumentStorage, args: &Value) -> Value {
    let filename = filename_arg(args);
    match storage.read_processed(filename) {
        Some(content) => text_result(
            format!("Content of processed '{filename}':\n\n{content}"),
            Some(json!({"filename": filename, "content": content})),
        ),
        None => error_result(
            errors::NOT_FOUND,
            format!("could not read processed file '{filename}' or file does not exist"),
        ),
    }
}

// required-argument presence is enforced at the dispatch boundary
pub(crate) fn filename_arg(args: &Value) -> &str {
    args.get("filename")
        .and_then(|value| value.as_str())
        .unwrap_or_default()
}
