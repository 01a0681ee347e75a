use crate::mcp::errors;
use crate::storage::DocumentStorage;
use crate::tools::read_file::filename_arg;
use crate::tools::{error_result, text_result};
use serde_json::{Value, json};

pub fn document_info(storage: &DocumentStorage, args: &Value) -> Value {
    let filename = filename_arg(args);
    let Some(record) = storage.document_info(filename) else {
        return error_result(
            errors::NOT_FOUND,
            format!("no metadata found for '{filename}'"),
        );
    };

    let text = format!(
        "Document Information for '{filename}':\n\n\
         - content_hash: {}\n\
         - processed_at: {}\n\
         - raw_path: {}\n\
         - processed_path: {}\n\
         - size_bytes: {}",
        record.content_hash,
        record.processed_at.to_rfc3339(),
        record.raw_path,
        record.processed_path,
        record.size_bytes,
    );

    let structured = serde_json::to_value(&record).unwrap_or_else(|_| json!({}));
    text_result(text, Some(json!({"filename": filename, "record": structured})))
}

pub fn list_all(storage: &DocumentStorage) -> Value {
    let documents = storage.all_documents();
    if documents.is_empty() {
        return text_result("No documents found in the system", None);
    }

    let mut text = format!("All Documents ({} total):\n", documents.len());
    for (filename, record) in &documents {
        let hash_prefix: String = record.content_hash.chars().take(8).collect();
        text.push_str(&format!(
            "\n{filename}\n   processed: {}\n   size: {} bytes\n   hash: {hash_prefix}...\n",
            record.processed_at.to_rfc3339(),
            record.size_bytes,
        ));
    }

    let structured = serde_json::to_value(&documents).unwrap_or_else(|_| json!({}));
    text_result(
        text,
        Some(json!({"count": documents.len(), "documents": structured})),
    )
}
