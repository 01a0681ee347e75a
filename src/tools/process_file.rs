use crate::mcp::errors;
use crate::storage::{DocumentStorage, ProcessError};
use crate::tools::read_file::filename_arg;
use crate::tools::{error_result, text_result};
use serde_json::{Value, json};
use tracing::error;

pub fn call(storage: &DocumentStorage, args: &Value) -> Value {
    let filename = filename_arg(args);
    match storage.process(filename) {
        Ok(outcome) => {
            let destination = outcome.processed_path.display().to_string();
            text_result(
                format!(
                    "Successfully processed '{filename}' -> {destination}\n\n\
                     Preview:\n{}",
                    outcome.preview
                ),
                Some(json!({
                    "filename": filename,
                    "processed_path": destination,
                    "preview": outcome.preview,
                })),
            )
        }
        Err(err) => {
            error!("processing {filename} failed: {err}");
            error_result(error_kind(&err), err.to_string())
        }
    }
}

fn error_kind(err: &ProcessError) -> &'static str {
    match err {
        ProcessError::NotConfigured => errors::NOT_CONFIGURED,
        ProcessError::NotFound(_) => errors::NOT_FOUND,
        ProcessError::Unreadable(_) | ProcessError::WriteFailed(_) => errors::IO_ERROR,
        ProcessError::Service(_) => errors::SERVICE_ERROR,
    }
}
