use crate::mcp::{contracts, errors};
use crate::storage::DocumentStorage;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub mod documents;
pub mod list_files;
pub mod process_file;
pub mod read_file;
pub mod status;

/// Successful tool result: one textual content block, optionally paired with
/// structured content for machine consumers.
pub fn text_result(text: impl Into<String>, structured: Option<Value>) -> Value {
    let text = text.into();
    let mut result = json!({
        "content": [{"type": "text", "text": text}],
        "isError": false
    });
    if let Some(structured) = structured
        && let Some(obj) = result.as_object_mut()
    {
        obj.insert("structuredContent".to_string(), structured);
    }
    result
}

pub fn error_result(kind: &'static str, message: impl Into<String>) -> Value {
    let message = message.into();
    json!({
        "content": [{"type": "text", "text": format!("Error: {message}")}],
        "structuredContent": {"error": {"kind": kind, "message": message}},
        "isError": true
    })
}

/// One variant per operation; each knows its contract descriptor and its
/// execution body. The closed set keeps dispatch a plain match instead of a
/// trait-object hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    ListRawFiles,
    ListProcessedFiles,
    ReadRawFile,
    ReadProcessedFile,
    GetDocumentInfo,
    ListAllDocuments,
    CheckFilesNeedingProcessing,
    GetServerStatus,
    ProcessRawFile,
}

pub const ALL_TOOLS: &[ToolKind] = &[
    ToolKind::ListRawFiles,
    ToolKind::ListProcessedFiles,
    ToolKind::ReadRawFile,
    ToolKind::ReadProcessedFile,
    ToolKind::GetDocumentInfo,
    ToolKind::ListAllDocuments,
    ToolKind::CheckFilesNeedingProcessing,
    ToolKind::GetServerStatus,
    ToolKind::ProcessRawFile,
];

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::ListRawFiles => contracts::TOOL_LIST_RAW_FILES,
            ToolKind::ListProcessedFiles => contracts::TOOL_LIST_PROCESSED_FILES,
            ToolKind::ReadRawFile => contracts::TOOL_READ_RAW_FILE,
            ToolKind::ReadProcessedFile => contracts::TOOL_READ_PROCESSED_FILE,
            ToolKind::GetDocumentInfo => contracts::TOOL_GET_DOCUMENT_INFO,
            ToolKind::ListAllDocuments => contracts::TOOL_LIST_ALL_DOCUMENTS,
            ToolKind::CheckFilesNeedingProcessing => {
                contracts::TOOL_CHECK_FILES_NEEDING_PROCESSING
            }
            ToolKind::GetServerStatus => contracts::TOOL_GET_SERVER_STATUS,
            ToolKind::ProcessRawFile => contracts::TOOL_PROCESS_RAW_FILE,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::ListRawFiles => {
                "List all raw handwritten text files available for processing"
            }
            ToolKind::ListProcessedFiles => "List all processed and cleaned text files",
            ToolKind::ReadRawFile => "Read the content of a raw handwritten text file",
            ToolKind::ReadProcessedFile => "Read the content of a processed/cleaned text file",
            ToolKind::GetDocumentInfo => {
                "Get metadata and processing information for a specific document"
            }
            ToolKind::ListAllDocuments => {
                "List all documents with their metadata and processing status"
            }
            ToolKind::CheckFilesNeedingProcessing => {
                "Check which files need processing (new or changed files)"
            }
            ToolKind::GetServerStatus => {
                "Get the current status of the MCP server and storage system"
            }
            ToolKind::ProcessRawFile => {
                "Process a raw text file through the improvement service to fix \
                 formatting, typos, and OCR errors"
            }
        }
    }

    pub fn required_args(self) -> &'static [&'static str] {
        match self {
            ToolKind::ReadRawFile
            | ToolKind::ReadProcessedFile
            | ToolKind::GetDocumentInfo
            | ToolKind::ProcessRawFile => &["filename"],
            _ => &[],
        }
    }

    pub fn definition(self) -> Value {
        let schema = match self {
            ToolKind::ReadRawFile => contracts::filename_schema("Name of the file to read"),
            ToolKind::ReadProcessedFile => {
                contracts::filename_schema("Name of the processed file to read")
            }
            ToolKind::GetDocumentInfo => {
                contracts::filename_schema("Name of the document to get info for")
            }
            ToolKind::ProcessRawFile => {
                contracts::filename_schema("Name of the raw file to process")
            }
            _ => contracts::no_args_schema(),
        };
        json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": schema
        })
    }

    fn execute(self, storage: &DocumentStorage, args: &Value) -> Value {
        match self {
            ToolKind::ListRawFiles => list_files::list_raw(storage),
            ToolKind::ListProcessedFiles => list_files::list_processed(storage),
            ToolKind::ReadRawFile => read_file::read_raw(storage, args),
            ToolKind::ReadProcessedFile => read_file::read_processed(storage, args),
            ToolKind::GetDocumentInfo => documents::document_info(storage, args),
            ToolKind::ListAllDocuments => documents::list_all(storage),
            ToolKind::CheckFilesNeedingProcessing => status::check_needing_processing(storage),
            ToolKind::GetServerStatus => status::server_status(storage),
            ToolKind::ProcessRawFile => process_file::call(storage, args),
        }
    }
}

/// Fails when any required argument is absent or an empty string. Empty is
/// treated as absent to keep blank-filename operations out of the storage
/// layer.
pub fn validate_required(args: &Value, required: &[&str]) -> Option<String> {
    for arg in required {
        let present = args
            .get(arg)
            .and_then(|value| value.as_str())
            .is_some_and(|value| !value.is_empty());
        if !present {
            return Some(format!("{arg} is required"));
        }
    }
    None
}

/// Name → handler map. Dispatch validates arguments and converts every
/// failure, including panics, into a textual result; nothing propagates past
/// this boundary.
pub struct ToolRegistry {
    storage: Arc<DocumentStorage>,
    handlers: BTreeMap<&'static str, ToolKind>,
}

impl ToolRegistry {
    pub fn new(storage: Arc<DocumentStorage>) -> Self {
        let mut registry = Self {
            storage,
            handlers: BTreeMap::new(),
        };
        for tool in ALL_TOOLS {
            registry.register(*tool);
        }
        registry
    }

    /// Last registration for a name wins; replacing an existing handler is
    /// logged rather than rejected.
    pub fn register(&mut self, tool: ToolKind) {
        if self.handlers.insert(tool.name(), tool).is_some() {
            warn!("replaced tool handler: {}", tool.name());
        } else {
            debug!("registered tool handler: {}", tool.name());
        }
    }

    pub fn resolve(&self, name: &str) -> Option<ToolKind> {
        self.handlers.get(name).copied()
    }

    pub fn tool_definitions(&self) -> Vec<Value> {
        self.handlers.values().map(|tool| tool.definition()).collect()
    }

    pub fn dispatch(&self, name: &str, args: &Value) -> Value {
        let Some(tool) = self.resolve(name) else {
            return error_result(errors::UNKNOWN_TOOL, format!("Unknown tool: {name}"));
        };

        if let Some(message) = validate_required(args, tool.required_args()) {
            return error_result(errors::VALIDATION, message);
        }

        let storage = Arc::clone(&self.storage);
        match panic::catch_unwind(AssertUnwindSafe(|| tool.execute(&storage, args))) {
            Ok(result) => result,
            Err(cause) => {
                let detail = cause
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| cause.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unexpected panic".to_string());
                error!("error in tool call {name}: {detail}");
                error_result(errors::INTERNAL_ERROR, format!("Error executing {name}"))
            }
        }
    }
}
