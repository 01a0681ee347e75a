use serde_json::json;

pub const TOOL_LIST_RAW_FILES: &str = "list_raw_files";
pub const TOOL_LIST_PROCESSED_FILES: &str = "list_processed_files";
pub const TOOL_READ_RAW_FILE: &str = "read_raw_file";
pub const TOOL_READ_PROCESSED_FILE: &str = "read_processed_file";
pub const TOOL_GET_DOCUMENT_INFO: &str = "get_document_info";
pub const TOOL_LIST_ALL_DOCUMENTS: &str = "list_all_documents";
pub const TOOL_CHECK_FILES_NEEDING_PROCESSING: &str = "check_files_needing_processing";
pub const TOOL_GET_SERVER_STATUS: &str = "get_server_status";
pub const TOOL_PROCESS_RAW_FILE: &str = "process_raw_file";

pub fn no_args_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

pub fn filename_schema(description: &str) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "filename": {
                "type": "string",
                "description": description
            }
        },
        "required": ["filename"]
    })
}
