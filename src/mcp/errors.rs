pub const VALIDATION: &str = "validation";
pub const NOT_FOUND: &str = "not_found";
pub const NOT_CONFIGURED: &str = "not_configured";
pub const IO_ERROR: &str = "io_error";
pub const SERVICE_ERROR: &str = "service_error";
pub const UNKNOWN_TOOL: &str = "unknown_tool";
pub const INTERNAL_ERROR: &str = "internal_error";
