use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod hash;
mod improve;
mod mcp;
mod metadata;
mod storage;
mod tools;

use config::Config;
use improve::{CommandImprover, Improver};
use storage::DocumentStorage;
use tools::ToolRegistry;

#[derive(Parser)]
#[command(name = "notes-mcp")]
#[command(
    version,
    about = "Document storage and change tracking for text notes, exposed as MCP tools"
)]
struct Cli {
    /// Base data directory (overrides NOTES_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct FilenameArgs {
    /// Document file name
    #[arg(long)]
    filename: String,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP stdio server
    Serve {
        /// Serve MCP over stdio (NDJSON)
        #[arg(long)]
        stdio: bool,
    },
    /// List raw text files
    ListRaw(OutputArgs),
    /// List processed text files
    ListProcessed(OutputArgs),
    /// Show server status and directory layout
    Status(OutputArgs),
    /// List files whose raw content changed since last processing
    Check(OutputArgs),
    /// Read a raw file
    ReadRaw(FilenameArgs),
    /// Read a processed file
    ReadProcessed(FilenameArgs),
    /// Show metadata for a document
    Info(FilenameArgs),
    /// Process a raw file through the improvement service
    Process(FilenameArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.ensure_dirs().with_context(|| {
        format!("failed to create data directories under {}", config.data_dir.display())
    })?;

    let improver: Option<Box<dyn Improver>> = config
        .improve_command
        .clone()
        .map(|command| Box::new(CommandImprover::new(command)) as Box<dyn Improver>);
    if improver.is_none() {
        warn!(
            "no improvement command configured ({}); process_raw_file will be unavailable",
            config::IMPROVE_COMMAND_ENV
        );
    }

    let storage = Arc::new(DocumentStorage::new(&config, improver));
    let registry = Arc::new(ToolRegistry::new(storage));

    match cli.command {
        Commands::Serve { stdio } => {
            if stdio {
                run_stdio_server(registry)
            } else {
                anyhow::bail!("only --stdio transport is supported")
            }
        }
        Commands::ListRaw(args) => run_tool(&registry, "list_raw_files", json!({}), args.json),
        Commands::ListProcessed(args) => {
            run_tool(&registry, "list_processed_files", json!({}), args.json)
        }
        Commands::Status(args) => run_tool(&registry, "get_server_status", json!({}), args.json),
        Commands::Check(args) => {
            run_tool(&registry, "check_files_needing_processing", json!({}), args.json)
        }
        Commands::ReadRaw(args) => run_tool(
            &registry,
            "read_raw_file",
            json!({"filename": args.filename}),
            args.json,
        ),
        Commands::ReadProcessed(args) => run_tool(
            &registry,
            "read_processed_file",
            json!({"filename": args.filename}),
            args.json,
        ),
        Commands::Info(args) => run_tool(
            &registry,
            "get_document_info",
            json!({"filename": args.filename}),
            args.json,
        ),
        Commands::Process(args) => run_tool(
            &registry,
            "process_raw_file",
            json!({"filename": args.filename}),
            args.json,
        ),
    }
}

fn run_tool(registry: &ToolRegistry, name: &str, args: Value, json_output: bool) -> Result<()> {
    let result = registry.dispatch(name, &args);
    print_tool_result(result, json_output)
}

fn print_tool_result(result: Value, json_output: bool) -> Result<()> {
    let is_error = result
        .get("isError")
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    if is_error {
        let message = result
            .get("structuredContent")
            .and_then(|value| value.get("error"))
            .and_then(|value| value.get("message"))
            .and_then(|value| value.as_str())
            .unwrap_or("tool error");
        eprintln!("{message}");
        process::exit(1);
    }

    if json_output {
        let structured = result
            .get("structuredContent")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let output = serde_json::to_string_pretty(&structured)?;
        println!("{output}");
        return Ok(());
    }

    let text = result
        .get("content")
        .and_then(|value| value.as_array())
        .and_then(|arr| arr.first())
        .and_then(|value| value.get("text"))
        .and_then(|value| value.as_str())
        .unwrap_or("");
    println!("{text}");
    Ok(())
}

fn run_stdio_server(registry: Arc<ToolRegistry>) -> Result<()> {
    info!(
        "starting {} v{} MCP server",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let stdin = io::stdin();
    let stdout = Arc::new(Mutex::new(io::stdout()));
    let mut workers = Vec::new();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(_) => continue,
        };

        let method = request.get("method").and_then(|value| value.as_str());
        let id = request.get("id").cloned();
        match (method, id) {
            (Some("initialize"), Some(id)) => {
                let response = json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {
                        "protocolVersion": "2025-11-25",
                        "capabilities": {
                            "tools": {}
                        },
                        "serverInfo": {
                            "name": env!("CARGO_PKG_NAME"),
                            "version": env!("CARGO_PKG_VERSION")
                        }
                    }
                });
                write_response(&stdout, &response)?;
            }
            (Some("tools/list"), Some(id)) => {
                let response = json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {
                        "tools": registry.tool_definitions()
                    }
                });
                write_response(&stdout, &response)?;
            }
            // tool calls run on their own thread so a slow process_raw_file
            // does not stall unrelated reads; responses correlate by id
            (Some("tools/call"), Some(id)) => {
                let registry = Arc::clone(&registry);
                let stdout = Arc::clone(&stdout);
                workers.push(thread::spawn(move || {
                    let result = handle_tool_call(&registry, &request);
                    let response = json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "result": result
                    });
                    if let Err(err) = write_response(&stdout, &response) {
                        warn!("failed to write tool response: {err}");
                    }
                }));
            }
            _ => {}
        }
    }

    for worker in workers {
        let _ = worker.join();
    }

    Ok(())
}

fn write_response(stdout: &Mutex<io::Stdout>, response: &Value) -> Result<()> {
    let serialized = serde_json::to_string(response).context("failed to serialize response")?;
    let mut stdout = stdout.lock().unwrap_or_else(PoisonError::into_inner);
    writeln!(stdout, "{serialized}").context("failed to write response")?;
    stdout.flush().context("failed to flush response")
}

fn handle_tool_call(registry: &ToolRegistry, request: &Value) -> Value {
    let params = request.get("params");
    let Some(params) = params.and_then(|value| value.as_object()) else {
        return tools::error_result(mcp::errors::VALIDATION, "params must be an object");
    };

    let name = params.get("name").and_then(|value| value.as_str());
    let Some(name) = name else {
        return tools::error_result(mcp::errors::VALIDATION, "params.name must be a string");
    };

    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    registry.dispatch(name, &args)
}
