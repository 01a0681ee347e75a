use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use tempfile::tempdir;

#[test]
fn initialize_reports_server_info() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut child = Command::new(env!("CARGO_BIN_EXE_notes-mcp"))
        .args(["serve", "--stdio"])
        .env("NOTES_DATA_DIR", dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    let mut stdin = child.stdin.take().expect("stdin available");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout available"));

    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {}
    });
    let serialized = serde_json::to_string(&request)?;
    writeln!(stdin, "{serialized}")?;
    stdin.flush()?;

    let mut line = String::new();
    stdout.read_line(&mut line)?;

    let response: serde_json::Value = serde_json::from_str(line.trim())?;
    assert_eq!(response["id"], serde_json::json!(1));
    assert_eq!(
        response["result"]["serverInfo"]["name"],
        serde_json::json!("notes-mcp")
    );
    assert!(response["result"]["capabilities"]["tools"].is_object());

    let _ = child.kill();
    Ok(())
}
