use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use tempfile::tempdir;

#[test]
fn read_raw_file_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let raw_dir = dir.path().join("raw");
    fs::create_dir_all(&raw_dir)?;
    fs::write(raw_dir.join("notes1.txt"), "helo wrld")?;

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
        "id": 3,
        "method": "tools/call",
        "params": {
            "name": "read_raw_file",
            "arguments": {"filename": "notes1.txt"}
        }
    });
    writeln!(stdin, "{}", serde_json::to_string(&request)?)?;
    stdin.flush()?;

    let mut line = String::new();
    stdout.read_line(&mut line)?;
    let response: serde_json::Value = serde_json::from_str(line.trim())?;
    let result = &response["result"];

    assert_eq!(result["isError"], serde_json::json!(false));
    assert_eq!(
        result["structuredContent"]["content"],
        serde_json::json!("helo wrld")
    );
    let text = result["content"][0]["text"].as_str().expect("text");
    assert!(text.contains("Content of 'notes1.txt'"));
    assert!(text.contains("helo wrld"));

    let _ = child.kill();
    Ok(())
}

#[test]
fn read_raw_file_missing_is_not_found_message() -> Result<(), Box<dyn std::error::Error>> {
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
        "id": 4,
        "method": "tools/call",
        "params": {
            "name": "read_raw_file",
            "arguments": {"filename": "nope.txt"}
        }
    });
    writeln!(stdin, "{}", serde_json::to_string(&request)?)?;
    stdin.flush()?;

    let mut line = String::new();
    stdout.read_line(&mut line)?;
    let response: serde_json::Value = serde_json::from_str(line.trim())?;
    let result = &response["result"];

    assert_eq!(result["isError"], serde_json::json!(true));
    assert_eq!(
        result["content"][0]["text"],
        serde_json::json!("Error: could not read file 'nope.txt' or file does not exist")
    );

    let _ = child.kill();
    Ok(())
}

#[test]
fn missing_filename_argument_is_validation_message() -> Result<(), Box<dyn std::error::Error>> {
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
        "id": 5,
        "method": "tools/call",
        "params": {
            "name": "read_raw_file",
            "arguments": {}
        }
    });
    writeln!(stdin, "{}", serde_json::to_string(&request)?)?;
    stdin.flush()?;

    let mut line = String::new();
    stdout.read_line(&mut line)?;
    let response: serde_json::Value = serde_json::from_str(line.trim())?;
    let result = &response["result"];

    assert_eq!(result["isError"], serde_json::json!(true));
    assert_eq!(
        result["content"][0]["text"],
        serde_json::json!("Error: filename is required")
    );

    let _ = child.kill();
    Ok(())
}
