use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_status_reports_counts_and_paths() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let raw_dir = dir.path().join("raw");
    fs::create_dir_all(&raw_dir)?;
    fs::write(raw_dir.join("notes1.txt"), "helo wrld")?;

    let output = Command::new(env!("CARGO_BIN_EXE_notes-mcp"))
        .args(["status", "--json"])
        .env("NOTES_DATA_DIR", dir.path())
        .output()?;

    assert!(output.status.success());
    let structured: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(structured["server"], serde_json::json!("notes-mcp"));
    assert_eq!(structured["raw_files"], serde_json::json!(1));
    assert_eq!(structured["processed_files"], serde_json::json!(0));
    assert_eq!(structured["files_needing_processing"], serde_json::json!(1));
    Ok(())
}

#[test]
fn cli_list_raw_outputs_names() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let raw_dir = dir.path().join("raw");
    fs::create_dir_all(&raw_dir)?;
    fs::write(raw_dir.join("notes1.txt"), "helo wrld")?;

    let output = Command::new(env!("CARGO_BIN_EXE_notes-mcp"))
        .arg("list-raw")
        .env("NOTES_DATA_DIR", dir.path())
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Found 1 raw files:"));
    assert!(stdout.contains("notes1.txt"));
    Ok(())
}
