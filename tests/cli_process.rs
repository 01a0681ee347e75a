use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_process_runs_improvement_command() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let raw_dir = dir.path().join("raw");
    fs::create_dir_all(&raw_dir)?;
    fs::write(raw_dir.join("notes1.txt"), "helo wrld")?;

    let output = Command::new(env!("CARGO_BIN_EXE_notes-mcp"))
        .args(["process", "--filename", "notes1.txt"])
        .env("NOTES_DATA_DIR", dir.path())
        .env("NOTES_IMPROVE_COMMAND", "tr '[:lower:]' '[:upper:]'")
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Successfully processed 'notes1.txt'"));

    let processed = fs::read_to_string(dir.path().join("processed/notes1.txt"))?;
    assert_eq!(processed, "HELO WRLD");
    Ok(())
}

#[test]
fn cli_process_without_command_exits_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let raw_dir = dir.path().join("raw");
    fs::create_dir_all(&raw_dir)?;
    fs::write(raw_dir.join("notes1.txt"), "helo wrld")?;

    let output = Command::new(env!("CARGO_BIN_EXE_notes-mcp"))
        .args(["process", "--filename", "notes1.txt"])
        .env("NOTES_DATA_DIR", dir.path())
        .env_remove("NOTES_IMPROVE_COMMAND")
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("improvement service is not configured"));
    Ok(())
}
