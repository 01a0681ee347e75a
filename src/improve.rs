use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ImproveError {
    #[error("failed to run improvement command: {0}")]
    Spawn(std::io::Error),
    #[error("failed to exchange text with improvement command: {0}")]
    Io(std::io::Error),
    #[error("improvement command exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("improvement command produced non-UTF-8 output")]
    InvalidOutput,
}

/// The external text-improvement capability. Implementations take the raw
/// text and return the cleaned text; one call per invocation, no retries.
pub trait Improver: Send + Sync {
    fn improve(&self, text: &str) -> Result<String, ImproveError>;
}

/// Pipes text through a shell command: raw text on stdin, improved text on
/// stdout. Non-zero exit or undecodable output is a service failure.
pub struct CommandImprover {
    command: String,
}

impl CommandImprover {
    pub fn new(command: String) -> Self {
        Self { command }
    }
}

impl Improver for CommandImprover {
    fn improve(&self, text: &str) -> Result<String, ImproveError> {
        debug!("running improvement command: {}", self.command);
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ImproveError::Spawn)?;

        // stdin handle must be dropped before wait, or the child blocks on EOF
        {
            let mut stdin = child.stdin.take().ok_or_else(|| {
                ImproveError::Io(std::io::Error::other("child stdin unavailable"))
            })?;
            stdin
                .write_all(text.as_bytes())
                .map_err(ImproveError::Io)?;
        }

        let output = child.wait_with_output().map_err(ImproveError::Io)?;
        if !output.status.success() {
            return Err(ImproveError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ImproveError::InvalidOutput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_pipes_text() {
        let improver = CommandImprover::new("tr '[:lower:]' '[:upper:]'".to_string());
        let improved = improver.improve("helo wrld").expect("improved");
        assert_eq!(improved, "HELO WRLD");
    }

    #[test]
    fn failing_command_is_service_error() {
        let improver = CommandImprover::new("echo broken >&2; exit 3".to_string());
        let err = improver.improve("anything").expect_err("error");
        match err {
            ImproveError::Failed { stderr, .. } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
