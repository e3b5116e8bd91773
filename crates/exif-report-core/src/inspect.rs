//! Metadata inspection capability and the process-backed implementation.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::InspectError;

/// Default inspection program.
pub const DEFAULT_INSPECTOR: &str = "exiftool";

/// Raw output of one successful inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    /// Rendered invocation, e.g. `exiftool ./photo.jpg`.
    pub command: String,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,
}

/// Something that can describe the embedded metadata of one file.
#[async_trait]
pub trait Inspector: Send + Sync {
    /// Inspect a single file. Output is opaque text.
    async fn inspect(&self, path: &Path) -> Result<Inspection, InspectError>;
}

/// Runs an external program with the file path as its only argument.
#[derive(Debug, Clone)]
pub struct CommandInspector {
    program: String,
    timeout: Option<Duration>,
}

impl CommandInspector {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Bound each invocation. Zero disables the timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandInspector {
    fn default() -> Self {
        Self::new(DEFAULT_INSPECTOR)
    }
}

#[async_trait]
impl Inspector for CommandInspector {
    async fn inspect(&self, path: &Path) -> Result<Inspection, InspectError> {
        let command = format!("{} {}", self.program, path.display());
        debug!(command = %command, "Running inspector");

        let child = Command::new(&self.program)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| InspectError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| InspectError::Timeout {
                    command: command.clone(),
                    secs: limit.as_secs(),
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| InspectError::Other(format!("{command}: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(InspectError::NonZeroExit {
                command,
                exit_code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(Inspection {
            command,
            stdout,
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_inspect_captures_stdout() {
        let inspector = CommandInspector::new("echo");
        let result = inspector
            .inspect(Path::new("photo.jpg"))
            .await
            .expect("inspect failed");

        assert_eq!(result.command, "echo photo.jpg");
        assert_eq!(result.stdout.trim(), "photo.jpg");
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_inspect_non_zero_exit_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.jpg");

        let err = CommandInspector::new("cat")
            .inspect(&missing)
            .await
            .unwrap_err();

        match err {
            InspectError::NonZeroExit {
                exit_code, stderr, ..
            } => {
                assert_ne!(exit_code, 0);
                assert!(!stderr.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_inspect_missing_program_is_spawn_error() {
        let err = CommandInspector::new("definitely-not-an-installed-inspector")
            .inspect(&PathBuf::from("a.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, InspectError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_inspect_timeout() {
        let err = CommandInspector::new("sleep")
            .with_timeout_secs(1)
            .inspect(Path::new("5"))
            .await
            .unwrap_err();

        assert!(matches!(err, InspectError::Timeout { secs: 1, .. }));
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let inspector = CommandInspector::default().with_timeout_secs(0);
        assert!(inspector.timeout.is_none());
        assert_eq!(inspector.program(), DEFAULT_INSPECTOR);
    }
}
