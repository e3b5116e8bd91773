//! In-memory fakes for the inspection and publishing capabilities (testing
//! only).
//!
//! Scripts are keyed by file name so tests can work on temporary trees
//! without knowing their absolute paths.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::PullRequestTarget;
use crate::error::{InspectError, PublishError};
use crate::inspect::{Inspection, Inspector};
use crate::publish::CommentPublisher;

#[derive(Debug, Clone)]
enum Script {
    Output { stdout: String, stderr: String },
    Failure { stderr: String },
}

// ---------------------------------------------------------------------------
// ScriptedInspector
// ---------------------------------------------------------------------------

/// Inspector that answers from a per-file-name script and records calls.
///
/// Files without a script fail with [`InspectError::Other`].
#[derive(Debug, Default)]
pub struct ScriptedInspector {
    scripts: HashMap<String, Script>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<PathBuf>>,
}

impl ScriptedInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, file_name: &str, stdout: &str, stderr: &str) -> Self {
        self.scripts.insert(
            file_name.to_string(),
            Script::Output {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Make `file_name` fail as if the tool exited with status 1.
    pub fn with_failure(mut self, file_name: &str, stderr: &str) -> Self {
        self.scripts.insert(
            file_name.to_string(),
            Script::Failure {
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn with_delay_ms(mut self, file_name: &str, millis: u64) -> Self {
        self.delays
            .insert(file_name.to_string(), Duration::from_millis(millis));
        self
    }

    /// Paths inspected so far, in call order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Inspector for ScriptedInspector {
    async fn inspect(&self, path: &Path) -> Result<Inspection, InspectError> {
        self.calls.lock().unwrap().push(path.to_path_buf());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let command = format!("fake-inspector {}", path.display());

        if let Some(delay) = self.delays.get(&name) {
            tokio::time::sleep(*delay).await;
        }

        match self.scripts.get(&name) {
            Some(Script::Output { stdout, stderr }) => Ok(Inspection {
                command,
                stdout: stdout.clone(),
                stderr: stderr.clone(),
            }),
            Some(Script::Failure { stderr }) => Err(InspectError::NonZeroExit {
                command,
                exit_code: 1,
                stderr: stderr.clone(),
            }),
            None => Err(InspectError::Other(format!("no script for {name}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingPublisher
// ---------------------------------------------------------------------------

/// A comment captured by [`RecordingPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedComment {
    pub target: PullRequestTarget,
    pub body: String,
}

/// Publisher that stores comments instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<PublishedComment>>,
    reject_with: Option<u16>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every publish with the given HTTP status.
    pub fn rejecting(status: u16) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            reject_with: Some(status),
        }
    }

    pub fn published(&self) -> Vec<PublishedComment> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentPublisher for RecordingPublisher {
    async fn publish(&self, target: &PullRequestTarget, body: &str) -> Result<(), PublishError> {
        if let Some(status) = self.reject_with {
            return Err(PublishError::Status {
                status,
                body: "rejected by fake".to_string(),
            });
        }

        self.published.lock().unwrap().push(PublishedComment {
            target: target.clone(),
            body: body.to_string(),
        });
        Ok(())
    }
}
