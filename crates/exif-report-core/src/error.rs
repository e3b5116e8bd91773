//! Error taxonomy for a report run.
//!
//! Every variant of [`PipelineError`] is terminal for the run and maps to a
//! distinct process exit status via [`PipelineError::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Invalid or missing run configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no GitHub token present")]
    MissingToken,

    #[error("no repository present")]
    MissingRepository,

    #[error("invalid repository {0:?}: expected owner/name")]
    InvalidRepository(String),

    #[error("no PR number present")]
    MissingPrNumber,

    #[error("invalid PR number {0:?}: expected a positive integer")]
    InvalidPrNumber(String),

    #[error("extraction concurrency must be at least 1")]
    ZeroJobs,
}

/// Failure of a single inspector invocation.
#[derive(Error, Debug)]
pub enum InspectError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    #[error("{command} exited with status {exit_code}: {stderr}")]
    NonZeroExit {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("inspector failed: {0}")]
    Other(String),
}

/// Failure delivering a report to the comments API.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("comment request failed: {0}")]
    Transport(String),

    #[error("comment rejected with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid API base URL {0:?}")]
    InvalidBaseUrl(String),
}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        PublishError::Transport(err.to_string())
    }
}

/// Fatal error ending a run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to scan {}: {source}", root.display())]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to extract metadata from {}: {source}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: InspectError,
    },

    #[error("failed to publish report: {0}")]
    Publish(#[from] PublishError),
}

impl PipelineError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Config(_) => 2,
            PipelineError::Discovery { .. } => 3,
            PipelineError::Extraction { .. } => 4,
            PipelineError::Publish(_) => 5,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let errors = [
            PipelineError::Config(ConfigError::MissingToken),
            PipelineError::Extraction {
                path: PathBuf::from("a.jpg"),
                source: InspectError::Other("boom".to_string()),
            },
            PipelineError::Publish(PublishError::Status {
                status: 404,
                body: "Not Found".to_string(),
            }),
        ];

        let codes: Vec<u8> = errors.iter().map(PipelineError::exit_code).collect();
        assert_eq!(codes, vec![2, 4, 5]);
        assert!(codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_discovery_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let source = walkdir::WalkDir::new(&missing)
            .into_iter()
            .find_map(|e| e.err())
            .expect("walking a missing root yields an error");

        let err = PipelineError::Discovery {
            root: missing,
            source,
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("failed to scan"));
    }

    #[test]
    fn test_non_zero_exit_display() {
        let err = InspectError::NonZeroExit {
            command: "exiftool photo.jpg".to_string(),
            exit_code: 1,
            stderr: "File not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exiftool photo.jpg"));
        assert!(msg.contains("status 1"));
        assert!(msg.contains("File not found"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidRepository("acme".to_string());
        assert!(err.to_string().contains("owner/name"));

        let err = PipelineError::from(ConfigError::MissingPrNumber);
        assert!(err.to_string().starts_with("configuration error"));
    }
}
