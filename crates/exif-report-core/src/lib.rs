//! exif-report core
//!
//! Scans a directory tree for media files, runs a metadata inspector over
//! each match and posts the collected output as a pull request comment:
//!
//! - [`filter`] normalizes the extension filter
//! - [`discover`] walks the tree
//! - [`extract`] runs the [`Inspector`] over every file
//! - [`report`] renders the Markdown report
//! - [`publish`] posts it through a [`CommentPublisher`]
//! - [`pipeline`] sequences the stages with fail-fast semantics

pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod fakes;
pub mod filter;
pub mod inspect;
pub mod obs;
pub mod pipeline;
pub mod publish;
pub mod report;
pub mod telemetry;

pub use config::{PullRequestTarget, RunConfig, SecretToken};
pub use discover::discover;
pub use error::{ConfigError, InspectError, PipelineError, PublishError, Result};
pub use extract::{ExtractionResult, Extractor};
pub use filter::ExtensionSet;
pub use inspect::{CommandInspector, Inspection, Inspector, DEFAULT_INSPECTOR};
pub use obs::RunSpan;
pub use pipeline::{Pipeline, RunOutcome};
pub use publish::{CommentPublisher, GitHubCommenter, DEFAULT_API_URL};
pub use report::{Report, ReportBuilder, REPORT_TITLE};
pub use telemetry::{init_tracing, LogFormat};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
