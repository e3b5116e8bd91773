//! Run orchestration: discover, extract, aggregate, publish.
//!
//! Each stage consumes the whole output of the previous one. The first error
//! ends the run; "no matching files" and "empty report" end it cleanly
//! without publishing.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use uuid::Uuid;

use crate::config::PullRequestTarget;
use crate::discover::discover;
use crate::error::{PipelineError, Result};
use crate::extract::Extractor;
use crate::filter::ExtensionSet;
use crate::inspect::Inspector;
use crate::obs::{self, RunSpan};
use crate::publish::CommentPublisher;
use crate::report::Report;

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The filter matched no files.
    NoMatchingFiles,

    /// Extraction produced nothing to report.
    EmptyReport,

    /// The report was posted.
    Published {
        files: usize,
        report_digest: String,
    },
}

impl RunOutcome {
    pub fn published(&self) -> bool {
        matches!(self, RunOutcome::Published { .. })
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::NoMatchingFiles => write!(f, "No files found"),
            RunOutcome::EmptyReport => write!(f, "No content to report"),
            RunOutcome::Published { files, .. } => {
                write!(f, "Published report covering {files} file(s)")
            }
        }
    }
}

/// Report pipeline bound to one pull request.
pub struct Pipeline {
    target: PullRequestTarget,
    extractor: Extractor,
    publisher: Arc<dyn CommentPublisher>,
}

impl Pipeline {
    pub fn new(
        target: PullRequestTarget,
        inspector: Arc<dyn Inspector>,
        publisher: Arc<dyn CommentPublisher>,
        jobs: usize,
    ) -> Self {
        Self {
            target,
            extractor: Extractor::new(inspector, jobs),
            publisher,
        }
    }

    /// Scan `root` for files matching `raw_extensions` and post their
    /// metadata report to the configured pull request.
    pub async fn run(&self, root: &Path, raw_extensions: &str) -> Result<RunOutcome> {
        let start = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let _span = RunSpan::enter(&run_id);

        let filter = ExtensionSet::normalize(raw_extensions);
        obs::emit_run_started(root, &filter.to_string(), &self.target);

        let outcome = self.execute(root, &filter).await?;

        obs::emit_run_finished(start.elapsed().as_millis() as u64, outcome.published());
        Ok(outcome)
    }

    async fn execute(&self, root: &Path, filter: &ExtensionSet) -> Result<RunOutcome> {
        let files = discover(root, filter)?;
        obs::emit_files_discovered(files.len());
        if files.is_empty() {
            obs::emit_run_short_circuited("no matching files");
            return Ok(RunOutcome::NoMatchingFiles);
        }

        let file_count = files.len();
        let results = self.extractor.extract_all(files).await?;

        let report = Report::build(&results);
        let digest = report.digest();
        obs::emit_report_built(report.section_count(), report.as_str().len(), &digest);
        if report.is_empty() {
            obs::emit_run_short_circuited("empty report");
            return Ok(RunOutcome::EmptyReport);
        }

        info!(pull_request = %self.target, "Publishing report");
        self.publisher
            .publish(&self.target, report.as_str())
            .await
            .map_err(PipelineError::Publish)?;
        obs::emit_report_published(&self.target, &digest);

        Ok(RunOutcome::Published {
            files: file_count,
            report_digest: digest,
        })
    }
}
