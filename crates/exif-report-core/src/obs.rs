//! Structured lifecycle events for a report run.
//!
//! Every event carries a stable `event` field so log pipelines can filter
//! on it regardless of formatting.

use std::path::Path;

use tracing::info;

use crate::config::PullRequestTarget;

/// RAII guard for the run-scoped span.
///
/// ```ignore
/// let _span = RunSpan::enter("7d0c...");
/// // every event below is tagged with run_id
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("exif_report.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

pub fn emit_run_started(root: &Path, extensions: &str, target: &PullRequestTarget) {
    info!(
        event = "run.started",
        root = %root.display(),
        extensions = %extensions,
        pull_request = %target,
    );
}

pub fn emit_files_discovered(count: usize) {
    info!(event = "files.discovered", count = count);
}

pub fn emit_file_extracted(path: &Path, command: &str, stdout_bytes: usize) {
    info!(
        event = "file.extracted",
        path = %path.display(),
        command = %command,
        stdout_bytes = stdout_bytes,
    );
}

pub fn emit_report_built(sections: usize, bytes: usize, digest: &str) {
    info!(event = "report.built", sections = sections, bytes = bytes, digest = %digest);
}

pub fn emit_report_published(target: &PullRequestTarget, digest: &str) {
    info!(event = "report.published", pull_request = %target, digest = %digest);
}

/// A clean early exit: nothing to publish.
pub fn emit_run_short_circuited(reason: &str) {
    info!(event = "run.short_circuited", reason = %reason);
}

pub fn emit_run_finished(duration_ms: u64, published: bool) {
    info!(event = "run.finished", duration_ms = duration_ms, published = published);
}
