//! Per-file metadata extraction.

use std::path::PathBuf;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::inspect::Inspector;
use crate::obs;

/// Outcome of inspecting one discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// File that was inspected.
    pub path: PathBuf,

    /// Rendered inspector invocation.
    pub command: String,

    /// Primary inspector output.
    pub stdout: String,

    /// Diagnostic inspector output.
    pub stderr: String,
}

/// Maps an [`Inspector`] over discovered files.
#[derive(Clone)]
pub struct Extractor {
    inspector: Arc<dyn Inspector>,
    jobs: usize,
}

impl Extractor {
    /// Create an extractor running at most `jobs` inspections at once.
    /// `jobs` below 1 is treated as 1.
    pub fn new(inspector: Arc<dyn Inspector>, jobs: usize) -> Self {
        Self {
            inspector,
            jobs: jobs.max(1),
        }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Inspect a single file.
    pub async fn extract(&self, path: PathBuf) -> Result<ExtractionResult> {
        let inspection = self
            .inspector
            .inspect(&path)
            .await
            .map_err(|source| PipelineError::Extraction {
                path: path.clone(),
                source,
            })?;

        obs::emit_file_extracted(&path, &inspection.command, inspection.stdout.len());

        Ok(ExtractionResult {
            path,
            command: inspection.command,
            stdout: inspection.stdout,
            stderr: inspection.stderr,
        })
    }

    /// Inspect every file, returning results in input order.
    ///
    /// Inspections complete in any order; the first failure to complete ends
    /// the run. Inspections still queued or running are then dropped, which
    /// kills any child process they own.
    pub async fn extract_all(&self, files: Vec<PathBuf>) -> Result<Vec<ExtractionResult>> {
        info!(files = files.len(), jobs = self.jobs, "Extracting metadata");

        let mut indexed: Vec<(usize, ExtractionResult)> =
            stream::iter(files.into_iter().enumerate())
                .map(|(index, path)| async move { self.extract(path).await.map(|r| (index, r)) })
                .buffer_unordered(self.jobs)
                .try_collect()
                .await?;

        indexed.sort_unstable_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, result)| result).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InspectError;
    use crate::fakes::ScriptedInspector;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[tokio::test]
    async fn test_extract_all_preserves_input_order() {
        let inspector = ScriptedInspector::new()
            .with_output("slow.jpg", "Make: Slow", "")
            .with_delay_ms("slow.jpg", 50)
            .with_output("fast.jpg", "Make: Fast", "warning")
            .with_output("mid.jpg", "Make: Mid", "");
        let extractor = Extractor::new(Arc::new(inspector), 3);

        let results = extractor
            .extract_all(paths(&["slow.jpg", "fast.jpg", "mid.jpg"]))
            .await
            .unwrap();

        let order: Vec<_> = results.iter().map(|r| r.path.clone()).collect();
        assert_eq!(order, paths(&["slow.jpg", "fast.jpg", "mid.jpg"]));
        assert_eq!(results[1].stdout, "Make: Fast");
        assert_eq!(results[1].stderr, "warning");
    }

    #[tokio::test]
    async fn test_extract_all_fails_fast() {
        let inspector = Arc::new(
            ScriptedInspector::new()
                .with_output("a.jpg", "ok", "")
                .with_failure("b.jpg", "corrupt file")
                .with_output("c.jpg", "ok", ""),
        );
        let extractor = Extractor::new(inspector.clone(), 1);

        let err = extractor
            .extract_all(paths(&["a.jpg", "b.jpg", "c.jpg"]))
            .await
            .unwrap_err();

        match err {
            PipelineError::Extraction { path, source } => {
                assert_eq!(path, PathBuf::from("b.jpg"));
                assert!(matches!(source, InspectError::NonZeroExit { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(inspector.calls(), paths(&["a.jpg", "b.jpg"]));
    }

    #[tokio::test]
    async fn test_extract_all_concurrent_failure_cancels_pending_work() {
        let inspector = Arc::new(
            ScriptedInspector::new()
                .with_output("slow.jpg", "ok", "")
                .with_delay_ms("slow.jpg", 5_000)
                .with_failure("bad.jpg", "corrupt file")
                .with_output("queued.jpg", "ok", ""),
        );
        let extractor = Extractor::new(inspector.clone(), 2);

        let start = std::time::Instant::now();
        let err = extractor
            .extract_all(paths(&["slow.jpg", "bad.jpg", "queued.jpg"]))
            .await
            .unwrap_err();
        let elapsed = start.elapsed();

        assert!(
            elapsed < std::time::Duration::from_millis(2_000),
            "failure should surface without waiting for slow.jpg, took {elapsed:?}"
        );
        match err {
            PipelineError::Extraction { path, .. } => assert_eq!(path, PathBuf::from("bad.jpg")),
            other => panic!("unexpected error: {other}"),
        }

        let calls = inspector.calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls.contains(&PathBuf::from("queued.jpg")));
    }

    #[tokio::test]
    async fn test_extract_all_empty() {
        let extractor = Extractor::new(Arc::new(ScriptedInspector::new()), 4);
        let results = extractor.extract_all(Vec::new()).await.unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_zero_jobs_clamped() {
        let extractor = Extractor::new(Arc::new(ScriptedInspector::new()), 0);
        assert_eq!(extractor.jobs(), 1);
    }
}
