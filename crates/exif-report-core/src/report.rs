//! Markdown report assembly.
//!
//! Pure: the same ordered input always renders to the same bytes.

use sha2::{Digest, Sha256};

use crate::extract::ExtractionResult;

/// Heading of every report.
pub const REPORT_TITLE: &str = "## 📝 Exif Report\n";

/// Finished report body, ready to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    body: String,
    sections: usize,
}

impl Report {
    /// Render a report with one collapsible section per result, in order.
    pub fn build(results: &[ExtractionResult]) -> Self {
        results
            .iter()
            .fold(ReportBuilder::new(), |builder, result| builder.section(result))
            .finish()
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn section_count(&self) -> usize {
        self.sections
    }

    /// True when there is nothing worth posting.
    pub fn is_empty(&self) -> bool {
        self.sections == 0
    }

    /// SHA-256 of the body, hex encoded.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.body.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.body)
    }
}

/// Incremental [`Report`] builder.
#[derive(Debug)]
pub struct ReportBuilder {
    body: String,
    sections: usize,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            body: REPORT_TITLE.to_string(),
            sections: 0,
        }
    }

    /// Append the section for one file.
    pub fn section(mut self, result: &ExtractionResult) -> Self {
        self.body.push_str(&format!("### {}\n", result.path.display()));
        self.body.push_str("<details>\n<summary>Exif Data</summary>\n\n");
        self.body.push_str("```\n");
        self.body.push_str(&result.stdout);
        self.body.push('\n');
        self.body.push_str(&result.stderr);
        self.body.push_str("```\n\n");
        self.sections += 1;
        self
    }

    pub fn finish(self) -> Report {
        Report {
            body: self.body,
            sections: self.sections,
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn result(path: &str, stdout: &str, stderr: &str) -> ExtractionResult {
        ExtractionResult {
            path: PathBuf::from(path),
            command: format!("exiftool {path}"),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_empty_report_is_title_only() {
        let report = Report::build(&[]);
        assert_eq!(report.as_str(), REPORT_TITLE);
        assert!(report.is_empty());
        assert_eq!(report.section_count(), 0);
    }

    #[test]
    fn test_single_section_layout() {
        let report = Report::build(&[result("./photo.jpg", "Make: Acme", "")]);

        let expected = "## 📝 Exif Report\n\
                        ### ./photo.jpg\n\
                        <details>\n\
                        <summary>Exif Data</summary>\n\
                        \n\
                        ```\n\
                        Make: Acme\n\
                        ```\n\
                        \n";
        assert_eq!(report.as_str(), expected);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_diagnostics_follow_primary_output() {
        let report = Report::build(&[result("a.jpg", "Make: Acme\n", "Warning: bad IFD\n")]);
        assert!(report
            .as_str()
            .contains("```\nMake: Acme\n\nWarning: bad IFD\n```\n"));
    }

    #[test]
    fn test_sections_keep_input_order() {
        let report = Report::build(&[result("x.jpg", "X", ""), result("y.jpg", "Y", "")]);
        let body = report.as_str();

        let x = body.find("### x.jpg").unwrap();
        let y = body.find("### y.jpg").unwrap();
        assert!(x < y);
        assert_eq!(report.section_count(), 2);
    }

    #[test]
    fn test_build_is_deterministic() {
        let input = vec![result("x.jpg", "X", "warn"), result("y.jpg", "Y", "")];
        let first = Report::build(&input);
        let second = Report::build(&input);

        assert_eq!(first.as_str().as_bytes(), second.as_str().as_bytes());
        assert_eq!(first.digest(), second.digest());
        assert_eq!(first.digest().len(), 64);
    }
}
