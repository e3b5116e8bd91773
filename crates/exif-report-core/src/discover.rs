//! Recursive discovery of files matching an [`ExtensionSet`].

use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{PipelineError, Result};
use crate::filter::ExtensionSet;

/// Walk `root` depth-first in lexical order and return every regular file
/// whose extension is in `filter`.
///
/// Returned paths are joined onto `root` with `.` components removed, so a
/// walk from `.` yields `photo.jpg` rather than `./photo.jpg`.
///
/// Any traversal error (missing root, unreadable directory) aborts the walk.
/// Symbolic links are reported as entries but never followed.
pub fn discover(root: &Path, filter: &ExtensionSet) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| PipelineError::Discovery {
            root: root.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        if let Some(ext) = dotted_extension(entry.path()) {
            if filter.matches(&ext) {
                debug!(path = %entry.path().display(), "Matched file");
                files.push(clean_path(entry.path()));
            }
        }
    }

    Ok(files)
}

/// Suffix of the file name from its last `.`, dot included.
///
/// Unlike [`Path::extension`], a leading dot counts: `.jpg` has extension
/// `.jpg`, and `archive.` has extension `.`.
fn dotted_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    name.rfind('.').map(|idx| name[idx..].to_string())
}

fn clean_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
