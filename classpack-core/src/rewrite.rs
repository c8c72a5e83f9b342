//! In-place rewriting of source files with an accepted merge map.
//!
//! Applies the same matching rule as the pure transformers, but against
//! files on disk. Resilient by construction: per-file failures are
//! collected into the result, never fatal, and dry-run mode reports what
//! would change without touching anything.
//!
//! Security: refuses to rewrite through symlinks.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::apply::rewrite_source;
use crate::extract::Dialect;

/// Result of a rewrite operation over a set of files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewriteResult {
    pub files_changed: Vec<String>,
    pub files_unchanged: Vec<String>,
    pub errors: Vec<String>,
}

impl RewriteResult {
    /// Check whether any file content was (or would be) modified.
    pub fn any_changed(&self) -> bool {
        !self.files_changed.is_empty()
    }
}

/// Rewrite one file's class attributes with the merge map.
///
/// Returns `Ok(true)` if the file content changed (or would change in
/// dry-run mode). Files with no recognized dialect are skipped.
pub fn rewrite_file(
    path: &Path,
    merge_map: &BTreeMap<String, String>,
    class_prefix: &str,
    dry_run: bool,
) -> std::io::Result<bool> {
    let Some(dialect) = Dialect::from_path(path) else {
        return Ok(false);
    };

    let metadata = path.symlink_metadata()?;
    if metadata.file_type().is_symlink() {
        warn!(path = %path.display(), "refusing to rewrite symlink");
        return Ok(false);
    }

    let content = fs::read_to_string(path)?;
    let rewritten = rewrite_source(&content, dialect, merge_map, class_prefix);

    if rewritten == content {
        return Ok(false);
    }

    if dry_run {
        info!(path = %path.display(), "would rewrite");
        return Ok(true);
    }

    fs::write(path, rewritten)?;
    info!(path = %path.display(), "rewritten");
    Ok(true)
}

/// Rewrite many files, collecting per-file outcomes.
pub fn rewrite_files(
    paths: &[PathBuf],
    merge_map: &BTreeMap<String, String>,
    class_prefix: &str,
    dry_run: bool,
) -> RewriteResult {
    let mut result = RewriteResult::default();

    for path in paths {
        match rewrite_file(path, merge_map, class_prefix, dry_run) {
            Ok(true) => result.files_changed.push(path.display().to_string()),
            Ok(false) => result.files_unchanged.push(path.display().to_string()),
            Err(e) => result
                .errors
                .push(format!("{}: {}", path.display(), e)),
        }
    }

    result
}
