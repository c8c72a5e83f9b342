//! Parallel, deterministic source file discovery with directory pruning.
//!
//! Performance characteristics:
//! - Early directory pruning via `WalkDir::filter_entry` (O(1) subtree skip)
//! - Parallel file processing via Rayon's `par_bridge`
//! - Results are sorted before returning, so downstream extraction and
//!   optimization see a stable file order regardless of traversal timing

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

/// Directories to exclude by default (standard frontend project conventions).
const EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "target", "dist", "build", ".cache"];

/// Extensions scanned by default; must stay in sync with the dialect table.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "html", "htm", "vue", "jsx", "tsx", "js", "ts", "svelte", "astro",
];

/// Checks if a directory entry should be pruned (excluded from traversal).
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Gathers all source files with matching extensions under the root.
///
/// Automatically excludes `node_modules/`, `.git/`, `target/`, `dist/`,
/// `build/`, and `.cache/`.
pub fn gather_source_files(root: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    gather_source_files_with_excludes(root, extensions, &[])
}

/// Gathers source files with custom exclusion patterns using early pruning.
///
/// Combines default exclusions with custom directory names for efficient
/// subtree skipping.
pub fn gather_source_files_with_excludes(
    root: &Path,
    extensions: &[&str],
    excludes: &[&str],
) -> Result<Vec<PathBuf>> {
    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().copied())
        .collect();
    let wanted: HashSet<&str> = extensions.iter().copied().collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        // filter_entry prunes entire subtrees before iteration
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                let matches = path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| wanted.contains(ext));
                if matches {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .context(format!(
            "Failed to gather source files from {}",
            root.display()
        ))?;

    files.sort_unstable();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup_tree(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("classpack_scan_tests")
            .join(format!("{}_{}", name, std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(dir.join("src")).unwrap();
        fs::create_dir_all(dir.join("node_modules/pkg")).unwrap();
        fs::write(dir.join("src/app.html"), "<div/>").unwrap();
        fs::write(dir.join("src/App.tsx"), "export {}").unwrap();
        fs::write(dir.join("src/style.css"), "").unwrap();
        fs::write(dir.join("node_modules/pkg/index.html"), "<div/>").unwrap();
        dir
    }

    #[test]
    fn test_gather_matches_extensions() {
        let dir = setup_tree("exts");
        let files = gather_source_files(&dir, DEFAULT_EXTENSIONS).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("src/app.html")));
        assert!(files.iter().any(|p| p.ends_with("src/App.tsx")));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_gather_prunes_node_modules() {
        let dir = setup_tree("prune");
        let files = gather_source_files(&dir, DEFAULT_EXTENSIONS).unwrap();

        assert!(files
            .iter()
            .all(|p| !p.to_string_lossy().contains("node_modules")));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_gather_sorted_output() {
        let dir = setup_tree("sorted");
        let files = gather_source_files(&dir, DEFAULT_EXTENSIONS).unwrap();

        let mut resorted = files.clone();
        resorted.sort_unstable();
        assert_eq!(files, resorted);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_gather_custom_excludes() {
        let dir = setup_tree("custom");
        fs::create_dir_all(dir.join("legacy")).unwrap();
        fs::write(dir.join("legacy/old.html"), "<div/>").unwrap();

        let files =
            gather_source_files_with_excludes(&dir, DEFAULT_EXTENSIONS, &["legacy"]).unwrap();
        assert!(files.iter().all(|p| !p.to_string_lossy().contains("legacy")));

        fs::remove_dir_all(&dir).ok();
    }
}
