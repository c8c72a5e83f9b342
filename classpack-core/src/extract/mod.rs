//! Class-attribute extraction from source text.
//!
//! Each supported dialect contributes a regex-based strategy that turns raw
//! source text into canonical [`ClassUsage`] records:
//! - **Markup**: plain `class="..."` attributes (`.html`, `.htm`, `.vue`)
//! - **Jsx**: `className` attributes, string and simple template-literal
//!   forms (`.jsx`, `.tsx`, `.js`, `.ts`)
//! - **Template**: `class="..."` with `{expr}` interpolation spans stripped
//!   before tokenizing (`.svelte`, `.astro`)
//!
//! Extraction is a best-effort text transform: a malformed or unterminated
//! attribute simply contributes no usage. Full-fidelity parsing of any
//! dialect is a non-goal.

mod jsx;
mod markup;
mod template;

pub use jsx::extract_jsx;
pub use markup::extract_markup;
pub use template::extract_template;

pub(crate) use jsx::jsx_attr_regex;
pub(crate) use markup::class_attr_regex;

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One element's set of optimizable class names plus a source locator.
///
/// Invariant: `classes` has at least two entries, is deduplicated, and is
/// stored sorted, so two usages with the same class set produce identical
/// keys regardless of original attribute order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassUsage {
    /// Sorted, deduplicated class names (all carrying the configured prefix)
    pub classes: Vec<String>,
    /// Where this usage came from (file path or label), diagnostics only
    pub source: String,
}

impl ClassUsage {
    /// Canonical key: constituent classes, sorted, space-joined.
    pub fn key(&self) -> String {
        self.classes.join(" ")
    }
}

/// Options controlling extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Only classes starting with this prefix are eligible. This is what
    /// separates optimizable utility classes from semantic classes that
    /// must never be touched.
    pub class_prefix: String,
    /// Minimum classes per element for a usage to be emitted. Values below
    /// 2 are treated as 2: single-class elements cannot be merged.
    pub min_classes: usize,
    /// Label recorded on emitted usages when no file path is known.
    pub source: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            class_prefix: "_".to_string(),
            min_classes: 2,
            source: "<input>".to_string(),
        }
    }
}

impl ExtractOptions {
    /// Effective floor on classes per usage.
    pub(crate) fn effective_min(&self) -> usize {
        self.min_classes.max(2)
    }
}

/// A supported source dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    /// Plain markup `class` attributes
    Markup,
    /// JSX-style `className` attributes
    Jsx,
    /// Component templates with `{expr}` interpolation
    Template,
}

impl Dialect {
    /// Select a dialect by file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "html" | "htm" | "vue" => Some(Self::Markup),
            "jsx" | "tsx" | "js" | "ts" => Some(Self::Jsx),
            "svelte" | "astro" => Some(Self::Template),
            _ => None,
        }
    }

    /// Select a dialect from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Run this dialect's extraction strategy.
    pub fn extract(&self, content: &str, options: &ExtractOptions) -> Vec<ClassUsage> {
        match self {
            Self::Markup => extract_markup(content, options),
            Self::Jsx => extract_jsx(content, options),
            Self::Template => extract_template(content, options),
        }
    }
}

/// Extract usages from content, selecting the strategy by dialect.
pub fn extract(content: &str, dialect: Dialect, options: &ExtractOptions) -> Vec<ClassUsage> {
    dialect.extract(content, options)
}

/// Turn one attribute value into a usage, if it qualifies.
///
/// Splits on whitespace, filters by prefix, sorts, deduplicates, and applies
/// the minimum-classes floor. Shared by every dialect strategy.
pub(crate) fn usage_from_value(value: &str, options: &ExtractOptions) -> Option<ClassUsage> {
    let mut classes: Vec<String> = value
        .split_whitespace()
        .filter(|token| token.starts_with(&options.class_prefix))
        .map(str::to_string)
        .collect();
    classes.sort_unstable();
    classes.dedup();

    if classes.len() < options.effective_min() {
        return None;
    }

    Some(ClassUsage {
        classes,
        source: options.source.clone(),
    })
}

/// Extract usages from many files, tagging each usage with its file path.
///
/// Files are read and extracted in parallel; the result is ordered by the
/// (sorted) input path order, so output is deterministic. Unreadable files
/// are logged and skipped rather than aborting the batch.
pub fn extract_files(paths: &[PathBuf], options: &ExtractOptions) -> Vec<ClassUsage> {
    let mut sorted: Vec<&PathBuf> = paths.iter().collect();
    sorted.sort_unstable();

    sorted
        .par_iter()
        .map(|path| {
            let Some(dialect) = Dialect::from_path(path) else {
                return Vec::new();
            };
            let content = match std::fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    return Vec::new();
                }
            };
            let file_options = ExtractOptions {
                source: path.display().to_string(),
                ..options.clone()
            };
            dialect.extract(&content, &file_options)
        })
        .collect::<Vec<Vec<ClassUsage>>>()
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_extension() {
        assert_eq!(Dialect::from_extension("html"), Some(Dialect::Markup));
        assert_eq!(Dialect::from_extension("tsx"), Some(Dialect::Jsx));
        assert_eq!(Dialect::from_extension("svelte"), Some(Dialect::Template));
        assert_eq!(Dialect::from_extension("py"), None);
    }

    #[test]
    fn test_dialect_from_path() {
        assert_eq!(
            Dialect::from_path(Path::new("src/App.vue")),
            Some(Dialect::Markup)
        );
        assert_eq!(Dialect::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_usage_from_value_canonical_order() {
        let options = ExtractOptions::default();
        let usage = usage_from_value("_gap _flex _gap", &options).unwrap();
        assert_eq!(usage.classes, vec!["_flex", "_gap"]);
        assert_eq!(usage.key(), "_flex _gap");
    }

    #[test]
    fn test_usage_from_value_filters_prefix() {
        let options = ExtractOptions::default();
        let usage = usage_from_value("btn _flex primary _gap", &options).unwrap();
        assert_eq!(usage.classes, vec!["_flex", "_gap"]);
    }

    #[test]
    fn test_usage_from_value_below_floor() {
        let options = ExtractOptions::default();
        assert!(usage_from_value("_flex", &options).is_none());
        assert!(usage_from_value("btn primary", &options).is_none());
    }

    #[test]
    fn test_usage_from_value_min_classes_floor_is_two() {
        let options = ExtractOptions {
            min_classes: 0,
            ..Default::default()
        };
        assert!(usage_from_value("_flex", &options).is_none());
    }

    #[test]
    fn test_usage_from_value_custom_floor() {
        let options = ExtractOptions {
            min_classes: 3,
            ..Default::default()
        };
        assert!(usage_from_value("_flex _gap", &options).is_none());
        assert!(usage_from_value("_flex _gap _p4", &options).is_some());
    }
}
