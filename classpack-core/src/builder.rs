//! Builder pattern API for running a whole optimization from a project root.
//!
//! Provides a fluent interface over scan → extract → optimize:
//!
//! ```rust,ignore
//! use classpack_core::prelude::*;
//!
//! let result = Classpack::new("/path/to/app")
//!     .prefix("_")
//!     .min_frequency(3)
//!     .declaration_table(table)
//!     .css(css_text)
//!     .run()?;
//!
//! println!("merged {} patterns", result.stats.merged_patterns);
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::ClasspackConfig;
use crate::extract::{extract_files, ExtractOptions};
use crate::mine::MiningWeights;
use crate::optimize::{optimize, OptimizeOptions, OptimizeResult};
use crate::scan::{gather_source_files_with_excludes, DEFAULT_EXTENSIONS};

/// Builder for configuring an optimization run over a project tree.
#[derive(Debug, Clone)]
pub struct Classpack {
    /// Root path of the project to scan
    root: PathBuf,

    /// Utility class prefix
    prefix: String,

    /// Minimum pattern frequency
    min_frequency: usize,

    /// Maximum pattern size
    max_pattern_size: usize,

    /// Pretty-print generated CSS
    pretty: bool,

    /// Verbose diagnostics
    verbose: bool,

    /// File extensions to scan
    extensions: Vec<String>,

    /// Extra directory names to exclude
    excluded_dirs: Vec<String>,

    /// Original CSS text to filter and extend
    css: String,

    /// Class → declaration table
    declarations: BTreeMap<String, String>,
}

impl Classpack {
    /// Create a new builder for the given project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prefix: "_".to_string(),
            min_frequency: 2,
            max_pattern_size: 5,
            pretty: false,
            verbose: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            excluded_dirs: Vec::new(),
            css: String::new(),
            declarations: BTreeMap::new(),
        }
    }

    /// Set the utility class prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the minimum pattern frequency.
    pub fn min_frequency(mut self, min_frequency: usize) -> Self {
        self.min_frequency = min_frequency;
        self
    }

    /// Set the maximum pattern size.
    pub fn max_pattern_size(mut self, max_pattern_size: usize) -> Self {
        self.max_pattern_size = max_pattern_size;
        self
    }

    /// Enable pretty-printed CSS output.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.pretty = enabled;
        self
    }

    /// Enable verbose diagnostics.
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Replace the scanned extension set.
    pub fn extensions(mut self, extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Add directories to exclude from scanning.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Set the original CSS text.
    pub fn css(mut self, css: impl Into<String>) -> Self {
        self.css = css.into();
        self
    }

    /// Set the class → declaration table.
    pub fn declaration_table(mut self, table: BTreeMap<String, String>) -> Self {
        self.declarations = table;
        self
    }

    /// Overlay values from a loaded classpack.toml.
    pub fn apply_config(mut self, config: &ClasspackConfig) -> Self {
        if let Some(prefix) = &config.prefix {
            self.prefix = prefix.clone();
        }
        if let Some(min_frequency) = config.min_frequency {
            self.min_frequency = min_frequency;
        }
        if let Some(max_pattern_size) = config.max_pattern_size {
            self.max_pattern_size = max_pattern_size;
        }
        if let Some(pretty) = config.pretty {
            self.pretty = pretty;
        }
        if let Some(extensions) = &config.extensions {
            self.extensions = extensions.clone();
        }
        if let Some(exclude) = &config.exclude {
            self.excluded_dirs.extend(exclude.iter().cloned());
        }
        self
    }

    /// The extract options this builder implies.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            class_prefix: self.prefix.clone(),
            min_classes: 2,
            source: self.root.display().to_string(),
        }
    }

    /// Scan the tree, extract usages, and run the optimizer.
    pub fn run(&self) -> Result<OptimizeResult> {
        let extension_refs: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        let exclude_refs: Vec<&str> = self.excluded_dirs.iter().map(String::as_str).collect();

        let files = gather_source_files_with_excludes(&self.root, &extension_refs, &exclude_refs)
            .context("Failed to gather source files")?;

        let usages = extract_files(&files, &self.extract_options());

        let options = OptimizeOptions {
            min_frequency: self.min_frequency,
            max_pattern_size: self.max_pattern_size,
            pretty: self.pretty,
            verbose: self.verbose,
            weights: MiningWeights::default(),
        };

        optimize(&usages, &self.css, &self.declarations, &options)
            .context("Optimization failed")
    }
}
