//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use classpack_core::prelude::*;
//! ```
//!
//! This provides the most commonly needed types for class merge
//! optimization without polluting the namespace with rarely-used items.

// Core analysis types
pub use crate::error::{ClasspackError, ClasspackResult};
pub use crate::extract::{ClassUsage, Dialect, ExtractOptions};

// Extraction
pub use crate::extract::{extract, extract_files};

// Co-occurrence analysis
pub use crate::cooccur::{build_matrix, cooccurrence_pairs, CoOccurrence};

// Pattern mining
pub use crate::mine::{find_frequent_patterns, MergePattern, MiningWeights};

// Optimization
pub use crate::optimize::{optimize, OptimizeOptions, OptimizeResult, OptimizeStats};

// Re-application
pub use crate::apply::{apply_merge_to_classes, rewrite_source};

// Hashing
pub use crate::hash::{hash_class_name, hash_merged_class_name};

// File scanning
pub use crate::scan::{gather_source_files, gather_source_files_with_excludes};

// External analyzer bridge
pub use crate::bridge::{parse_report, usages_from_report, AnalyzerReport};

// Configuration
pub use crate::config::{load_config, load_declaration_table, ClasspackConfig};

// Builder API
pub use crate::builder::Classpack;

// Rewrite functionality
#[cfg(feature = "fix")]
pub use crate::rewrite::{rewrite_file, rewrite_files, RewriteResult};
