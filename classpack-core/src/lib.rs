//! classpack-core: atomic CSS class merge optimization library
//!
//! This library reduces the footprint of utility-class-heavy markup by
//! discovering which classes repeatedly co-occur on the same elements and
//! replacing each such group with a single merged class backed by a single
//! combined CSS rule. It operates purely on text and a caller-supplied
//! declaration table; there is no DOM, no browser, no network.
//!
//! # Features
//!
//! - **Multi-dialect extraction**: `class` attributes in markup, JSX
//!   `className` attributes, and component templates with interpolation
//! - **Co-occurrence analysis**: pairwise counts with graph/JSON exports
//! - **Frequent-pattern mining**: subset enumeration with savings
//!   estimation and subsumption pruning
//! - **Conflict-free merge selection**: greedy, savings-descending,
//!   deterministic; no class is ever claimed by two merges
//! - **Deterministic naming**: merged class names hash from declaration
//!   text, never from discovery order
//! - **CSS emission**: claimed single-class rules are dropped; media
//!   blocks and pseudo-class rules pass through verbatim
//! - **Re-application**: merge maps apply back onto class lists and onto
//!   source text in every supported dialect
//! - **External analyzer bridge**: adapts co-occurrence reports produced
//!   by other-language static analyzers
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use classpack_core::prelude::*;
//!
//! let result = Classpack::new("/path/to/app")
//!     .declaration_table(table)
//!     .css(css_text)
//!     .run()?;
//!
//! println!("{}", result.css);
//! ```
//!
//! # Module Organization
//!
//! - [`extract`]: per-dialect class-attribute extraction
//! - [`cooccur`]: pairwise co-occurrence analysis
//! - [`mine`]: frequent-pattern mining and subsumption pruning
//! - [`optimize`]: merge selection and CSS emission
//! - [`apply`]: merge-map re-application onto class lists and source text
//! - [`hash`]: deterministic class name hashing
//! - [`css`]: CSS rule scanning, filtering, and generation
//! - [`bridge`]: external static-analyzer report adaptation
//! - [`scan`]: parallel source file discovery
//! - [`builder`]: fluent API over scan → extract → optimize
//! - [`error`]: typed error handling
//!
//! # Cargo Features
//!
//! - `fix` (default): in-place source file rewriting
//! - `dot` (default): Graphviz DOT output for co-occurrence graphs
//! - `full`: all optional features

// Core modules (always available)
pub mod apply;
pub mod bridge;
pub mod builder;
pub mod config;
pub mod cooccur;
pub mod css;
pub mod error;
pub mod extract;
pub mod hash;
pub mod logging;
pub mod mine;
pub mod optimize;
pub mod prelude;
pub mod report;
pub mod scan;

// Feature-gated modules
#[cfg(feature = "fix")]
pub mod rewrite;

#[cfg(feature = "dot")]
pub mod visualize;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{ClasspackError, ClasspackResult, IoResultExt};

// Extraction
pub use extract::{
    extract, extract_files, extract_jsx, extract_markup, extract_template,
    ClassUsage, Dialect, ExtractOptions,
};

// Co-occurrence analysis
pub use cooccur::{
    build_matrix, cooccurrence_graph, cooccurrence_pairs, cooccurrence_to_json,
    CoOccurrence, CoOccurrenceMatrix,
};

// Pattern mining
pub use mine::{
    find_frequent_patterns, MergePattern, MiningWeights,
    DEFAULT_CSS_BYTES_PER_RULE, DEFAULT_HTML_BYTES_PER_CLASS, DEFAULT_SUBSUME_RATIO,
};

// Optimization
pub use optimize::{optimize, OptimizeOptions, OptimizeResult, OptimizeStats};

// Re-application
pub use apply::{
    apply_merge_to_classes, rewrite_jsx, rewrite_markup, rewrite_source, rewrite_template,
};

// Hashing
pub use hash::{
    hash_class_name, hash_merged_class_name, hash_string,
    CLASS_HASH_PREFIX, MERGED_HASH_PREFIX,
};

// CSS scanning and generation
pub use css::{filter_rules, format_rule, scan_rules, CssRule, CssRuleKind};

// External analyzer bridge
pub use bridge::{
    parse_report, usages_from_report, AnalyzerReport, AnalyzerWarning, BridgedUsages,
    ReportedCoOccurrence, WarningKind,
};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Configuration
pub use config::{load_config, load_declaration_table, ClasspackConfig, OutputConfig};

// Reporting
pub use report::{print_json, print_plain};

// File scanning
pub use scan::{gather_source_files, gather_source_files_with_excludes, DEFAULT_EXTENSIONS};

// Builder API
pub use builder::Classpack;

// Feature-gated re-exports
#[cfg(feature = "fix")]
pub use rewrite::{rewrite_file, rewrite_files, RewriteResult};

#[cfg(feature = "dot")]
pub use visualize::generate_dot;
