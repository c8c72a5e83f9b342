//! classpack CLI - atomic CSS class merge optimizer.
//!
//! Features:
//! - Multi-dialect scanning (markup, JSX, component templates)
//! - Declaration tables in either orientation
//! - External analyzer report ingestion
//! - Graphviz DOT co-occurrence visualization
//! - In-place source rewriting with dry-run support

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use classpack_core::{
    build_matrix, extract_files, gather_source_files_with_excludes, generate_dot,
    init_structured_logging, load_config, load_declaration_table, log_warn, optimize,
    parse_report, print_json, print_plain, rewrite_files, usages_from_report, ClassUsage,
    ClasspackConfig, ExtractOptions, MiningWeights, OptimizeOptions, OptimizeResult,
    DEFAULT_EXTENSIONS,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Atomic CSS class merge optimizer")]
pub struct Cli {
    /// Path to the root of the project to scan
    #[arg(default_value = ".")]
    path: String,

    /// Original CSS file to filter and extend
    #[arg(long)]
    css: Option<String>,

    /// JSON declaration table (class -> declaration, or the reverse)
    #[arg(long)]
    decl_table: Option<String>,

    /// External analyzer report (JSON) merged into the usage set
    #[arg(long)]
    report: Option<String>,

    /// Utility class prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Minimum pattern frequency
    #[arg(long)]
    min_frequency: Option<usize>,

    /// Maximum pattern size
    #[arg(long)]
    max_pattern_size: Option<usize>,

    /// Pretty-print generated CSS
    #[arg(long)]
    pretty: bool,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Write optimized CSS to a file
    #[arg(long, value_name = "FILE")]
    out: Option<String>,

    /// Generate Graphviz DOT output for the co-occurrence graph
    #[arg(long)]
    dot: bool,

    /// Write DOT output to a specified file instead of stdout
    #[arg(long)]
    dot_file: Option<String>,

    /// Rewrite source files in place with the accepted merge map
    #[arg(long)]
    fix: bool,

    /// Show which files would be rewritten without modifying anything
    #[arg(long)]
    fix_dry_run: bool,

    /// Verbose diagnostics
    #[arg(long)]
    verbose: bool,
}

/// Effective settings after overlaying CLI flags on classpack.toml.
struct Settings {
    prefix: String,
    min_frequency: usize,
    max_pattern_size: usize,
    pretty: bool,
    json: bool,
    extensions: Vec<String>,
    excludes: Vec<String>,
}

impl Settings {
    fn resolve(cli: &Cli, config: Option<&ClasspackConfig>) -> Self {
        let config_format_json = config
            .and_then(|c| c.output.as_ref())
            .and_then(|o| o.format.as_deref())
            == Some("json");

        Self {
            prefix: cli
                .prefix
                .clone()
                .or_else(|| config.and_then(|c| c.prefix.clone()))
                .unwrap_or_else(|| "_".to_string()),
            min_frequency: cli
                .min_frequency
                .or_else(|| config.and_then(|c| c.min_frequency))
                .unwrap_or(2),
            max_pattern_size: cli
                .max_pattern_size
                .or_else(|| config.and_then(|c| c.max_pattern_size))
                .unwrap_or(5),
            pretty: cli.pretty || config.and_then(|c| c.pretty).unwrap_or(false),
            json: cli.json || config_format_json,
            extensions: config
                .and_then(|c| c.extensions.clone())
                .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()),
            excludes: config.and_then(|c| c.exclude.clone()).unwrap_or_default(),
        }
    }
}

/// Gather usages from the scanned tree plus an optional analyzer report.
///
/// Returns the usages, the file list (for later rewriting), and any
/// declaration-table fragments derived from the report.
fn collect_usages(
    root: &Path,
    cli: &Cli,
    settings: &Settings,
) -> Result<(Vec<ClassUsage>, Vec<PathBuf>, BTreeMap<String, String>)> {
    let extensions: Vec<&str> = settings.extensions.iter().map(String::as_str).collect();
    let excludes: Vec<&str> = settings.excludes.iter().map(String::as_str).collect();

    let files = gather_source_files_with_excludes(root, &extensions, &excludes)
        .context("Failed to gather source files")?;

    let options = ExtractOptions {
        class_prefix: settings.prefix.clone(),
        min_classes: 2,
        source: root.display().to_string(),
    };
    let mut usages = extract_files(&files, &options);
    let mut report_declarations = BTreeMap::new();

    if let Some(report_path) = &cli.report {
        let json = fs::read_to_string(report_path)
            .with_context(|| format!("Failed to read report {}", report_path))?;
        let report = parse_report(&json).context("Failed to parse analyzer report")?;
        let bridged = usages_from_report(&report, &settings.prefix);

        for warning in &bridged.warnings {
            log_warn(&format!(
                "{}:{}: {:?}: {}",
                warning.file, warning.line, warning.kind, warning.message
            ));
        }

        usages.extend(bridged.usages);
        report_declarations = bridged.declarations;
    }

    Ok((usages, files, report_declarations))
}

/// Emit the co-occurrence graph as DOT, to stdout or a file.
fn emit_dot(usages: &[ClassUsage], result: &OptimizeResult, dot_file: Option<&str>) -> Result<()> {
    let matrix = build_matrix(usages);
    let dot = generate_dot(&matrix, &result.merge_map);

    match dot_file {
        Some(path) => {
            fs::write(path, dot).with_context(|| format!("Failed to write {}", path))?;
            eprintln!("DOT graph written to {}", path);
        }
        None => println!("{}", dot),
    }
    Ok(())
}

fn main() -> Result<()> {
    init_structured_logging();
    let cli = Cli::parse();
    let root = PathBuf::from(&cli.path);

    let config = load_config(&root).context("Failed to load classpack.toml")?;
    let settings = Settings::resolve(&cli, config.as_ref());

    // Assemble inputs
    let (usages, files, report_declarations) = collect_usages(&root, &cli, &settings)?;

    let css = match &cli.css {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read CSS {}", path))?,
        None => String::new(),
    };

    let mut declarations = match &cli.decl_table {
        Some(path) => load_declaration_table(Path::new(path))?,
        None => BTreeMap::new(),
    };
    // Report-derived names extend, never override, the caller's table
    for (class, decl) in report_declarations {
        declarations.entry(class).or_insert(decl);
    }

    // Optimize
    let options = OptimizeOptions {
        min_frequency: settings.min_frequency,
        max_pattern_size: settings.max_pattern_size,
        pretty: settings.pretty,
        verbose: cli.verbose,
        weights: MiningWeights::default(),
    };
    let result = optimize(&usages, &css, &declarations, &options)?;

    // Outputs
    if cli.dot || cli.dot_file.is_some() {
        emit_dot(&usages, &result, cli.dot_file.as_deref())?;
    }

    if let Some(out) = &cli.out {
        fs::write(out, &result.css).with_context(|| format!("Failed to write {}", out))?;
        eprintln!("Optimized CSS written to {}", out);
    }

    if settings.json {
        print_json(&result);
    } else {
        print_plain(&result);
    }

    if cli.fix || cli.fix_dry_run {
        let rewrite = rewrite_files(&files, &result.merge_map, &settings.prefix, cli.fix_dry_run);
        if cli.fix_dry_run {
            println!(
                "[DRY-RUN] {} file(s) would change, {} unchanged",
                rewrite.files_changed.len(),
                rewrite.files_unchanged.len()
            );
        } else {
            println!(
                "{} file(s) rewritten, {} unchanged",
                rewrite.files_changed.len(),
                rewrite.files_unchanged.len()
            );
        }
        for error in &rewrite.errors {
            eprintln!("[WARN] {}", error);
        }
    }

    Ok(())
}
