//! Configuration loading from classpack.toml and declaration table files.

use std::collections::BTreeMap;
use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Main configuration structure for classpack.toml.
#[derive(Debug, Deserialize, Default)]
pub struct ClasspackConfig {
    /// Utility class prefix (default "_").
    pub prefix: Option<String>,
    /// Minimum pattern frequency.
    pub min_frequency: Option<usize>,
    /// Maximum pattern size.
    pub max_pattern_size: Option<usize>,
    /// Pretty-print generated CSS.
    pub pretty: Option<bool>,
    /// File extensions to scan.
    pub extensions: Option<Vec<String>>,
    /// Extra directory names to exclude from scanning.
    pub exclude: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

/// Loads configuration from classpack.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<ClasspackConfig>> {
    let path = root.join("classpack.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let cfg = toml::from_str(&content).context("Invalid classpack.toml")?;
    Ok(Some(cfg))
}

/// Loads a JSON declaration table, accepting either orientation.
///
/// The natural orientation maps class name → declaration text. Some
/// toolchains emit the reverse (declaration → class); that shape is
/// detected by counting which side carries `property:value` strings and
/// inverted on load.
pub fn load_declaration_table(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read declaration table {}", path.display()))?;
    let table: BTreeMap<String, String> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid declaration table {}", path.display()))?;

    let key_decls = table.keys().filter(|k| k.contains(':')).count();
    let value_decls = table.values().filter(|v| v.contains(':')).count();

    if key_decls > value_decls {
        // Reverse orientation: declaration → class
        Ok(table.into_iter().map(|(decl, class)| (class, decl)).collect())
    } else {
        Ok(table)
    }
}
