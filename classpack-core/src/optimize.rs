//! Merge selection and CSS emission: the optimizer core.
//!
//! Walks mined candidates in savings-descending order and accepts each one
//! whose classes all resolve to declarations and none of which has been
//! claimed by an earlier acceptance. Greedy first-accepted-wins is a
//! deliberate approximation of an NP-hard set-packing optimum; the
//! savings-descending walk biases toward the highest-value merges and keeps
//! the run deterministic.
//!
//! The central correctness invariant lives here: across all accepted
//! patterns, no class belongs to two merge keys.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::css;
use crate::error::{ClasspackError, ClasspackResult};
use crate::extract::ClassUsage;
use crate::hash::{hash_merged_class_name, MERGED_HASH_PREFIX};
use crate::mine::{find_frequent_patterns, MergePattern, MiningWeights};

/// Options for one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeOptions {
    /// Minimum usages a pattern needs to become a candidate
    pub min_frequency: usize,
    /// Largest group size to enumerate (2..=N)
    pub max_pattern_size: usize,
    /// Emit human-readable CSS with newlines and indentation
    pub pretty: bool,
    /// Log accepted and skipped patterns
    pub verbose: bool,
    /// Savings-estimation weights
    pub weights: MiningWeights,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            min_frequency: 2,
            max_pattern_size: 5,
            pretty: false,
            verbose: false,
            weights: MiningWeights::default(),
        }
    }
}

impl OptimizeOptions {
    /// Reject configurations that cannot produce a meaningful run.
    ///
    /// This is the only hard failure mode: data oddities degrade to skipped
    /// patterns, but a nonsensical configuration is a programmer error.
    pub fn validate(&self) -> ClasspackResult<()> {
        if self.max_pattern_size < 2 {
            return Err(ClasspackError::invalid_argument(format!(
                "max_pattern_size must be at least 2, got {}",
                self.max_pattern_size
            )));
        }
        if self.min_frequency == 0 {
            return Err(ClasspackError::invalid_argument(
                "min_frequency must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Statistics for one optimization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeStats {
    /// Size of the caller-supplied declaration table
    pub original_classes: usize,
    /// Number of accepted merge patterns
    pub merged_patterns: usize,
    /// Sum of accepted patterns' estimated savings
    pub estimated_bytes_saved: usize,
}

/// Complete, immutable snapshot of one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// Generated merged rules followed by the surviving original rules
    pub css: String,
    /// Canonical merge key (sorted classes, space-joined) → merged class
    pub merge_map: BTreeMap<String, String>,
    /// Accepted patterns only, in acceptance order
    pub patterns: Vec<MergePattern>,
    /// Run statistics
    pub stats: OptimizeStats,
}

/// Run one optimization: mine, select, emit.
///
/// `class_to_declaration` is the caller-supplied source of truth mapping
/// each utility class to its normalized declaration text. Classes absent
/// from the table are never merged. With no usages at all, the input CSS is
/// returned unchanged with an empty merge map: an early exit, not an
/// error.
pub fn optimize(
    usages: &[ClassUsage],
    css_text: &str,
    class_to_declaration: &BTreeMap<String, String>,
    options: &OptimizeOptions,
) -> ClasspackResult<OptimizeResult> {
    options.validate()?;

    let stats_base = OptimizeStats {
        original_classes: class_to_declaration.len(),
        ..Default::default()
    };

    if usages.is_empty() {
        return Ok(OptimizeResult {
            css: css_text.to_string(),
            merge_map: BTreeMap::new(),
            patterns: Vec::new(),
            stats: stats_base,
        });
    }

    let candidates = find_frequent_patterns(
        usages,
        options.min_frequency,
        options.max_pattern_size,
        &options.weights,
    );

    let mut claimed: HashSet<String> = HashSet::new();
    let mut merge_map: BTreeMap<String, String> = BTreeMap::new();
    let mut accepted: Vec<MergePattern> = Vec::new();
    let mut merged_rules: Vec<String> = Vec::new();
    let mut bytes_saved = 0usize;

    for candidate in candidates {
        // Every constituent must resolve; an unknown class cannot be merged safely
        let resolved: Option<Vec<String>> = candidate
            .original_classes
            .iter()
            .map(|class| class_to_declaration.get(class).cloned())
            .collect();
        let Some(mut declarations) = resolved else {
            debug!(key = %candidate.key(), "skipping pattern with unresolved class");
            continue;
        };

        // First-accepted-wins: overlap with an earlier acceptance is expected
        if candidate
            .original_classes
            .iter()
            .any(|class| claimed.contains(class))
        {
            debug!(key = %candidate.key(), "skipping pattern with claimed class");
            continue;
        }

        declarations.sort_unstable();
        let merged_class = hash_merged_class_name(&declarations, MERGED_HASH_PREFIX);

        if options.verbose {
            info!(
                key = %candidate.key(),
                merged = %merged_class,
                frequency = candidate.frequency,
                "accepted merge pattern"
            );
        }

        merge_map.insert(candidate.key(), merged_class.clone());
        claimed.extend(candidate.original_classes.iter().cloned());
        merged_rules.push(css::format_rule(&merged_class, &declarations, options.pretty));
        bytes_saved += candidate.bytes_saved;

        accepted.push(MergePattern {
            declarations,
            merged_class: Some(merged_class),
            ..candidate
        });
    }

    let filtered = css::filter_rules(css_text, &claimed, options.pretty);
    let css = assemble_css(&merged_rules, &filtered, options.pretty);

    Ok(OptimizeResult {
        css,
        merge_map,
        stats: OptimizeStats {
            merged_patterns: accepted.len(),
            estimated_bytes_saved: bytes_saved,
            ..stats_base
        },
        patterns: accepted,
    })
}

/// Concatenate generated rules with the surviving original rules.
fn assemble_css(merged_rules: &[String], filtered: &str, pretty: bool) -> String {
    if pretty {
        let mut parts: Vec<&str> = merged_rules.iter().map(String::as_str).collect();
        if !filtered.is_empty() {
            parts.push(filtered);
        }
        parts.join("\n")
    } else {
        format!("{}{}", merged_rules.concat(), filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(classes: &[&str]) -> ClassUsage {
        ClassUsage {
            classes: classes.iter().map(|s| s.to_string()).collect(),
            source: "test".to_string(),
        }
    }

    fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn flex_gap_table() -> BTreeMap<String, String> {
        table(&[
            ("_flex", "display:flex"),
            ("_gap", "gap:1rem"),
            ("_p4", "padding:1rem"),
        ])
    }

    #[test]
    fn test_empty_usages_identity() {
        let css = "._flex{display:flex}";
        let result =
            optimize(&[], css, &flex_gap_table(), &OptimizeOptions::default()).unwrap();

        assert_eq!(result.css, css);
        assert!(result.merge_map.is_empty());
        assert!(result.patterns.is_empty());
        assert_eq!(result.stats.merged_patterns, 0);
        assert_eq!(result.stats.estimated_bytes_saved, 0);
        assert_eq!(result.stats.original_classes, 3);
    }

    #[test]
    fn test_invalid_max_pattern_size() {
        let options = OptimizeOptions {
            max_pattern_size: 1,
            ..Default::default()
        };
        let err = optimize(&[], "", &BTreeMap::new(), &options).unwrap_err();
        assert!(matches!(err, ClasspackError::InvalidArgument { .. }));
    }

    #[test]
    fn test_invalid_min_frequency() {
        let options = OptimizeOptions {
            min_frequency: 0,
            ..Default::default()
        };
        assert!(optimize(&[], "", &BTreeMap::new(), &options).is_err());
    }

    #[test]
    fn test_basic_merge() {
        let usages = vec![
            usage(&["_flex", "_gap", "_p4"]),
            usage(&["_flex", "_gap", "_p4"]),
            usage(&["_flex", "_gap"]),
        ];
        let css = "._flex{display:flex}._gap{gap:1rem}._p4{padding:1rem}";
        let result =
            optimize(&usages, css, &flex_gap_table(), &OptimizeOptions::default()).unwrap();

        // The triple (freq 2) wins; every pair inside it is subsumed or claimed
        assert_eq!(result.merge_map.len(), 1);
        let merged = &result.merge_map["_flex _gap _p4"];
        assert!(merged.starts_with("_m"));
        assert!(result
            .css
            .starts_with(&format!(".{}{{display:flex;gap:1rem;padding:1rem}}", merged)));
        // All three single-class rules were claimed and dropped
        assert!(!result.css.contains("._flex{display:flex}"));
        assert_eq!(result.stats.merged_patterns, 1);
    }

    #[test]
    fn test_unresolved_class_skipped() {
        let usages = vec![
            usage(&["_flex", "_unknown"]),
            usage(&["_flex", "_unknown"]),
        ];
        let result = optimize(
            &usages,
            "._flex{display:flex}",
            &flex_gap_table(),
            &OptimizeOptions::default(),
        )
        .unwrap();

        assert!(result.merge_map.is_empty());
        assert_eq!(result.css, "._flex{display:flex}");
    }

    #[test]
    fn test_claim_conflict_skipped() {
        // Two disjoint-frequency patterns sharing _flex: the bigger saver
        // claims it and the other is skipped.
        let mut usages = vec![
            usage(&["_flex", "_gap", "_p4"]),
            usage(&["_flex", "_gap", "_p4"]),
            usage(&["_flex", "_gap", "_p4"]),
        ];
        for _ in 0..20 {
            usages.push(usage(&["_flex", "_p4"]));
        }
        let result = optimize(
            &usages,
            "",
            &flex_gap_table(),
            &OptimizeOptions::default(),
        )
        .unwrap();

        // Disjointness: no class appears in two merge keys
        let mut seen = HashSet::new();
        for key in result.merge_map.keys() {
            for class in key.split(' ') {
                assert!(seen.insert(class.to_string()), "{} claimed twice", class);
            }
        }
    }

    #[test]
    fn test_media_and_pseudo_preserved() {
        let usages = vec![usage(&["_flex", "_gap"]), usage(&["_flex", "_gap"])];
        let css = "._flex{display:flex}._gap{gap:1rem}@media print{._flex{display:none}}._flex:hover{opacity:1}";
        let result =
            optimize(&usages, css, &flex_gap_table(), &OptimizeOptions::default()).unwrap();

        assert!(result.css.contains("@media print{._flex{display:none}}"));
        assert!(result.css.contains("._flex:hover{opacity:1}"));
    }

    #[test]
    fn test_deterministic_runs() {
        let usages = vec![
            usage(&["_flex", "_gap", "_p4"]),
            usage(&["_flex", "_gap", "_p4"]),
            usage(&["_flex", "_gap"]),
        ];
        let css = "._flex{display:flex}._gap{gap:1rem}._p4{padding:1rem}";
        let options = OptimizeOptions::default();

        let first = optimize(&usages, css, &flex_gap_table(), &options).unwrap();
        let second = optimize(&usages, css, &flex_gap_table(), &options).unwrap();

        assert_eq!(first.css, second.css);
        assert_eq!(first.merge_map, second.merge_map);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn test_merged_name_matches_declaration_hash() {
        // The merged name depends only on the declaration set, regardless
        // of the order the declarations were resolved in.
        let usages = vec![usage(&["_flex", "_gap"]), usage(&["_flex", "_gap"])];
        let result = optimize(
            &usages,
            "",
            &flex_gap_table(),
            &OptimizeOptions::default(),
        )
        .unwrap();

        let expected = hash_merged_class_name(&["gap:1rem", "display:flex"], MERGED_HASH_PREFIX);
        assert_eq!(result.merge_map["_flex _gap"], expected);
    }

    #[test]
    fn test_pretty_output() {
        let usages = vec![usage(&["_flex", "_gap"]), usage(&["_flex", "_gap"])];
        let options = OptimizeOptions {
            pretty: true,
            ..Default::default()
        };
        let result = optimize(
            &usages,
            "._p4{padding:1rem}",
            &flex_gap_table(),
            &options,
        )
        .unwrap();

        assert!(result.css.contains(" {\n"));
        assert!(result.css.contains("\n._p4{padding:1rem}"));
    }

    #[test]
    fn test_accepted_patterns_carry_sorted_declarations() {
        let usages = vec![usage(&["_gap", "_flex"]), usage(&["_flex", "_gap"])];
        let result = optimize(
            &usages,
            "",
            &flex_gap_table(),
            &OptimizeOptions::default(),
        )
        .unwrap();

        let pattern = &result.patterns[0];
        assert_eq!(pattern.declarations, vec!["display:flex", "gap:1rem"]);
        assert!(pattern.merged_class.is_some());
    }
}
