//! Frequent-pattern mining over class usages.
//!
//! For every usage, every size-k subset of its class list (2 ≤ k ≤
//! `max_pattern_size`) increments a frequency counter. Candidates at or
//! above the frequency floor get a savings estimate and are pruned of
//! subsumed patterns before the optimizer walks them greedily.
//!
//! Performance characteristics:
//! - Enumeration: O(usages × C(k, size)), tractable because class lists
//!   are short and `max_pattern_size` is bounded (≤5 in practice)
//! - Subsumption pruning: O(n²) over the candidate list, which is small
//!   relative to the usage count

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::extract::ClassUsage;

/// Default estimated attribute-text bytes saved per merged class occurrence.
pub const DEFAULT_HTML_BYTES_PER_CLASS: usize = 7;

/// Default estimated bytes saved by emitting one fewer CSS rule.
pub const DEFAULT_CSS_BYTES_PER_RULE: usize = 25;

/// Default subsumption threshold: a larger pattern at or above this share
/// of a smaller pattern's frequency displaces it.
pub const DEFAULT_SUBSUME_RATIO: f64 = 0.8;

/// Tunable savings-estimation weights.
///
/// The defaults are heuristic constants carried over unchanged; they have
/// no documented derivation and are not worth re-deriving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MiningWeights {
    /// Attribute-text bytes saved per replaced class per occurrence
    pub html_bytes_per_class: usize,
    /// Fixed bytes saved per eliminated CSS rule
    pub css_bytes_per_rule: usize,
    /// Frequency ratio at which a superset pattern subsumes a subset
    pub subsume_ratio: f64,
}

impl Default for MiningWeights {
    fn default() -> Self {
        Self {
            html_bytes_per_class: DEFAULT_HTML_BYTES_PER_CLASS,
            css_bytes_per_rule: DEFAULT_CSS_BYTES_PER_RULE,
            subsume_ratio: DEFAULT_SUBSUME_RATIO,
        }
    }
}

/// A candidate (or accepted) group of classes to merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePattern {
    /// Constituent classes, sorted
    pub original_classes: Vec<String>,
    /// Resolved declaration texts, sorted; filled in at acceptance time
    pub declarations: Vec<String>,
    /// Assigned merged class name; `None` until the pattern is accepted
    pub merged_class: Option<String>,
    /// Number of usages containing every constituent
    pub frequency: usize,
    /// Estimated bytes saved by applying this merge
    pub bytes_saved: usize,
}

impl MergePattern {
    /// Canonical merge key: constituent classes, space-joined.
    pub fn key(&self) -> String {
        self.original_classes.join(" ")
    }
}

/// Mine frequent class groupings from a set of usages.
///
/// Returns candidates sorted by estimated savings descending (ties broken
/// by frequency, then key, so the order is fully deterministic), with
/// subsumed candidates removed. Candidates carry no declarations yet; the
/// optimizer resolves those against the declaration table.
pub fn find_frequent_patterns(
    usages: &[ClassUsage],
    min_frequency: usize,
    max_pattern_size: usize,
    weights: &MiningWeights,
) -> Vec<MergePattern> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for usage in usages {
        let upper = max_pattern_size.min(usage.classes.len());
        let mut current: Vec<&str> = Vec::with_capacity(upper);
        for size in 2..=upper {
            count_subsets(&usage.classes, size, 0, &mut current, &mut counts);
        }
    }

    let candidates: Vec<MergePattern> = counts
        .into_iter()
        .filter(|(_, frequency)| *frequency >= min_frequency)
        .map(|(key, frequency)| {
            let original_classes: Vec<String> = key.split('|').map(str::to_string).collect();
            let k = original_classes.len();
            let bytes_saved = (k - 1) * weights.html_bytes_per_class * frequency
                + (k - 1) * weights.css_bytes_per_rule;
            MergePattern {
                original_classes,
                declarations: Vec::new(),
                merged_class: None,
                frequency,
                bytes_saved,
            }
        })
        .collect();

    let mut kept = prune_subsumed(candidates, weights.subsume_ratio);

    kept.sort_by(|a, b| {
        b.bytes_saved
            .cmp(&a.bytes_saved)
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.original_classes.cmp(&b.original_classes))
    });

    kept
}

/// Enumerate all size-k subsets of a sorted class list and count them.
///
/// Subsets are emitted in the list's order, so the pipe-joined key is
/// already canonical.
fn count_subsets<'a>(
    classes: &'a [String],
    size: usize,
    start: usize,
    current: &mut Vec<&'a str>,
    counts: &mut HashMap<String, usize>,
) {
    if current.len() == size {
        *counts.entry(current.join("|")).or_insert(0) += 1;
        return;
    }

    for i in start..classes.len() {
        // Not enough classes left to complete the subset
        if classes.len() - i < size - current.len() {
            break;
        }
        current.push(&classes[i]);
        count_subsets(classes, size, i + 1, current, counts);
        current.pop();
    }
}

/// Drop candidates dominated by a strictly larger, almost-as-frequent one.
///
/// A candidate P is discarded when some candidate Q has a strict superset
/// of P's classes and `frequency(Q) >= ratio * frequency(P)`. Merging both
/// would double-count the savings and fragment the output; keeping only the
/// larger, more specific merge wins.
fn prune_subsumed(candidates: Vec<MergePattern>, ratio: f64) -> Vec<MergePattern> {
    candidates
        .iter()
        .filter(|p| {
            !candidates.iter().any(|q| {
                is_strict_superset(&q.original_classes, &p.original_classes)
                    && (q.frequency as f64) >= ratio * (p.frequency as f64)
            })
        })
        .cloned()
        .collect()
}

/// Check that `superset` strictly contains every class of `subset`.
/// Both slices are sorted, so membership is a binary search.
fn is_strict_superset(superset: &[String], subset: &[String]) -> bool {
    superset.len() > subset.len()
        && subset.iter().all(|c| superset.binary_search(c).is_ok())
}
