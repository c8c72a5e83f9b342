//! Pairwise co-occurrence analysis over class usages.
//!
//! Builds a counting matrix of unordered class pairs: for every usage,
//! every pair of its classes increments a count keyed by the
//! lexicographically-first class, then the second. Pattern mining derives
//! its own counts directly, so this matrix is an independent, reusable
//! analysis for callers who only want pairwise statistics (adjacency
//! views, graph exports).
//!
//! Performance characteristics:
//! - Matrix build: O(usages × k²) where k = classes per usage
//! - Maps are BTreeMaps so iteration (and every export) is deterministic

use std::collections::BTreeMap;

use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};

use crate::extract::ClassUsage;

/// Co-occurrence counts keyed by `(first class, second class)` with the
/// first lexicographically smaller than the second.
pub type CoOccurrenceMatrix = BTreeMap<String, BTreeMap<String, usize>>;

/// An unordered pair of class names and how many usages contain both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoOccurrence {
    /// Lexicographically-first class of the pair
    pub class_a: String,
    /// Second class of the pair
    pub class_b: String,
    /// Number of usages containing both
    pub frequency: usize,
}

/// Build the pairwise co-occurrence matrix from a set of usages.
///
/// Usage class lists are already sorted and deduplicated, so enumerating
/// pairs with `i < j` yields each unordered pair exactly once, already in
/// canonical order.
pub fn build_matrix(usages: &[ClassUsage]) -> CoOccurrenceMatrix {
    let mut matrix: CoOccurrenceMatrix = BTreeMap::new();

    for usage in usages {
        for i in 0..usage.classes.len() {
            for j in (i + 1)..usage.classes.len() {
                *matrix
                    .entry(usage.classes[i].clone())
                    .or_default()
                    .entry(usage.classes[j].clone())
                    .or_insert(0) += 1;
            }
        }
    }

    matrix
}

/// Flatten the matrix into a pair list, highest frequency first.
///
/// Ties break on the pair's names so output order is stable.
pub fn cooccurrence_pairs(matrix: &CoOccurrenceMatrix) -> Vec<CoOccurrence> {
    let mut pairs: Vec<CoOccurrence> = matrix
        .iter()
        .flat_map(|(a, row)| {
            row.iter().map(move |(b, freq)| CoOccurrence {
                class_a: a.clone(),
                class_b: b.clone(),
                frequency: *freq,
            })
        })
        .collect();

    pairs.sort_by(|x, y| {
        y.frequency
            .cmp(&x.frequency)
            .then_with(|| x.class_a.cmp(&y.class_a))
            .then_with(|| x.class_b.cmp(&y.class_b))
    });

    pairs
}

/// Build an undirected adjacency graph over the matrix.
///
/// Nodes are class names, edge weights are co-occurrence counts. Useful for
/// clustering or visual exploration of how a utility vocabulary is used.
pub fn cooccurrence_graph(matrix: &CoOccurrenceMatrix) -> UnGraphMap<&str, usize> {
    let mut g = UnGraphMap::new();

    for (a, row) in matrix {
        g.add_node(a.as_str());
        for (b, freq) in row {
            g.add_node(b.as_str());
            g.add_edge(a.as_str(), b.as_str(), *freq);
        }
    }

    g
}

/// Export the matrix in viewer-compatible JSON.
///
/// Output shape:
/// ```json
/// {
///   "nodes": [{ "id": 0, "name": "_flex" }],
///   "edges": [{ "from": 0, "to": 1, "frequency": 3 }],
///   "stats": { "total_classes": 2, "total_pairs": 1 }
/// }
/// ```
pub fn cooccurrence_to_json(matrix: &CoOccurrenceMatrix) -> serde_json::Value {
    // Collect every class name that appears on either side of a pair
    let mut names: Vec<&str> = matrix.keys().map(String::as_str).collect();
    for row in matrix.values() {
        names.extend(row.keys().map(String::as_str));
    }
    names.sort_unstable();
    names.dedup();

    let name_to_id: BTreeMap<&str, usize> =
        names.iter().enumerate().map(|(i, n)| (*n, i)).collect();

    let nodes: Vec<serde_json::Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| serde_json::json!({ "id": i, "name": name }))
        .collect();

    let mut edges: Vec<serde_json::Value> = Vec::new();
    for (a, row) in matrix {
        for (b, freq) in row {
            edges.push(serde_json::json!({
                "from": name_to_id[a.as_str()],
                "to": name_to_id[b.as_str()],
                "frequency": freq,
            }));
        }
    }

    serde_json::json!({
        "nodes": nodes,
        "edges": edges,
        "stats": {
            "total_classes": names.len(),
            "total_pairs": edges.len(),
        }
    })
}
