//! Graphviz DOT visualization for co-occurrence graphs.
//!
//! Optimized for memory efficiency with pre-allocated buffers
//! and the `std::fmt::Write` trait for clean string formatting.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

use crate::cooccur::CoOccurrenceMatrix;

/// Generate a Graphviz DOT representation of the co-occurrence graph.
///
/// - classes claimed by an accepted merge are lightgreen
/// - unclaimed classes are lightgray
/// - edges are labeled with co-occurrence counts
pub fn generate_dot(matrix: &CoOccurrenceMatrix, merge_map: &BTreeMap<String, String>) -> String {
    let claimed: HashSet<&str> = merge_map
        .keys()
        .flat_map(|key| key.split(' '))
        .collect();

    // Estimate capacity: ~60 bytes/node + ~50 bytes/edge + 150 bytes header/footer
    let node_count = matrix.len();
    let edge_count: usize = matrix.values().map(BTreeMap::len).sum();
    let estimated_capacity = (node_count * 60) + (edge_count * 50) + 150;

    let mut dot = String::with_capacity(estimated_capacity);

    if let Err(e) = write_dot_content(&mut dot, matrix, &claimed) {
        tracing::error!(error = %e, "failed to generate DOT string");
        return "graph classpack {\n}\n".to_string();
    }

    dot
}

/// Internal function to write DOT content using the Write trait.
fn write_dot_content(
    dot: &mut String,
    matrix: &CoOccurrenceMatrix,
    claimed: &HashSet<&str>,
) -> std::fmt::Result {
    writeln!(dot, "graph classpack {{")?;
    writeln!(dot, "  layout=neato;")?;
    writeln!(
        dot,
        "  node [shape=box, style=filled, fontname=\"JetBrains Mono\"];"
    )?;
    writeln!(dot)?;

    // Nodes: every class on either side of a pair, colored by claim status
    let mut names: Vec<&str> = matrix.keys().map(String::as_str).collect();
    for row in matrix.values() {
        names.extend(row.keys().map(String::as_str));
    }
    names.sort_unstable();
    names.dedup();

    for name in &names {
        let color = if claimed.contains(name) {
            "lightgreen"
        } else {
            "lightgray"
        };
        writeln!(dot, "  \"{}\" [fillcolor={}];", name, color)?;
    }

    writeln!(dot)?;

    for (a, row) in matrix {
        for (b, freq) in row {
            writeln!(dot, "  \"{}\" -- \"{}\" [label={}];", a, b, freq)?;
        }
    }

    writeln!(dot, "}}")?;
    Ok(())
}
