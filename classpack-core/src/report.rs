//! Output formatting - plaintext and JSON.

use crate::optimize::OptimizeResult;

/// Prints an optimization result in plain text format.
pub fn print_plain(result: &OptimizeResult) {
    if result.patterns.is_empty() {
        println!("No merge patterns found.");
        return;
    }

    println!("MERGED PATTERNS ({}):", result.patterns.len());
    for pattern in &result.patterns {
        println!(
            "- {} -> {} (x{}, ~{} bytes)",
            pattern.key(),
            pattern.merged_class.as_deref().unwrap_or("?"),
            pattern.frequency,
            pattern.bytes_saved,
        );
    }
    println!(
        "Estimated bytes saved: {}",
        result.stats.estimated_bytes_saved
    );
}

/// Prints an optimization result in JSON format.
///
/// Falls back to a minimal summary if serialization fails (should never
/// happen for these types, but degrade rather than panic).
pub fn print_json(result: &OptimizeResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!(
                "{{\"merged_patterns\": {}, \"estimated_bytes_saved\": {}}}",
                result.stats.merged_patterns, result.stats.estimated_bytes_saved
            );
        }
    }
}
