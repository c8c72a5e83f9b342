//! `className` attribute extraction for JSX/TSX sources.
//!
//! Handles the string forms (`className="..."`, `className='...'`) and the
//! simple template-literal form (`` className={`...`} ``). A template
//! literal containing a `${}` substitution is dynamic and is skipped
//! entirely: dynamic class detection is a non-goal and merging such a span
//! would not be safe.

use std::sync::OnceLock;

use regex::Regex;

use super::{usage_from_value, ClassUsage, ExtractOptions};

/// Matches `className` attributes. Group 1 is everything up to the value;
/// groups 2/3 capture quoted string values, group 4 a template literal.
pub(crate) fn jsx_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(className\s*=\s*)(?:"([^"]*)"|'([^']*)'|\{\s*`([^`]*)`\s*\})"#)
            .expect("hardcoded className attribute pattern is valid")
    })
}

/// Extract class usages from JSX/TSX content.
pub fn extract_jsx(content: &str, options: &ExtractOptions) -> Vec<ClassUsage> {
    jsx_attr_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let value = if let Some(m) = caps.get(2).or_else(|| caps.get(3)) {
                m.as_str()
            } else {
                let literal = caps.get(4)?.as_str();
                // `${}` substitutions make the class list dynamic
                if literal.contains("${") {
                    return None;
                }
                literal
            };
            usage_from_value(value, options)
        })
        .collect()
}
