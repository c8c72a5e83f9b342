//! `class` attribute extraction for component templates (Svelte, Astro).
//!
//! These dialects allow `{expr}` interpolation spans inside attribute
//! values. Interpolations are replaced with whitespace before tokenizing,
//! so literal class tokens around them are still found while the expression
//! itself contributes nothing. Rewriting (see the transform module) carries
//! interpolation spans through untouched.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use super::markup::class_attr_regex;
use super::{usage_from_value, ClassUsage, ExtractOptions};

/// Matches one `{expr}` interpolation span (no nested braces).
fn interpolation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^{}]*\}").expect("hardcoded interpolation pattern is valid"))
}

/// Replace every `{expr}` span with a single space.
///
/// A space, not the empty string, so that tokens on either side of an
/// interpolation are never glued together.
pub(crate) fn strip_interpolations(value: &str) -> Cow<'_, str> {
    interpolation_regex().replace_all(value, " ")
}

/// Extract class usages from component-template content.
pub fn extract_template(content: &str, options: &ExtractOptions) -> Vec<ClassUsage> {
    class_attr_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            usage_from_value(&strip_interpolations(value), options)
        })
        .collect()
}
