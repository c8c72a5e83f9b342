//! Re-application of a merge map onto class lists and source text.
//!
//! Both operations share one matching rule: a merge key applies only when
//! every constituent class is present, and longer keys are tried first so
//! a 4-class merge beats a 2-class merge that is a subset of it. Classes
//! without the utility prefix are never touched and keep their original
//! relative order. Re-applying an already-applied merge map is a no-op:
//! the constituents are gone, so no key matches.

use std::collections::{BTreeMap, HashMap};

use crate::extract::{class_attr_regex, jsx_attr_regex, Dialect};

/// Replace every fully-present constituent group with its merged class.
///
/// Input is partitioned into prefix-eligible classes (sorted) and the rest
/// (kept untouched, in original order). The result is the merged names,
/// then the surviving eligible classes, then the rest.
pub fn apply_merge_to_classes(
    classes: &[String],
    merge_map: &BTreeMap<String, String>,
    class_prefix: &str,
) -> Vec<String> {
    let mut eligible: Vec<String> = Vec::new();
    let mut others: Vec<String> = Vec::new();
    for class in classes {
        if class.starts_with(class_prefix) {
            eligible.push(class.clone());
        } else {
            others.push(class.clone());
        }
    }
    eligible.sort_unstable();

    let mut merged_names: Vec<String> = Vec::new();
    for (key, merged) in keys_longest_first(merge_map) {
        let constituents: Vec<&str> = key.split(' ').collect();
        let all_present = constituents
            .iter()
            .all(|c| eligible.iter().any(|e| e == c));
        if all_present {
            eligible.retain(|e| !constituents.contains(&e.as_str()));
            merged_names.push(merged.clone());
        }
    }

    merged_names.into_iter().chain(eligible).chain(others).collect()
}

/// Merge-map entries ordered by constituent count descending, then key.
fn keys_longest_first(merge_map: &BTreeMap<String, String>) -> Vec<(&String, &String)> {
    let mut entries: Vec<(&String, &String)> = merge_map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| {
        b.split(' ')
            .count()
            .cmp(&a.split(' ').count())
            .then_with(|| a.cmp(b))
    });
    entries
}

/// Merge a flat token list; `None` when no key applied.
///
/// Any applied merge strictly shrinks the token count, so an unchanged
/// count means the attribute must be left byte-identical.
fn try_merge_tokens(
    tokens: &[String],
    merge_map: &BTreeMap<String, String>,
    class_prefix: &str,
) -> Option<Vec<String>> {
    let merged = apply_merge_to_classes(tokens, merge_map, class_prefix);
    if merged.len() < tokens.len() {
        Some(merged)
    } else {
        None
    }
}

/// Rewrite source text back into its original dialect.
pub fn rewrite_source(
    content: &str,
    dialect: Dialect,
    merge_map: &BTreeMap<String, String>,
    class_prefix: &str,
) -> String {
    match dialect {
        Dialect::Markup => rewrite_markup(content, merge_map, class_prefix),
        Dialect::Jsx => rewrite_jsx(content, merge_map, class_prefix),
        Dialect::Template => rewrite_template(content, merge_map, class_prefix),
    }
}

/// Rewrite `class` attributes in plain markup.
pub fn rewrite_markup(
    content: &str,
    merge_map: &BTreeMap<String, String>,
    class_prefix: &str,
) -> String {
    class_attr_regex()
        .replace_all(content, |caps: &regex::Captures| {
            let lead = &caps[1];
            let (value, quote) = match (caps.get(2), caps.get(3)) {
                (Some(m), _) => (m.as_str(), '"'),
                (_, Some(m)) => (m.as_str(), '\''),
                _ => return caps[0].to_string(),
            };
            let tokens: Vec<String> = value.split_whitespace().map(str::to_string).collect();
            match try_merge_tokens(&tokens, merge_map, class_prefix) {
                Some(merged) => format!("{}{}{}{}", lead, quote, merged.join(" "), quote),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Rewrite `className` attributes in JSX/TSX sources.
pub fn rewrite_jsx(
    content: &str,
    merge_map: &BTreeMap<String, String>,
    class_prefix: &str,
) -> String {
    jsx_attr_regex()
        .replace_all(content, |caps: &regex::Captures| {
            let lead = &caps[1];
            if let Some(m) = caps.get(2).or_else(|| caps.get(3)) {
                let quote = if caps.get(2).is_some() { '"' } else { '\'' };
                let tokens: Vec<String> =
                    m.as_str().split_whitespace().map(str::to_string).collect();
                return match try_merge_tokens(&tokens, merge_map, class_prefix) {
                    Some(merged) => format!("{}{}{}{}", lead, quote, merged.join(" "), quote),
                    None => caps[0].to_string(),
                };
            }
            if let Some(m) = caps.get(4) {
                let literal = m.as_str();
                // Dynamic literals are never rewritten
                if literal.contains("${") {
                    return caps[0].to_string();
                }
                let tokens: Vec<String> =
                    literal.split_whitespace().map(str::to_string).collect();
                return match try_merge_tokens(&tokens, merge_map, class_prefix) {
                    Some(merged) => format!("{}{{`{}`}}", lead, merged.join(" ")),
                    None => caps[0].to_string(),
                };
            }
            caps[0].to_string()
        })
        .into_owned()
}

/// Rewrite `class` attributes in component templates, carrying `{expr}`
/// interpolation spans through untouched.
pub fn rewrite_template(
    content: &str,
    merge_map: &BTreeMap<String, String>,
    class_prefix: &str,
) -> String {
    class_attr_regex()
        .replace_all(content, |caps: &regex::Captures| {
            let lead = &caps[1];
            let (value, quote) = match (caps.get(2), caps.get(3)) {
                (Some(m), _) => (m.as_str(), '"'),
                (_, Some(m)) => (m.as_str(), '\''),
                _ => return caps[0].to_string(),
            };
            match rewrite_template_value(value, merge_map, class_prefix) {
                Some(rewritten) => format!("{}{}{}{}", lead, quote, rewritten, quote),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// One piece of a template attribute value.
enum Segment {
    Token(String),
    Expr(String),
}

/// Split a template attribute value into tokens and interpolation spans.
///
/// Returns `None` when an interpolation is glued to a literal token
/// (`_flex-{kind}`): the runtime class name is dynamic there and rewriting
/// would corrupt it.
fn parse_template_value(value: &str) -> Option<Vec<Segment>> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut token = String::new();
    let mut iter = value.chars().peekable();

    while let Some(c) = iter.next() {
        match c {
            '{' => {
                if !token.is_empty() {
                    return None;
                }
                let mut expr = String::from('{');
                let mut closed = false;
                for e in iter.by_ref() {
                    expr.push(e);
                    if e == '}' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return None;
                }
                if let Some(next) = iter.peek() {
                    if !next.is_whitespace() {
                        return None;
                    }
                }
                segments.push(Segment::Expr(expr));
            }
            c if c.is_whitespace() => {
                if !token.is_empty() {
                    segments.push(Segment::Token(std::mem::take(&mut token)));
                }
            }
            _ => token.push(c),
        }
    }
    if !token.is_empty() {
        segments.push(Segment::Token(token));
    }

    Some(segments)
}

/// Apply the merge map to a template value; `None` when nothing changed.
fn rewrite_template_value(
    value: &str,
    merge_map: &BTreeMap<String, String>,
    class_prefix: &str,
) -> Option<String> {
    let segments = parse_template_value(value)?;

    let tokens: Vec<String> = segments
        .iter()
        .filter_map(|s| match s {
            Segment::Token(t) => Some(t.clone()),
            Segment::Expr(_) => None,
        })
        .collect();

    let merged = try_merge_tokens(&tokens, merge_map, class_prefix)?;

    // Names introduced by the merge (not present as original tokens)
    let mut original_counts: HashMap<&str, usize> = HashMap::new();
    for t in &tokens {
        *original_counts.entry(t.as_str()).or_insert(0) += 1;
    }
    let added: Vec<&str> = merged
        .iter()
        .filter(|m| !original_counts.contains_key(m.as_str()))
        .map(String::as_str)
        .collect();

    // How many copies of each original token survive the merge
    let mut survivors: HashMap<&str, usize> = HashMap::new();
    for m in &merged {
        if original_counts.contains_key(m.as_str()) {
            *survivors.entry(m.as_str()).or_insert(0) += 1;
        }
    }

    let mut parts: Vec<String> = added.iter().map(|s| s.to_string()).collect();
    for segment in &segments {
        match segment {
            Segment::Expr(expr) => parts.push(expr.clone()),
            Segment::Token(t) => {
                let remaining = survivors.entry(t.as_str()).or_insert(0);
                if *remaining > 0 {
                    *remaining -= 1;
                    parts.push(t.clone());
                }
            }
        }
    }

    Some(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_apply_full_group_replaced() {
        let merge_map = map(&[("_flex _gap", "_mab12")]);
        let result =
            apply_merge_to_classes(&strings(&["_gap", "_flex", "card"]), &merge_map, "_");
        assert_eq!(result, vec!["_mab12", "card"]);
    }

    #[test]
    fn test_apply_partial_group_untouched() {
        let merge_map = map(&[("_flex _gap _p4", "_mab12")]);
        let result = apply_merge_to_classes(&strings(&["_flex", "_gap"]), &merge_map, "_");
        assert_eq!(result, vec!["_flex", "_gap"]);
    }

    #[test]
    fn test_apply_longest_key_wins() {
        let merge_map = map(&[("_flex _gap", "_mshort"), ("_flex _gap _p4", "_mlong")]);
        let result =
            apply_merge_to_classes(&strings(&["_flex", "_gap", "_p4"]), &merge_map, "_");
        assert_eq!(result, vec!["_mlong"]);
    }

    #[test]
    fn test_apply_non_eligible_order_preserved() {
        let merge_map = map(&[("_flex _gap", "_mab12")]);
        let result = apply_merge_to_classes(
            &strings(&["zebra", "_gap", "alpha", "_flex"]),
            &merge_map,
            "_",
        );
        assert_eq!(result, vec!["_mab12", "zebra", "alpha"]);
    }

    #[test]
    fn test_apply_disjoint_keys_both_applied() {
        let merge_map = map(&[("_a _b", "_m1"), ("_c _d", "_m2")]);
        let result =
            apply_merge_to_classes(&strings(&["_d", "_b", "_a", "_c"]), &merge_map, "_");
        assert!(result.contains(&"_m1".to_string()));
        assert!(result.contains(&"_m2".to_string()));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_apply_idempotent() {
        let merge_map = map(&[("_flex _gap", "_mab12")]);
        let once = apply_merge_to_classes(
            &strings(&["_flex", "_gap", "_zz", "card"]),
            &merge_map,
            "_",
        );
        let twice = apply_merge_to_classes(&once, &merge_map, "_");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rewrite_markup() {
        let merge_map = map(&[("_flex _gap", "_mab12")]);
        let html = r#"<div class="card _gap _flex">x</div>"#;
        let out = rewrite_markup(html, &merge_map, "_");
        assert_eq!(out, r#"<div class="_mab12 card">x</div>"#);
    }

    #[test]
    fn test_rewrite_markup_no_match_untouched() {
        let merge_map = map(&[("_flex _gap _p4", "_mab12")]);
        let html = r#"<div class="card _gap  _flex">x</div>"#;
        let out = rewrite_markup(html, &merge_map, "_");
        assert_eq!(out, html);
    }

    #[test]
    fn test_rewrite_markup_idempotent() {
        let merge_map = map(&[("_flex _gap", "_mab12")]);
        let html = r#"<div class="_flex _gap">x</div>"#;
        let once = rewrite_markup(html, &merge_map, "_");
        let twice = rewrite_markup(&once, &merge_map, "_");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rewrite_jsx_string_form() {
        let merge_map = map(&[("_flex _gap", "_mab12")]);
        let jsx = r#"<div className="_flex _gap btn">x</div>"#;
        let out = rewrite_jsx(jsx, &merge_map, "_");
        assert_eq!(out, r#"<div className="_mab12 btn">x</div>"#);
    }

    #[test]
    fn test_rewrite_jsx_template_literal() {
        let merge_map = map(&[("_flex _gap", "_mab12")]);
        let jsx = "<div className={`_flex _gap`}>x</div>";
        let out = rewrite_jsx(jsx, &merge_map, "_");
        assert_eq!(out, "<div className={`_mab12`}>x</div>");
    }

    #[test]
    fn test_rewrite_jsx_dynamic_literal_untouched() {
        let merge_map = map(&[("_flex _gap", "_mab12")]);
        let jsx = "<div className={`_flex _gap ${extra}`}>x</div>";
        let out = rewrite_jsx(jsx, &merge_map, "_");
        assert_eq!(out, jsx);
    }

    #[test]
    fn test_rewrite_template_preserves_interpolation() {
        let merge_map = map(&[("_flex _gap", "_mab12")]);
        let src = r#"<div class="_flex {active ? '_on' : ''} _gap other">x</div>"#;
        let out = rewrite_template(src, &merge_map, "_");
        assert_eq!(
            out,
            r#"<div class="_mab12 {active ? '_on' : ''} other">x</div>"#
        );
    }

    #[test]
    fn test_rewrite_template_glued_interpolation_untouched() {
        let merge_map = map(&[("_flex _gap", "_mab12")]);
        let src = r#"<div class="_flex-{kind} _gap _flex">x</div>"#;
        let out = rewrite_template(src, &merge_map, "_");
        assert_eq!(out, src);
    }

    #[test]
    fn test_rewrite_source_dispatch() {
        let merge_map = map(&[("_flex _gap", "_mab12")]);
        let html = r#"<div class="_flex _gap">x</div>"#;
        let out = rewrite_source(html, Dialect::Markup, &merge_map, "_");
        assert!(out.contains("_mab12"));
    }
}
