//! `class` attribute extraction for plain markup (HTML, Vue templates).
//!
//! A single pre-compiled regex locates attribute value spans; everything
//! else (prefix filtering, sorting, the minimum-classes floor) is shared
//! with the other dialects. Unterminated or malformed attributes simply
//! fail to match.

use std::sync::OnceLock;

use regex::Regex;

use super::{usage_from_value, ClassUsage, ExtractOptions};

/// Matches `class="..."` or `class='...'`, capturing everything up to the
/// value in group 1 and the value itself in group 2 or 3.
///
/// The leading `(?:^|\s)` keeps `className=` (and `data-class=` style
/// attributes) from matching as plain `class`.
pub(crate) fn class_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"((?:^|\s)class\s*=\s*)(?:"([^"]*)"|'([^']*)')"#)
            .expect("hardcoded class attribute pattern is valid")
    })
}

/// Extract class usages from markup content.
pub fn extract_markup(content: &str, options: &ExtractOptions) -> Vec<ClassUsage> {
    class_attr_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            usage_from_value(value, options)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_double_quoted() {
        let html = r#"<div class="_flex _gap _p4">x</div>"#;
        let usages = extract_markup(html, &ExtractOptions::default());
        assert_eq!(usages.len(), 1);
        assert_eq!(usages[0].classes, vec!["_flex", "_gap", "_p4"]);
    }

    #[test]
    fn test_extract_single_quoted() {
        let html = "<div class='_gap _flex'>x</div>";
        let usages = extract_markup(html, &ExtractOptions::default());
        assert_eq!(usages.len(), 1);
        assert_eq!(usages[0].classes, vec!["_flex", "_gap"]);
    }

    #[test]
    fn test_extract_multiple_elements() {
        let html = r#"
            <div class="_flex _gap">a</div>
            <span class="_flex _p4">b</span>
            <p class="_only">c</p>
        "#;
        let usages = extract_markup(html, &ExtractOptions::default());
        assert_eq!(usages.len(), 2);
    }

    #[test]
    fn test_semantic_classes_filtered() {
        let html = r#"<div class="card _flex _gap shadow">x</div>"#;
        let usages = extract_markup(html, &ExtractOptions::default());
        assert_eq!(usages.len(), 1);
        assert_eq!(usages[0].classes, vec!["_flex", "_gap"]);
    }

    #[test]
    fn test_classname_attribute_not_matched() {
        let jsx = r#"<div className="_flex _gap">x</div>"#;
        let usages = extract_markup(jsx, &ExtractOptions::default());
        assert!(usages.is_empty());
    }

    #[test]
    fn test_unterminated_attribute_yields_nothing() {
        let html = r#"<div class="_flex _gap"#;
        let usages = extract_markup(html, &ExtractOptions::default());
        assert!(usages.is_empty());
    }

    #[test]
    fn test_spaced_equals_sign() {
        let html = r#"<div class = "_flex _gap">x</div>"#;
        let usages = extract_markup(html, &ExtractOptions::default());
        assert_eq!(usages.len(), 1);
    }

    #[test]
    fn test_custom_prefix() {
        let options = ExtractOptions {
            class_prefix: "u-".to_string(),
            ..Default::default()
        };
        let html = r#"<div class="u-flex u-gap _other">x</div>"#;
        let usages = extract_markup(html, &options);
        assert_eq!(usages.len(), 1);
        assert_eq!(usages[0].classes, vec!["u-flex", "u-gap"]);
    }
}
