//! CSS rule scanning, filtering, and generation.
//!
//! The scanner recognizes exactly three shapes: single-class rules
//! (`.name{decls}`), media blocks (`@media cond{...}`), and class+pseudo
//! rules (`.name:hover{decls}`). Anything else is carried through as-is;
//! full CSS parsing is a non-goal. Media blocks and pseudo rules are never
//! candidates for merging and always survive filtering verbatim.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Shape of a scanned rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CssRuleKind {
    /// `.name{decls}`: the only shape the optimizer may drop
    SingleClass,
    /// `.name:pseudo{decls}`: preserved verbatim
    PseudoClass,
    /// `@media cond{...}`: preserved verbatim
    Media,
    /// Anything else the scanner happened to match; preserved
    Other,
}

/// One scanned rule with its original text span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssRule {
    pub kind: CssRuleKind,
    /// Class name for `SingleClass` and `PseudoClass` rules
    pub class_name: Option<String>,
    /// The rule's full original text, braces included
    pub text: String,
}

/// Scan CSS text into rules by balancing braces.
///
/// Lossy by contract: text outside any recognizable `selector{...}` span is
/// dropped, and nested structure inside a block is not interpreted beyond
/// brace counting.
pub fn scan_rules(css: &str) -> Vec<CssRule> {
    let bytes = css.as_bytes();
    let mut rules = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        // Skip leading whitespace between rules
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        let Some(open_rel) = css[i..].find('{') else {
            break;
        };
        let open = i + open_rel;
        let selector = css[i..open].trim().to_string();

        // Find the matching close brace (media blocks nest one level)
        let mut depth = 1usize;
        let mut j = open + 1;
        while j < bytes.len() && depth > 0 {
            match bytes[j] {
                b'{' => depth += 1,
                b'}' => depth -= 1,
                _ => {}
            }
            j += 1;
        }
        // Unterminated block: drop the tail
        if depth > 0 {
            break;
        }

        let text = css[i..j].to_string();
        rules.push(classify(&selector, text));
        i = j;
    }

    rules
}

/// Classify a scanned selector into one of the recognized shapes.
fn classify(selector: &str, text: String) -> CssRule {
    if selector.starts_with("@media") {
        return CssRule {
            kind: CssRuleKind::Media,
            class_name: None,
            text,
        };
    }

    if let Some((name, pseudo)) = single_class_selector(selector) {
        return CssRule {
            kind: if pseudo {
                CssRuleKind::PseudoClass
            } else {
                CssRuleKind::SingleClass
            },
            class_name: Some(name.to_string()),
            text,
        };
    }

    CssRule {
        kind: CssRuleKind::Other,
        class_name: None,
        text,
    }
}

/// Match `.name` or `.name:pseudo` selectors; anything with combinators,
/// commas, or extra compound parts is not a candidate.
fn single_class_selector(selector: &str) -> Option<(&str, bool)> {
    let rest = selector.strip_prefix('.')?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let name = &rest[..end];
    let tail = &rest[end..];
    if tail.is_empty() {
        Some((name, false))
    } else if tail.starts_with(':') && !tail.contains([' ', ',', '.', '>', '+', '~']) {
        Some((name, true))
    } else {
        None
    }
}

/// Drop single-class rules whose class has been claimed by a merge; keep
/// everything else in original order.
pub fn filter_rules(css: &str, claimed: &HashSet<String>, pretty: bool) -> String {
    let kept: Vec<String> = scan_rules(css)
        .into_iter()
        .filter(|rule| match (&rule.kind, &rule.class_name) {
            (CssRuleKind::SingleClass, Some(name)) => !claimed.contains(name),
            _ => true,
        })
        .map(|rule| rule.text)
        .collect();

    if pretty {
        kept.join("\n")
    } else {
        kept.concat()
    }
}

/// Render a generated rule for a merged class.
pub fn format_rule(class_name: &str, declarations: &[String], pretty: bool) -> String {
    if pretty {
        let mut out = String::new();
        let _ = writeln!(out, ".{} {{", class_name);
        for decl in declarations {
            let _ = writeln!(out, "  {};", decl);
        }
        out.push('}');
        out
    } else {
        format!(".{}{{{}}}", class_name, declarations.join(";"))
    }
}
