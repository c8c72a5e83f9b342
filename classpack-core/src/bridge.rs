//! Bridge for externally-produced co-occurrence reports.
//!
//! A separate static analyzer (running over a different source language)
//! can hand this core its findings as a JSON report. Only groupings the
//! analyzer proved static are converted into usages; dynamic groupings
//! cannot be safely merged at build time. Analyzer warnings are surfaced
//! verbatim and never block optimization of the statically-safe subset.
//!
//! Report entries carry raw declaration strings. Each one is hashed into a
//! prefixed class name through the standard hashing component, so naming
//! stays consistent with the rest of the pipeline; strings already carrying
//! the class prefix are passed through as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ClasspackError, ClasspackResult};
use crate::extract::ClassUsage;
use crate::hash::hash_class_name;

/// A complete report from an external static analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerReport {
    /// Discovered class groupings
    #[serde(default)]
    pub cooccurrences: Vec<ReportedCoOccurrence>,
    /// Informational warnings about groupings the analyzer could not trace
    #[serde(default)]
    pub warnings: Vec<AnalyzerWarning>,
}

/// One grouping the analyzer found on a single element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportedCoOccurrence {
    /// Declaration strings (or pre-hashed class names) on the element
    pub classes: Vec<String>,
    /// Source file the grouping was found in
    #[serde(default)]
    pub file: String,
    /// 1-indexed line number
    #[serde(default)]
    pub line: usize,
    /// Whether the analyzer proved the grouping static
    #[serde(rename = "isStatic")]
    pub is_static: bool,
}

/// One analyzer warning, surfaced to the caller verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerWarning {
    pub kind: WarningKind,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub message: String,
}

/// Why the analyzer could not trace a grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    DynamicConditional,
    DynamicFunctionCall,
    UntraceableVariable,
    DynamicArrayConstruction,
    /// Forward compatibility with analyzer kinds this core predates
    #[serde(other)]
    Unknown,
}

/// Usages and naming derived from an external report.
#[derive(Debug, Clone, Default)]
pub struct BridgedUsages {
    /// Usages converted from the report's static groupings
    pub usages: Vec<ClassUsage>,
    /// Declaration-table fragments for hashed declaration strings
    pub declarations: BTreeMap<String, String>,
    /// The report's warnings, untouched
    pub warnings: Vec<AnalyzerWarning>,
}

/// Parse a report from JSON text.
pub fn parse_report(json: &str) -> ClasspackResult<AnalyzerReport> {
    serde_json::from_str(json)
        .map_err(|e| ClasspackError::report(format!("malformed analyzer report: {}", e)))
}

/// Convert a report's static groupings into canonical usages.
///
/// Entries that resolve to fewer than two distinct classes are dropped:
/// the usage invariant (two or more classes) holds here exactly as it does
/// for text extraction.
pub fn usages_from_report(report: &AnalyzerReport, class_prefix: &str) -> BridgedUsages {
    let mut bridged = BridgedUsages {
        warnings: report.warnings.clone(),
        ..Default::default()
    };

    for entry in &report.cooccurrences {
        if !entry.is_static {
            continue;
        }

        let mut classes: Vec<String> = entry
            .classes
            .iter()
            .map(|raw| {
                if raw.starts_with(class_prefix) {
                    raw.clone()
                } else {
                    let name = hash_class_name(raw, class_prefix);
                    bridged.declarations.insert(name.clone(), raw.clone());
                    name
                }
            })
            .collect();
        classes.sort_unstable();
        classes.dedup();

        if classes.len() < 2 {
            continue;
        }

        bridged.usages.push(ClassUsage {
            classes,
            source: format!("{}:{}", entry.file, entry.line),
        });
    }

    bridged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(classes: &[&str], is_static: bool) -> ReportedCoOccurrence {
        ReportedCoOccurrence {
            classes: classes.iter().map(|s| s.to_string()).collect(),
            file: "App.kt".to_string(),
            line: 42,
            is_static,
        }
    }

    #[test]
    fn test_parse_report() {
        let json = r#"{
            "cooccurrences": [
                { "classes": ["display:flex", "gap:1rem"], "file": "a.kt", "line": 3, "isStatic": true }
            ],
            "warnings": [
                { "kind": "dynamic_conditional", "file": "a.kt", "line": 9, "message": "branch-dependent classes" }
            ]
        }"#;
        let report = parse_report(json).unwrap();
        assert_eq!(report.cooccurrences.len(), 1);
        assert_eq!(report.warnings[0].kind, WarningKind::DynamicConditional);
    }

    #[test]
    fn test_parse_report_unknown_warning_kind() {
        let json = r#"{ "warnings": [ { "kind": "some_future_kind" } ] }"#;
        let report = parse_report(json).unwrap();
        assert_eq!(report.warnings[0].kind, WarningKind::Unknown);
    }

    #[test]
    fn test_parse_report_malformed() {
        let err = parse_report("{ not json").unwrap_err();
        assert!(matches!(err, ClasspackError::Report { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_static_entries_become_usages() {
        let report = AnalyzerReport {
            cooccurrences: vec![
                entry(&["display:flex", "gap:1rem"], true),
                entry(&["display:flex", "padding:1rem"], false),
            ],
            warnings: Vec::new(),
        };
        let bridged = usages_from_report(&report, "_");

        // Only the static grouping converts
        assert_eq!(bridged.usages.len(), 1);
        assert_eq!(bridged.usages[0].classes.len(), 2);
        assert_eq!(bridged.usages[0].source, "App.kt:42");
        assert!(bridged.usages[0].classes.iter().all(|c| c.starts_with('_')));
    }

    #[test]
    fn test_declarations_hashed_consistently() {
        let report = AnalyzerReport {
            cooccurrences: vec![entry(&["display:flex", "gap:1rem"], true)],
            warnings: Vec::new(),
        };
        let bridged = usages_from_report(&report, "_");

        let expected = hash_class_name("display:flex", "_");
        assert!(bridged.usages[0].classes.contains(&expected));
        assert_eq!(bridged.declarations[&expected], "display:flex");
    }

    #[test]
    fn test_prefixed_names_passed_through() {
        let report = AnalyzerReport {
            cooccurrences: vec![entry(&["_flex", "_gap"], true)],
            warnings: Vec::new(),
        };
        let bridged = usages_from_report(&report, "_");

        assert_eq!(bridged.usages[0].classes, vec!["_flex", "_gap"]);
        assert!(bridged.declarations.is_empty());
    }

    #[test]
    fn test_single_class_entry_dropped() {
        let report = AnalyzerReport {
            cooccurrences: vec![entry(&["display:flex", "display:flex"], true)],
            warnings: Vec::new(),
        };
        let bridged = usages_from_report(&report, "_");
        assert!(bridged.usages.is_empty());
    }

    #[test]
    fn test_warnings_surfaced_verbatim() {
        let report = AnalyzerReport {
            cooccurrences: Vec::new(),
            warnings: vec![AnalyzerWarning {
                kind: WarningKind::UntraceableVariable,
                file: "b.kt".to_string(),
                line: 7,
                message: "variable escapes analysis".to_string(),
            }],
        };
        let bridged = usages_from_report(&report, "_");
        assert_eq!(bridged.warnings.len(), 1);
        assert_eq!(bridged.warnings[0].kind, WarningKind::UntraceableVariable);
    }
}
