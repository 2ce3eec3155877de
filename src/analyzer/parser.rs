//! Tolerant parsing of analysis service replies
//!
//! Replies are supposed to be JSON with a suggestion list and optimized
//! code, but the service sometimes answers in prose, wraps the JSON in
//! markdown, or omits fields. Parsing therefore goes through an explicit
//! schema with every field optional, and degrades to keyword extraction
//! rather than failing: a non-empty reply always yields at least one
//! suggestion and never aborts the file.

use crate::model::{FileRecord, Severity, Suggestion};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// Maximum excerpt length carried into the fallback annotation
const EXCERPT_LEN: usize = 200;

/// Raw reply schema. Every field is optional; missing fields default
/// instead of failing the parse.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    #[serde(default)]
    suggestions: Option<Vec<RawSuggestion>>,
    #[serde(default)]
    optimized_code: Option<String>,
    #[serde(default)]
    #[allow(dead_code)] // accepted but unused; kept so strict replies parse
    optimization_summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    #[serde(rename = "type", default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    line_number: Option<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    before: Option<String>,
    #[serde(default)]
    after: Option<String>,
}

/// Parse a raw service reply into suggestions and optimized content.
///
/// Resolution order for the optimized content: the schema's
/// `optimizedCode`, else the first fenced code block in the reply, else
/// the original content prefixed with an annotation carrying a truncated
/// excerpt of the raw reply.
pub fn parse_analysis(file: &FileRecord, reply: &str) -> (Vec<Suggestion>, String) {
    let structured = extract_json_span(reply)
        .and_then(|span| serde_json::from_str::<RawAnalysis>(span).ok());

    match structured {
        Some(raw) => {
            let suggestions = raw
                .suggestions
                .unwrap_or_default()
                .into_iter()
                .map(normalize_suggestion)
                .collect::<Vec<_>>();

            let optimized = raw
                .optimized_code
                .filter(|code| !code.trim().is_empty())
                .or_else(|| fenced_code_block(reply))
                .unwrap_or_else(|| annotated_fallback(file, reply));

            // An explicitly empty suggestion list from a structured reply
            // means "no optimizations needed" and stays empty.
            (suggestions, optimized)
        }
        None => {
            log::debug!(
                "unstructured reply for {}; falling back to keyword extraction",
                file.path.display()
            );
            let suggestions = heuristic_suggestions(reply);
            let optimized =
                fenced_code_block(reply).unwrap_or_else(|| annotated_fallback(file, reply));
            (suggestions, optimized)
        }
    }
}

/// Slice the reply between its first `{` and last `}`, the span a JSON
/// payload occupies when wrapped in prose or markdown
fn extract_json_span(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}

fn normalize_suggestion(raw: RawSuggestion) -> Suggestion {
    Suggestion {
        category: raw.category.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        location: raw.line_number.filter(|l| !l.is_empty()),
        severity: Severity::normalize(raw.severity.as_deref()),
        before: raw.before.filter(|s| !s.is_empty()),
        after: raw.after.filter(|s| !s.is_empty()),
    }
}

/// Extract the body of the first fenced code block, if any
fn fenced_code_block(reply: &str) -> Option<String> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let re = FENCE.get_or_init(|| {
        Regex::new(r"(?s)```[a-zA-Z#+]*\n(.*?)```").expect("fence regex is valid")
    });
    re.captures(reply)
        .map(|caps| caps[1].trim_end().to_string())
        .filter(|body| !body.trim().is_empty())
}

/// Original content annotated with a truncated excerpt of the raw reply.
///
/// Used when the reply carried no optimized code in any recognizable form;
/// the annotation makes the fallback visible instead of silently passing
/// the original off as optimized.
fn annotated_fallback(file: &FileRecord, reply: &str) -> String {
    let excerpt: String = reply
        .chars()
        .take(EXCERPT_LEN)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    format!(
        "// code-slim: analysis reply had no usable optimized code; original preserved.\n// Reply excerpt: {}\n{}",
        excerpt.trim(),
        file.content
    )
}

/// Keyword rule: pattern, category label, severity
struct KeywordRule {
    pattern: &'static str,
    category: &'static str,
    severity: Severity,
}

const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        pattern: r"(?i)stringbuilder|string concat",
        category: "String Concatenation",
        severity: Severity::Medium,
    },
    KeywordRule {
        pattern: r"(?i)dispos|using statement|resource leak",
        category: "Resource Disposal",
        severity: Severity::High,
    },
    KeywordRule {
        pattern: r"(?i)boxing|unboxing",
        category: "Boxing",
        severity: Severity::Medium,
    },
    KeywordRule {
        pattern: r"(?i)\blinq\b|enumerat",
        category: "LINQ/Enumeration",
        severity: Severity::Low,
    },
    KeywordRule {
        pattern: r"(?i)collection|capacity|list<|dictionary",
        category: "Collection Usage",
        severity: Severity::Medium,
    },
];

/// Extract suggestions from an unstructured reply by keyword matching.
///
/// Each matched rule yields one fixed-category suggestion; a non-empty
/// reply that matches nothing still yields a single generic suggestion so
/// the caller never sees an empty list for a non-empty reply.
fn heuristic_suggestions(reply: &str) -> Vec<Suggestion> {
    if reply.trim().is_empty() {
        return Vec::new();
    }

    static COMPILED: OnceLock<Vec<(Regex, &'static KeywordRule)>> = OnceLock::new();
    let rules = COMPILED.get_or_init(|| {
        KEYWORD_RULES
            .iter()
            .map(|rule| {
                (
                    Regex::new(rule.pattern).expect("keyword pattern is valid"),
                    rule,
                )
            })
            .collect()
    });

    let mut suggestions: Vec<Suggestion> = rules
        .iter()
        .filter(|(re, _)| re.is_match(reply))
        .map(|(_, rule)| Suggestion {
            category: rule.category.to_string(),
            description: format!(
                "Heuristically extracted from an unstructured analysis reply ({} keyword matched).",
                rule.category
            ),
            location: None,
            severity: rule.severity,
            before: None,
            after: None,
        })
        .collect();

    if suggestions.is_empty() {
        suggestions.push(Suggestion {
            category: "General".to_string(),
            description: format!(
                "Unstructured analysis reply; excerpt: {}",
                reply.chars().take(EXCERPT_LEN).collect::<String>().trim()
            ),
            location: None,
            severity: Severity::Medium,
            before: None,
            after: None,
        });
    }

    suggestions
}
