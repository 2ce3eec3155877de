//! Property tests over the pure core: estimation, aggregation, parsing

use code_slim::analyzer::{estimated_saving, parse_analysis, MAX_ESTIMATED_SAVING};
use code_slim::model::{FileRecord, FileResult, MemorySnapshot, Severity, Suggestion};
use code_slim::pipeline::{Aggregator, TOP_CATEGORIES, TOP_FILES};
use code_slim::report::render_report;
use proptest::prelude::*;
use std::time::Duration;

fn arb_suggestion() -> impl Strategy<Value = Suggestion> {
    (
        "[A-Za-z /]{1,30}",
        "[A-Za-z0-9 ]{0,60}",
        prop_oneof![
            Just(Severity::High),
            Just(Severity::Medium),
            Just(Severity::Low)
        ],
    )
        .prop_map(|(category, description, severity)| Suggestion {
            category,
            description,
            location: None,
            severity,
            before: None,
            after: None,
        })
}

fn arb_result() -> impl Strategy<Value = FileResult> {
    (
        "[a-z]{1,12}",
        proptest::collection::vec(arb_suggestion(), 0..6),
        0.0f64..=100.0f64,
    )
        .prop_map(|(name, suggestions, improvement)| {
            let file = FileRecord::new(format!("{name}.cs"), "code");
            let mut result = FileResult::failed(&file, MemorySnapshot::zero(), String::new());
            result.success = true;
            result.error = None;
            result.suggestions = suggestions;
            result.improvement_pct = improvement;
            result
        })
}

proptest! {
    #[test]
    fn estimated_saving_never_exceeds_cap(suggestions in proptest::collection::vec(arb_suggestion(), 0..50)) {
        let saving = estimated_saving(&suggestions);
        prop_assert!(saving >= 0.0);
        prop_assert!(saving <= MAX_ESTIMATED_SAVING);
        if suggestions.is_empty() {
            prop_assert_eq!(saving, 0.0);
        }
    }

    #[test]
    fn summary_respects_truncation_limits(results in proptest::collection::vec(arb_result(), 0..30)) {
        let summary = Aggregator::summarize(&results, Duration::from_secs(1));
        prop_assert!(summary.top_categories.len() <= TOP_CATEGORIES);
        prop_assert!(summary.most_optimized.len() <= TOP_FILES);
        prop_assert_eq!(summary.total_files, results.len());
    }

    #[test]
    fn average_improvement_stays_in_range(results in proptest::collection::vec(arb_result(), 0..30)) {
        let summary = Aggregator::summarize(&results, Duration::from_secs(1));
        prop_assert!(summary.average_improvement_pct >= 0.0);
        prop_assert!(summary.average_improvement_pct <= 100.0);
        prop_assert!(summary.average_improvement_pct.is_finite());
    }

    #[test]
    fn summarize_is_deterministic(results in proptest::collection::vec(arb_result(), 0..20)) {
        let first = Aggregator::summarize(&results, Duration::from_secs(1));
        let second = Aggregator::summarize(&results, Duration::from_secs(1));
        prop_assert_eq!(first.top_categories, second.top_categories);
        prop_assert_eq!(
            first.most_optimized.len(),
            second.most_optimized.len()
        );
        prop_assert_eq!(first.average_improvement_pct, second.average_improvement_pct);
    }

    #[test]
    fn histogram_counts_every_suggestion(results in proptest::collection::vec(arb_result(), 0..10)) {
        let summary = Aggregator::summarize(&results, Duration::from_secs(1));
        let histogram_total: usize = summary.top_categories.iter().map(|(_, n)| n).sum();
        // With few distinct categories nothing is truncated, so the
        // histogram accounts for every suggestion
        if summary.top_categories.len() < TOP_CATEGORIES {
            prop_assert_eq!(histogram_total, summary.total_optimizations);
        } else {
            prop_assert!(histogram_total <= summary.total_optimizations);
        }
    }

    #[test]
    fn parser_never_panics_on_arbitrary_replies(reply in ".{0,400}") {
        let file = FileRecord::new("any.cs", "class Any {}");
        let (suggestions, optimized) = parse_analysis(&file, &reply);
        // Optimized content is never empty: worst case it is the annotated original
        prop_assert!(!optimized.is_empty());
        prop_assert!(suggestions.len() <= 400);
    }

    #[test]
    fn report_always_escapes_angle_brackets(description in "[<>&A-Za-z ]{1,60}") {
        let file = FileRecord::new("x.cs", "code");
        let mut result = FileResult::failed(&file, MemorySnapshot::zero(), String::new());
        result.success = true;
        result.error = None;
        result.suggestions = vec![Suggestion {
            category: "General".to_string(),
            description: description.clone(),
            location: None,
            severity: Severity::Medium,
            before: None,
            after: None,
        }];

        let mut batch = code_slim::model::BatchResult::new(".");
        batch.summary = Aggregator::summarize(std::slice::from_ref(&result), Duration::ZERO);
        batch.file_results = vec![result];

        let html = render_report(&batch);
        if description.contains('<') || description.contains('>') || description.contains('&') {
            let escaped = description
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;");
            prop_assert!(html.contains(&escaped));
        }
    }
}
