//! HTML report rendering
//!
//! [`render_report`] is a pure function over a [`BatchResult`]; callers
//! decide where the document goes. Every interpolated field is escaped,
//! including service-supplied suggestion text.

use crate::fmt::format_datetime;
use crate::model::{BatchResult, FileResult, Suggestion};
use std::fmt::Write as _;
use std::time::SystemTime;

/// Render the batch result as a standalone HTML document
pub fn render_report(batch: &BatchResult) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n    <title>Memory Optimization Report</title>\n    <style>\n",
    );
    html.push_str(
        "        body { font-family: Arial, sans-serif; margin: 20px; }\n\
         \x20       .header { background-color: #f0f0f0; padding: 20px; border-radius: 5px; }\n\
         \x20       .summary { background-color: #e8f4f8; padding: 15px; margin: 20px 0; border-radius: 5px; }\n\
         \x20       .file-result { border: 1px solid #ccc; margin: 10px 0; padding: 15px; border-radius: 5px; }\n\
         \x20       .optimization { background-color: #fff3cd; padding: 10px; margin: 5px 0; border-radius: 3px; }\n\
         \x20       .high { border-left: 4px solid #dc3545; }\n\
         \x20       .medium { border-left: 4px solid #ffc107; }\n\
         \x20       .low { border-left: 4px solid #28a745; }\n\
         \x20       code { background-color: #f8f9fa; padding: 2px 4px; border-radius: 3px; font-family: 'Courier New', monospace; }\n",
    );
    html.push_str("    </style>\n</head>\n<body>\n");

    render_header(&mut html, batch);
    render_summary(&mut html, batch);
    render_categories(&mut html, batch);
    render_files(&mut html, batch);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_header(html: &mut String, batch: &BatchResult) {
    let generated = format_datetime(batch.finished_at.unwrap_or_else(SystemTime::now));
    let _ = write!(
        html,
        "    <div class=\"header\">\n\
         \x20       <h1>Memory Optimization Report</h1>\n\
         \x20       <p>Generated on: {}</p>\n\
         \x20       <p>Analyzed: {}</p>\n",
        escape_html(&generated),
        escape_html(&batch.root.display().to_string())
    );
    if let Some(error) = &batch.error {
        let _ = write!(
            html,
            "        <p><strong>Run error:</strong> {}</p>\n",
            escape_html(error)
        );
    }
    html.push_str("    </div>\n");
}

fn render_summary(html: &mut String, batch: &BatchResult) {
    let summary = &batch.summary;
    let _ = write!(
        html,
        "    <div class=\"summary\">\n\
         \x20       <h2>Summary</h2>\n\
         \x20       <p><strong>Total Files Analyzed:</strong> {}</p>\n\
         \x20       <p><strong>Files with Optimizations:</strong> {}</p>\n\
         \x20       <p><strong>Total Optimizations:</strong> {}</p>\n\
         \x20       <p><strong>Average Memory Improvement:</strong> {:.2}%</p>\n\
         \x20       <p><strong>Analysis Duration:</strong> {:.2} minutes</p>\n\
         \x20   </div>\n",
        summary.total_files,
        summary.files_with_optimizations,
        summary.total_optimizations,
        summary.average_improvement_pct,
        summary.elapsed.as_secs_f64() / 60.0
    );
}

fn render_categories(html: &mut String, batch: &BatchResult) {
    html.push_str("    <h2>Top Optimization Types</h2>\n    <ul>\n");
    for (category, count) in &batch.summary.top_categories {
        let _ = write!(
            html,
            "        <li>{}: {} occurrences</li>\n",
            escape_html(category),
            count
        );
    }
    html.push_str("    </ul>\n");
}

fn render_files(html: &mut String, batch: &BatchResult) {
    html.push_str("    <h2>File Results</h2>\n");
    for result in batch.file_results.iter().filter(|r| r.has_optimizations()) {
        render_file(html, result);
    }
}

fn render_file(html: &mut String, result: &FileResult) {
    let _ = write!(
        html,
        "    <div class=\"file-result\">\n\
         \x20       <h3>{}</h3>\n\
         \x20       <p><strong>Optimizations:</strong> {}</p>\n\
         \x20       <p><strong>Memory Improvement:</strong> {:.2}%</p>\n",
        escape_html(&result.file_name()),
        result.optimization_count(),
        result.improvement_pct
    );
    for suggestion in &result.suggestions {
        render_suggestion(html, suggestion);
    }
    html.push_str("    </div>\n");
}

fn render_suggestion(html: &mut String, suggestion: &Suggestion) {
    let _ = write!(
        html,
        "        <div class=\"optimization {}\">\n\
         \x20           <strong>[{}] {}</strong><br>\n\
         \x20           {}<br>\n",
        suggestion.severity.as_str(),
        escape_html(&suggestion.severity.to_string()),
        escape_html(&suggestion.category),
        escape_html(&suggestion.description)
    );
    if let Some(location) = suggestion.location.as_deref().filter(|l| !l.is_empty()) {
        let _ = write!(
            html,
            "            <strong>Location:</strong> {}<br>\n",
            escape_html(location)
        );
    }
    if let Some(before) = suggestion.before.as_deref().filter(|b| !b.is_empty()) {
        let _ = write!(
            html,
            "            <strong>Before:</strong> <code>{}</code><br>\n",
            escape_html(before)
        );
    }
    if let Some(after) = suggestion.after.as_deref().filter(|a| !a.is_empty()) {
        let _ = write!(
            html,
            "            <strong>After:</strong> <code>{}</code>\n",
            escape_html(after)
        );
    }
    html.push_str("        </div>\n");
}

/// Escape `&`, `<` and `>` for safe interpolation into HTML text
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileRecord, MemorySnapshot, Severity};

    fn batch_with(results: Vec<FileResult>) -> BatchResult {
        let mut batch = BatchResult::new("/work/project");
        batch.finished_at = Some(SystemTime::UNIX_EPOCH);
        batch.summary = crate::pipeline::Aggregator::summarize(
            &results,
            std::time::Duration::from_secs(90),
        );
        batch.file_results = results;
        batch
    }

    fn result_with_suggestion(description: &str, severity: Severity) -> FileResult {
        let file = FileRecord::new("/work/project/program.cs", "code");
        let mut r = FileResult::failed(&file, MemorySnapshot::zero(), String::new());
        r.success = true;
        r.error = None;
        r.improvement_pct = 12.5;
        r.suggestions = vec![Suggestion {
            category: "String Concatenation".to_string(),
            description: description.to_string(),
            location: Some("line 10".to_string()),
            severity,
            before: Some("a + b".to_string()),
            after: Some("builder.push_str".to_string()),
        }];
        r
    }

    #[test]
    fn test_report_contains_summary_numbers() {
        let batch = batch_with(vec![result_with_suggestion("concat in loop", Severity::High)]);
        let html = render_report(&batch);
        assert!(html.contains("<title>Memory Optimization Report</title>"));
        assert!(html.contains("<strong>Total Files Analyzed:</strong> 1"));
        assert!(html.contains("<strong>Files with Optimizations:</strong> 1"));
        assert!(html.contains("12.50%"));
        assert!(html.contains("1.50 minutes"));
    }

    #[test]
    fn test_severity_css_classes() {
        for (severity, class) in [
            (Severity::High, "optimization high"),
            (Severity::Medium, "optimization medium"),
            (Severity::Low, "optimization low"),
        ] {
            let batch = batch_with(vec![result_with_suggestion("d", severity)]);
            assert!(render_report(&batch).contains(class));
        }
    }

    #[test]
    fn test_untrusted_text_is_escaped() {
        let batch = batch_with(vec![result_with_suggestion(
            "<script>alert('x')</script> & more",
            Severity::Medium,
        )]);
        let html = render_report(&batch);
        assert!(html.contains("&lt;script&gt;alert('x')&lt;/script&gt; &amp; more"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn test_files_without_optimizations_are_omitted() {
        let file = FileRecord::new("clean.cs", "x");
        let mut clean = FileResult::failed(&file, MemorySnapshot::zero(), String::new());
        clean.success = true;
        clean.error = None;
        let batch = batch_with(vec![clean]);
        let html = render_report(&batch);
        assert!(!html.contains("clean.cs"));
    }

    #[test]
    fn test_batch_error_is_surfaced_in_header() {
        let mut batch = batch_with(vec![]);
        batch.error = Some("root not found: /nope".to_string());
        let html = render_report(&batch);
        assert!(html.contains("<strong>Run error:</strong> root not found: /nope"));
    }

    #[test]
    fn test_category_list_renders_counts() {
        let batch = batch_with(vec![
            result_with_suggestion("a", Severity::Medium),
            result_with_suggestion("b", Severity::Low),
        ]);
        let html = render_report(&batch);
        assert!(html.contains("<li>String Concatenation: 2 occurrences</li>"));
    }

    #[test]
    fn test_escape_html_passthrough_for_plain_text() {
        assert_eq!(escape_html("plain text 123"), "plain text 123");
        assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
    }
}
