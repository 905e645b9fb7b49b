// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for a11ylint

use a11ylint::report::{generate_report, OutputFormat};
use a11ylint::rules::id;
use a11ylint::{analyze_file, scanner, AnalysisOptions, Severity};
use std::path::Path;

#[test]
fn test_scan_accessible_fixture() {
    let result = scanner::scan_file(
        Path::new("tests/fixtures/accessible.html"),
        &AnalysisOptions::new(),
    )
    .expect("scan should succeed");

    assert!(
        result.findings.is_empty(),
        "Accessible fixture should be clean, got: {:?}",
        result.findings.iter().map(|f| &f.diagnostic.rule_id).collect::<Vec<_>>()
    );
}

#[test]
fn test_scan_inaccessible_fixture() {
    let result = scanner::scan_file(
        Path::new("tests/fixtures/inaccessible.html"),
        &AnalysisOptions::new(),
    )
    .expect("scan should succeed");

    assert!(
        result.findings.len() >= 10,
        "Inaccessible fixture should have many findings, got {}",
        result.findings.len()
    );
    assert!(result.has_errors());

    let rule_ids: Vec<&str> =
        result.findings.iter().map(|f| f.diagnostic.rule_id.as_str()).collect();
    for expected in [
        id::LANG_MISSING,
        id::SKIP_LINK_MISSING,
        id::FORM_LABEL_MISSING,
        id::FORM_RADIO_NO_FIELDSET,
        id::HEADING_SKIP,
        id::HEADING_MULTIPLE_H1,
        id::HEADING_EMPTY,
        id::ARIA_ROLE_INVALID,
        id::ARIA_ROLE_REDUNDANT,
        id::ARIA_HIDDEN_INTERACTIVE,
        id::ARIA_ATTR_INVALID,
        id::ARIA_LABEL_ICON_ONLY,
        id::LINK_TEXT_GENERIC,
        id::LINK_TEXT_URL,
        id::LIVE_REGION_INVALID_VALUE,
        id::LIST_INVALID_CHILD,
        id::TABLE_HEADERS_MISSING,
        id::TABLE_CAPTION_MISSING,
        id::FORM_PLACEHOLDER_ONLY,
    ] {
        assert!(rule_ids.contains(&expected), "missing expected finding {}", expected);
    }
}

#[test]
fn test_scan_partial_fixture() {
    let result = scanner::scan_file(
        Path::new("tests/fixtures/partial.html"),
        &AnalysisOptions::new(),
    )
    .expect("scan should succeed");

    // A template partial carries no page-level obligations
    assert!(
        result.findings.is_empty(),
        "Partial fixture should be clean, got: {:?}",
        result.findings.iter().map(|f| &f.diagnostic.rule_id).collect::<Vec<_>>()
    );
}

#[test]
fn test_scan_fixtures_directory() {
    let results = scanner::scan_directory(
        Path::new("tests/fixtures"),
        &AnalysisOptions::new(),
    )
    .expect("scan should succeed");

    assert_eq!(results.len(), 3, "all three fixtures should be scanned");
    let total: usize = results.iter().map(|r| r.findings.len()).sum();
    assert!(total >= 10);
}

#[test]
fn test_json_report_valid() {
    let result = scanner::scan_file(
        Path::new("tests/fixtures/inaccessible.html"),
        &AnalysisOptions::new(),
    )
    .expect("scan should succeed");

    let report = generate_report(std::slice::from_ref(&result), OutputFormat::Json);
    let parsed: serde_json::Value =
        serde_json::from_str(&report).expect("JSON report should be valid JSON");

    assert!(parsed["files"].is_array());
    assert!(!parsed["files"][0]["findings"].as_array().unwrap().is_empty());
}

#[test]
fn test_sarif_report_valid() {
    let result = scanner::scan_file(
        Path::new("tests/fixtures/inaccessible.html"),
        &AnalysisOptions::new(),
    )
    .expect("scan should succeed");

    let report = generate_report(std::slice::from_ref(&result), OutputFormat::Sarif);
    let parsed: serde_json::Value =
        serde_json::from_str(&report).expect("SARIF report should be valid JSON");

    assert_eq!(parsed["version"], "2.1.0");
    assert_eq!(parsed["runs"][0]["tool"]["driver"]["name"], "a11ylint");
    assert!(parsed["runs"][0]["results"].is_array());
}

#[test]
fn test_text_report_format() {
    let result = scanner::scan_file(
        Path::new("tests/fixtures/inaccessible.html"),
        &AnalysisOptions::new(),
    )
    .expect("scan should succeed");

    let report = generate_report(std::slice::from_ref(&result), OutputFormat::Text);
    assert!(report.contains("a11ylint report"));
    assert!(report.contains("RESULT: FAIL"));
}

// Pinned behaviors: each test fixes the exact observable output for one
// well-known input, so rule changes that alter it are caught here.

#[test]
fn test_scenario_unlabeled_input() {
    let html = r#"<html><body><input type="text" id="a"></body></html>"#;
    let diags = analyze_file(html, &AnalysisOptions::new());

    assert_eq!(diags.len(), 1, "got: {:?}", diags);
    assert_eq!(diags[0].rule_id, id::FORM_LABEL_MISSING);
    assert_eq!(diags[0].severity, Severity::Error);

    let input_start = html.find("<input").unwrap();
    assert_eq!(diags[0].span.start, input_start);
    assert_eq!(&html[diags[0].span.start..diags[0].span.end], r#"<input type="text" id="a">"#);
}

#[test]
fn test_scenario_headerless_table() {
    let rows: String = (0..8).map(|i| format!("<tr><td>{}</td></tr>", i)).collect();
    let html = format!("<table>{}</table>", rows);
    let diags = analyze_file(&html, &AnalysisOptions::new());

    assert!(diags.iter().any(|d| d.rule_id == id::TABLE_HEADERS_MISSING));
    assert!(diags.iter().any(|d| d.rule_id == id::TABLE_CAPTION_MISSING));
}

#[test]
fn test_scenario_click_here() {
    let html = r#"<a href="/x">click here</a>"#;
    let diags = analyze_file(html, &AnalysisOptions::new());
    assert_eq!(diags.len(), 1, "got: {:?}", diags);
    assert_eq!(diags[0].rule_id, id::LINK_TEXT_GENERIC);
}

#[test]
fn test_scenario_read_more_with_topic() {
    let html = r#"<h2>Quarterly Report</h2><a href="/report">read more</a>"#;
    let diags = analyze_file(html, &AnalysisOptions::new());
    assert!(diags.is_empty(), "got: {:?}", diags);
}

#[test]
fn test_scenario_presentation_on_heading() {
    let html = r#"<div role="presentation"><h1>Title</h1></div>"#;
    let diags = analyze_file(html, &AnalysisOptions::new());
    assert_eq!(diags.len(), 1, "got: {:?}", diags);
    assert_eq!(diags[0].rule_id, id::ARIA_ROLE_PRESENTATION_SEMANTIC);
    assert!(diags[0].message.contains("<h1>"));
}

#[test]
fn test_scenario_assertive_for_success_message() {
    let html = r#"<html lang="en"><body><div aria-live="assertive">Saved successfully</div></body></html>"#;
    let diags = analyze_file(html, &AnalysisOptions::new());
    assert_eq!(diags.len(), 1, "got: {:?}", diags);
    assert_eq!(diags[0].rule_id, id::LIVE_REGION_ASSERTIVE_OVERUSE);
}

#[test]
fn test_label_anywhere_in_document() {
    for html in [
        r#"<label for="x">Name</label><p>filler</p><input type="text" id="x">"#,
        r#"<input type="text" id="x"><p>filler</p><label for="x">Name</label>"#,
    ] {
        let diags = analyze_file(html, &AnalysisOptions::new());
        assert!(
            !diags.iter().any(|d| d.rule_id == id::FORM_LABEL_MISSING),
            "labelled control flagged in {:?}",
            html
        );
    }
}

#[test]
fn test_analysis_idempotent() {
    let html = std::fs::read_to_string("tests/fixtures/inaccessible.html").expect("fixture");
    let opts = AnalysisOptions::new();
    let first = analyze_file(&html, &opts);
    let second = analyze_file(&html, &opts);
    assert_eq!(first, second);
}

#[test]
fn test_spans_always_in_bounds() {
    let html = std::fs::read_to_string("tests/fixtures/inaccessible.html").expect("fixture");
    for diag in analyze_file(&html, &AnalysisOptions::new()) {
        assert!(diag.span.start <= diag.span.end);
        assert!(diag.span.end <= html.len());
    }
}
