// SPDX-License-Identifier: PMPL-1.0-or-later
//! Live region analyzer.
//!
//! Validates `aria-live` and its companion attributes, flags redundant
//! role/live combinations, status-styled elements with no live-region
//! marker, priority misuse (assertive for calm content, polite for form
//! errors), and competing assertive regions.

use crate::analyzers::Analyzer;
use crate::context::DocumentContext;
use crate::diagnostic::{Diagnostic, Fix, Severity};
use crate::rules::{id, AnalysisOptions};
use crate::text::{self, Tag};

/// Live region analyzer
pub struct LiveRegionAnalyzer;

const VALID_LIVE_VALUES: &[&str] = &["polite", "assertive", "off"];
const VALID_BOOL_VALUES: &[&str] = &["true", "false"];
const VALID_RELEVANT_TOKENS: &[&str] = &["additions", "removals", "text", "all"];

/// Context window scanned around a region for urgency keywords
const CONTEXT_WINDOW: usize = 200;

/// Two assertive regions closer than this compete
const COMPETING_DISTANCE: usize = 500;

/// Keywords that justify an assertive announcement
const URGENT_KEYWORDS: &[&str] =
    &["alert", "critical", "danger", "error", "fail", "invalid", "required", "urgent"];

/// Class keywords suggesting a status element, with the severity a missing
/// live-region marker earns
const STATUS_CLASS_KEYWORDS: &[(&str, Severity)] = &[
    ("alert", Severity::Error),
    ("error", Severity::Error),
    ("danger", Severity::Error),
    ("critical", Severity::Error),
    ("warning", Severity::Warning),
    ("notification", Severity::Warning),
    ("message", Severity::Warning),
    ("status", Severity::Warning),
    ("success", Severity::Warning),
    ("info", Severity::Warning),
];

/// Keywords marking a form-validation context
const VALIDATION_KEYWORDS: &[&str] = &["error", "invalid", "validation", "validate"];

impl Analyzer for LiveRegionAnalyzer {
    fn name(&self) -> &str {
        "Live Region"
    }

    fn description(&self) -> &str {
        "Validates aria-live usage, announcement priority, and competition"
    }

    fn rule_ids(&self) -> &[&str] {
        &[
            id::LIVE_REGION_INVALID_VALUE,
            id::LIVE_REGION_REDUNDANT_ROLE,
            id::LIVE_REGION_MISSING,
            id::LIVE_REGION_ASSERTIVE_OVERUSE,
            id::LIVE_REGION_POLITE_IN_ERRORS,
            id::LIVE_REGION_COMPETING,
        ]
    }

    fn analyze(&self, text: &str, _ctx: &DocumentContext, _opts: &AnalysisOptions) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut assertive_offsets = Vec::new();

        for tag in text::tags(text) {
            if tag.is_closing() {
                continue;
            }
            let Some(name) = tag.name() else { continue };

            check_values(&tag, &mut diagnostics);
            check_redundant_role(&tag, &mut diagnostics);
            check_status_styled(&tag, &name, &mut diagnostics);
            check_priority(text, &tag, &mut diagnostics);

            let role = tag.attr("role").unwrap_or_default().to_lowercase();
            if tag.attr("aria-live").as_deref() == Some("assertive") || role == "alert" {
                assertive_offsets.push(tag.start);
            }
        }

        check_competition(text, &assertive_offsets, &mut diagnostics);
        diagnostics
    }
}

fn check_values(tag: &Tag<'_>, out: &mut Vec<Diagnostic>) {
    if let Some(live) = tag.attr("aria-live") {
        let value = live.trim().to_lowercase();
        if !VALID_LIVE_VALUES.contains(&value.as_str()) {
            out.push(Diagnostic::new(
                id::LIVE_REGION_INVALID_VALUE,
                tag.span(),
                Severity::Error,
                format!("aria-live=\"{}\" is invalid; use polite, assertive, or off", live),
            ));
        }
    }

    for attr in ["aria-atomic", "aria-busy"] {
        if let Some(value) = tag.attr(attr) {
            if !VALID_BOOL_VALUES.contains(&value.trim().to_lowercase().as_str()) {
                out.push(Diagnostic::new(
                    id::LIVE_REGION_INVALID_VALUE,
                    tag.span(),
                    Severity::Error,
                    format!("{}=\"{}\" is invalid; use true or false", attr, value),
                ));
            }
        }
    }

    if let Some(relevant) = tag.attr("aria-relevant") {
        let bad = relevant
            .split_whitespace()
            .any(|t| !VALID_RELEVANT_TOKENS.contains(&t.to_lowercase().as_str()));
        if bad || relevant.trim().is_empty() {
            out.push(Diagnostic::new(
                id::LIVE_REGION_INVALID_VALUE,
                tag.span(),
                Severity::Error,
                format!(
                    "aria-relevant=\"{}\" is invalid; combine additions, removals, text, or use all",
                    relevant
                ),
            ));
        }
    }
}

fn check_redundant_role(tag: &Tag<'_>, out: &mut Vec<Diagnostic>) {
    let role = tag.attr("role").unwrap_or_default().to_lowercase();
    let live = tag.attr("aria-live").unwrap_or_default().to_lowercase();

    let redundant = match (role.as_str(), live.as_str()) {
        ("alert", "assertive") => Some(("alert", "assertive")),
        ("status", "polite") => Some(("status", "polite")),
        _ => None,
    };
    if let Some((role, live)) = redundant {
        out.push(
            Diagnostic::new(
                id::LIVE_REGION_REDUNDANT_ROLE,
                tag.span(),
                Severity::Warning,
                format!(
                    "aria-live=\"{}\" is redundant; role=\"{}\" already implies it",
                    live, role
                ),
            )
            .with_fix(Fix::remove_attribute("aria-live")),
        );
    }
}

/// Elements styled as status messages should actually announce.
fn check_status_styled(tag: &Tag<'_>, name: &str, out: &mut Vec<Diagnostic>) {
    // Form controls and links get status-like classes for styling alone
    if matches!(name, "a" | "button" | "input" | "select" | "textarea" | "option" | "label") {
        return;
    }
    let Some(class) = tag.attr("class") else { return };
    let class = class.to_lowercase();

    let Some((keyword, severity)) = STATUS_CLASS_KEYWORDS
        .iter()
        .find(|(k, _)| class.split(['-', '_', ' ']).any(|part| part == *k))
    else {
        return;
    };

    let has_marker = tag.has_attr("aria-live")
        || matches!(
            tag.attr("role").unwrap_or_default().to_lowercase().as_str(),
            "alert" | "status" | "log"
        );
    if !has_marker {
        out.push(
            Diagnostic::new(
                id::LIVE_REGION_MISSING,
                tag.span(),
                *severity,
                format!(
                    "Element styled as \"{}\" has no live-region marker; dynamic updates will not be announced",
                    keyword
                ),
            )
            .with_fix(Fix::add_attribute(
                "aria-live",
                if *severity == Severity::Error { "assertive" } else { "polite" },
            )),
        );
    }
}

/// Announcement priority should match the urgency of the surrounding content.
fn check_priority(text: &str, tag: &Tag<'_>, out: &mut Vec<Diagnostic>) {
    let live = tag.attr("aria-live").unwrap_or_default().trim().to_lowercase();
    if live != "assertive" && live != "polite" {
        return;
    }

    let window = text::window(text, tag.start.saturating_sub(CONTEXT_WINDOW), tag.end + CONTEXT_WINDOW)
        .to_lowercase();
    let urgent = URGENT_KEYWORDS.iter().any(|k| window.contains(k));

    if live == "assertive" && !urgent {
        out.push(
            Diagnostic::new(
                id::LIVE_REGION_ASSERTIVE_OVERUSE,
                tag.span(),
                Severity::WeakWarning,
                "aria-live=\"assertive\" interrupts the user; nothing nearby suggests urgency, prefer polite",
            )
            .with_fix(Fix::add_attribute("aria-live", "polite")),
        );
    } else if live == "polite" {
        let validation = VALIDATION_KEYWORDS.iter().any(|k| window.contains(k));
        if validation {
            out.push(
                Diagnostic::new(
                    id::LIVE_REGION_POLITE_IN_ERRORS,
                    tag.span(),
                    Severity::WeakWarning,
                    "Validation errors announced politely may be missed; prefer aria-live=\"assertive\" here",
                )
                .with_fix(Fix::add_attribute("aria-live", "assertive")),
            );
        }
    }
}

fn check_competition(text: &str, assertive_offsets: &[usize], out: &mut Vec<Diagnostic>) {
    if assertive_offsets.len() > 2 {
        let third = assertive_offsets[2];
        out.push(Diagnostic::new(
            id::LIVE_REGION_COMPETING,
            text::tags_from(text, third)
                .next()
                .map(|t| t.span())
                .unwrap_or_else(|| crate::diagnostic::Span::new(third, third)),
            Severity::Warning,
            format!(
                "{} assertive live regions compete; announcements will interrupt each other",
                assertive_offsets.len()
            ),
        ));
        return;
    }

    for pair in assertive_offsets.windows(2) {
        if pair[1] - pair[0] < COMPETING_DISTANCE {
            out.push(Diagnostic::new(
                id::LIVE_REGION_COMPETING,
                text::tags_from(text, pair[1])
                    .next()
                    .map(|t| t.span())
                    .unwrap_or_else(|| crate::diagnostic::Span::new(pair[1], pair[1])),
                Severity::Warning,
                "Two assertive live regions within close range; their announcements will compete",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::AnalysisOptions;

    fn run(html: &str) -> Vec<Diagnostic> {
        let ctx = DocumentContext::build(html);
        LiveRegionAnalyzer.analyze(html, &ctx, &AnalysisOptions::new())
    }

    fn rule_count(diags: &[Diagnostic], rule: &str) -> usize {
        diags.iter().filter(|d| d.rule_id == rule).count()
    }

    #[test]
    fn test_invalid_live_value() {
        let diags = run(r#"<div aria-live="rude">x</div>"#);
        assert_eq!(rule_count(&diags, id::LIVE_REGION_INVALID_VALUE), 1);
    }

    #[test]
    fn test_invalid_atomic_value() {
        let diags = run(r#"<div aria-live="polite" aria-atomic="yes">x</div>"#);
        assert_eq!(rule_count(&diags, id::LIVE_REGION_INVALID_VALUE), 1);
    }

    #[test]
    fn test_invalid_relevant_token() {
        let diags = run(r#"<div aria-live="polite" aria-relevant="additions everything">x</div>"#);
        assert_eq!(rule_count(&diags, id::LIVE_REGION_INVALID_VALUE), 1);
    }

    #[test]
    fn test_valid_relevant_combination() {
        let diags = run(r#"<div aria-live="polite" aria-relevant="additions text">x</div>"#);
        assert_eq!(rule_count(&diags, id::LIVE_REGION_INVALID_VALUE), 0);
    }

    #[test]
    fn test_redundant_alert_assertive() {
        let diags = run(r#"<div role="alert" aria-live="assertive">Failed to save: error</div>"#);
        assert_eq!(rule_count(&diags, id::LIVE_REGION_REDUNDANT_ROLE), 1);
    }

    #[test]
    fn test_status_styled_no_marker() {
        let diags = run(r#"<div class="form-error">Something went wrong</div>"#);
        let missing: Vec<_> =
            diags.iter().filter(|d| d.rule_id == id::LIVE_REGION_MISSING).collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].severity, Severity::Error);
    }

    #[test]
    fn test_status_styled_with_role_ok() {
        let diags = run(r#"<div class="alert" role="alert">Error: disk full</div>"#);
        assert_eq!(rule_count(&diags, id::LIVE_REGION_MISSING), 0);
    }

    #[test]
    fn test_assertive_for_calm_content() {
        let html = r#"<html lang="en"><body><div aria-live="assertive">Saved successfully</div></body></html>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::LIVE_REGION_ASSERTIVE_OVERUSE), 1);
    }

    #[test]
    fn test_assertive_near_errors_ok() {
        let html = r#"<div class="validation-summary">Error: fix the fields below</div><div aria-live="assertive">2 errors remain</div>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::LIVE_REGION_ASSERTIVE_OVERUSE), 0);
    }

    #[test]
    fn test_polite_in_validation_context() {
        let html = r#"<form class="signup"><span>validation errors appear here</span><div aria-live="polite">x</div></form>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::LIVE_REGION_POLITE_IN_ERRORS), 1);
    }

    #[test]
    fn test_competing_regions_close_together() {
        let html = r#"<div aria-live="assertive">Error one</div><div aria-live="assertive">Error two</div>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::LIVE_REGION_COMPETING), 1);
    }

    #[test]
    fn test_single_polite_region_clean() {
        let html = r#"<div aria-live="polite">3 items in cart</div>"#;
        let diags = run(html);
        assert!(diags.is_empty(), "unexpected: {:?}", diags);
    }
}
