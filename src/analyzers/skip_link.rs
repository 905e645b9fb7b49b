// SPDX-License-Identifier: PMPL-1.0-or-later
//! Skip-link analyzer.
//!
//! Applies only to files that look like full-page templates. Checks that a
//! page with both navigation and main-content landmarks offers a skip
//! link, that the link's target exists and is descriptively named, that a
//! screen-reader-only link becomes visible on focus, and that the skip
//! link is the first focusable element.

use crate::analyzers::Analyzer;
use crate::context::DocumentContext;
use crate::diagnostic::{Diagnostic, Severity, Span};
use crate::rules::{id, AnalysisOptions, FileKind};
use crate::text::{self, Tag};

/// Skip-link analyzer
pub struct SkipLinkAnalyzer;

/// Phrases identifying a skip link
const SKIP_PHRASES: &[&str] =
    &["jump to content", "skip navigation", "skip to content", "skip to main", "skip link"];

/// Class fragments identifying a skip link
const SKIP_CLASS_FRAGMENTS: &[&str] = &["skip-link", "skip-nav", "skiplink", "skip-to"];

/// Class fragments hiding an element visually but not from screen readers
const SR_ONLY_CLASSES: &[&str] = &["sr-only", "screen-reader", "visually-hidden", "visuallyhidden"];

/// Prefixes that make a skip-target id self-describing
const DESCRIPTIVE_TARGET_PREFIXES: &[&str] = &["content", "main", "navigation", "search"];

/// Tags that receive keyboard focus natively
const FOCUSABLE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea"];

impl Analyzer for SkipLinkAnalyzer {
    fn name(&self) -> &str {
        "Skip Link"
    }

    fn description(&self) -> &str {
        "Checks skip-link presence, target resolution, and focus visibility"
    }

    fn rule_ids(&self) -> &[&str] {
        &[
            id::SKIP_LINK_MISSING,
            id::SKIP_LINK_DANGLING,
            id::SKIP_LINK_TARGET_NAME,
            id::SKIP_LINK_FOCUS_STYLE,
            id::SKIP_LINK_NOT_FIRST,
        ]
    }

    fn analyze(&self, text: &str, ctx: &DocumentContext, opts: &AnalysisOptions) -> Vec<Diagnostic> {
        if opts.file_kind == Some(FileKind::Fragment) || !looks_like_full_page(text) {
            return Vec::new();
        }

        let mut diagnostics = Vec::new();
        let skip_links = collect_skip_links(text);

        if skip_links.is_empty() {
            check_missing(text, &mut diagnostics);
        }
        for link in &skip_links {
            check_target(ctx, link, &mut diagnostics);
            check_focus_visibility(text, link, &mut diagnostics);
        }
        if let Some(first_link) = skip_links.first() {
            check_first_focusable(text, first_link, &mut diagnostics);
        }

        diagnostics
    }
}

fn looks_like_full_page(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("<body")
        && (lower.contains("<header") || lower.contains("<nav") || lower.contains("<main"))
}

#[derive(Debug)]
struct SkipLink {
    span: Span,
    target: Option<String>,
    sr_class: Option<String>,
}

fn collect_skip_links(text: &str) -> Vec<SkipLink> {
    let mut links = Vec::new();
    for tag in text::tags(text) {
        if tag.is_closing() || tag.name().as_deref() != Some("a") {
            continue;
        }
        if !is_skip_link(text, &tag) {
            continue;
        }

        let target = tag
            .attr("href")
            .and_then(|h| h.strip_prefix('#').map(str::to_string));
        let sr_class = tag.attr("class").and_then(|c| {
            let lower = c.to_lowercase();
            SR_ONLY_CLASSES
                .iter()
                .find(|sr| lower.contains(*sr))
                .map(|sr| sr.to_string())
        });

        links.push(SkipLink { span: tag.span(), target, sr_class });
    }
    links
}

fn is_skip_link(text: &str, tag: &Tag<'_>) -> bool {
    let fragment_href = tag.attr("href").is_some_and(|h| h.starts_with('#'));
    if !fragment_href {
        return false;
    }

    if tag.attr("class").is_some_and(|c| {
        let lower = c.to_lowercase();
        SKIP_CLASS_FRAGMENTS.iter().any(|f| lower.contains(f))
    }) {
        return true;
    }

    let content = text::element_content_span(text, tag.start);
    let inner = text::strip_tags(&text[content.start..content.end]).to_lowercase();
    SKIP_PHRASES.iter().any(|p| inner.contains(p)) || inner.starts_with("skip ")
}

/// Both landmark kinds present but no skip link anywhere.
fn check_missing(text: &str, out: &mut Vec<Diagnostic>) {
    let lower = text.to_lowercase();
    let has_nav = lower.contains("<nav") || lower.contains("role=\"navigation\"");
    let has_main = lower.contains("<main") || lower.contains("role=\"main\"");
    if !(has_nav && has_main) {
        return;
    }

    let body_span = text::tags(text)
        .find(|t| !t.is_closing() && t.name().as_deref() == Some("body"))
        .map(|t| t.span())
        .unwrap_or_else(|| Span::new(0, 0));
    out.push(Diagnostic::new(
        id::SKIP_LINK_MISSING,
        body_span,
        Severity::Warning,
        "Page has navigation and main content but no skip link; keyboard users must tab through the navigation every time",
    ));
}

fn check_target(ctx: &DocumentContext, link: &SkipLink, out: &mut Vec<Diagnostic>) {
    let Some(target) = &link.target else { return };

    if !ctx.has_id(target) {
        out.push(Diagnostic::new(
            id::SKIP_LINK_DANGLING,
            link.span,
            Severity::Error,
            format!("Skip link points at \"#{}\" but no element has that id", target),
        ));
        return;
    }

    let lower = target.to_lowercase();
    if !DESCRIPTIVE_TARGET_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        out.push(Diagnostic::new(
            id::SKIP_LINK_TARGET_NAME,
            link.span,
            Severity::Info,
            format!(
                "Skip-link target id \"{}\" is not self-describing; ids like \"main-content\" age better",
                target
            ),
        ));
    }
}

/// A visually hidden skip link must have a `:focus` rule making it visible.
fn check_focus_visibility(text: &str, link: &SkipLink, out: &mut Vec<Diagnostic>) {
    let Some(sr_class) = &link.sr_class else { return };

    let lower = text.to_lowercase();
    let has_focus_rule = lower.contains(&format!(".{}:focus", sr_class))
        || lower.contains(&format!("{}:focus", sr_class));
    if !has_focus_rule {
        out.push(Diagnostic::new(
            id::SKIP_LINK_FOCUS_STYLE,
            link.span,
            Severity::Warning,
            format!(
                "Screen-reader-only skip link (class \"{}\") has no :focus rule; sighted keyboard users never see it",
                sr_class
            ),
        ));
    }
}

/// The skip link should be the first focusable element in <body>.
fn check_first_focusable(text: &str, link: &SkipLink, out: &mut Vec<Diagnostic>) {
    let Some(body) = text::tags(text).find(|t| !t.is_closing() && t.name().as_deref() == Some("body"))
    else {
        return;
    };

    let first_focusable = text::tags_from(text, body.end).find(|t| {
        if t.is_closing() {
            return false;
        }
        let Some(name) = t.name() else { return false };
        FOCUSABLE_TAGS.contains(&name.as_str())
            || t.attr("tabindex")
                .and_then(|v| v.trim().parse::<i32>().ok())
                .is_some_and(|v| v >= 0)
    });

    if let Some(first) = first_focusable {
        if first.start != link.span.start {
            out.push(Diagnostic::new(
                id::SKIP_LINK_NOT_FIRST,
                link.span,
                Severity::Info,
                "Skip link is not the first focusable element in <body>; earlier controls are announced first",
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
        SkipLinkAnalyzer.analyze(html, &ctx, &AnalysisOptions::new())
    }

    fn rule_count(diags: &[Diagnostic], rule: &str) -> usize {
        diags.iter().filter(|d| d.rule_id == rule).count()
    }

    const PAGE_WITH_SKIP: &str = r##"<html><body>
        <a href="#main-content" class="skip-link">Skip to content</a>
        <nav><a href="/">Home</a></nav>
        <main id="main-content"><h1>Title</h1></main>
        </body></html>"##;

    #[test]
    fn test_page_with_skip_link_clean() {
        let diags = run(PAGE_WITH_SKIP);
        // class "skip-link" is not an sr-only class, target exists and is descriptive
        assert!(diags.is_empty(), "unexpected: {:?}", diags);
    }

    #[test]
    fn test_missing_skip_link() {
        let html = r#"<html><body>
            <nav><a href="/">Home</a></nav>
            <main id="main"><h1>Title</h1></main>
            </body></html>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::SKIP_LINK_MISSING), 1);
    }

    #[test]
    fn test_no_landmarks_no_requirement() {
        let html = r#"<html><body><header><h1>Plain page</h1></header><p>x</p></body></html>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::SKIP_LINK_MISSING), 0);
    }

    #[test]
    fn test_fragment_skipped() {
        let html = r#"<div><p>partial content, no body</p></div>"#;
        assert!(run(html).is_empty());
    }

    #[test]
    fn test_dangling_target() {
        let html = r##"<html><body>
            <a href="#nowhere" class="skip-link">Skip to content</a>
            <nav></nav><main id="main"></main>
            </body></html>"##;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::SKIP_LINK_DANGLING), 1);
    }

    #[test]
    fn test_non_descriptive_target() {
        let html = r##"<html><body>
            <a href="#x1" class="skip-link">Skip to content</a>
            <nav></nav><main id="x1"></main>
            </body></html>"##;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::SKIP_LINK_TARGET_NAME), 1);
    }

    #[test]
    fn test_sr_only_without_focus_rule() {
        let html = r##"<html><body>
            <a href="#main" class="sr-only">Skip to content</a>
            <nav></nav><main id="main"></main>
            </body></html>"##;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::SKIP_LINK_FOCUS_STYLE), 1);
    }

    #[test]
    fn test_sr_only_with_focus_rule_ok() {
        let html = r##"<html><head><style>.sr-only:focus { position: static; }</style></head><body>
            <a href="#main" class="sr-only">Skip to content</a>
            <nav></nav><main id="main"></main>
            </body></html>"##;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::SKIP_LINK_FOCUS_STYLE), 0);
    }

    #[test]
    fn test_skip_link_not_first_focusable() {
        let html = r##"<html><body>
            <a href="/login">Log in</a>
            <a href="#main" class="skip-link">Skip to content</a>
            <nav></nav><main id="main"></main>
            </body></html>"##;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::SKIP_LINK_NOT_FIRST), 1);
    }
}
