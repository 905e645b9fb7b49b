// SPDX-License-Identifier: PMPL-1.0-or-later
//! Heading hierarchy analyzer.
//!
//! Headings are collected in document order and grouped by context (main
//! content, navigation, sectioning content, template section) using the
//! document context plus phrase fallbacks. The hierarchy check is a linear
//! scan with a lookback over level numbers, not a tree build: nesting is
//! approximated by document order.

use crate::analyzers::Analyzer;
use crate::context::DocumentContext;
use crate::diagnostic::{Diagnostic, Severity, Span};
use crate::rules::{id, AnalysisOptions};
use crate::text;

/// Heading hierarchy analyzer
pub struct HeadingAnalyzer;

/// Heading contexts tracked independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum HeadingContext {
    MainContent,
    Navigation,
    SectioningContent,
    TemplateSection,
}

/// Phrases marking a heading as navigational regardless of position
const NAV_HEADING_PHRASES: &[&str] = &[
    "navigation", "breadcrumb", "table of contents", "menu", "site map", "sitemap",
    "quick links",
];

#[derive(Debug)]
struct Heading {
    level: u8,
    text: String,
    span: Span,
    context: HeadingContext,
    has_img: bool,
}

impl Analyzer for HeadingAnalyzer {
    fn name(&self) -> &str {
        "Heading Hierarchy"
    }

    fn description(&self) -> &str {
        "Checks heading levels, H1 placement, and heading content per context"
    }

    fn rule_ids(&self) -> &[&str] {
        &[
            id::HEADING_SKIP,
            id::HEADING_MULTIPLE_H1,
            id::HEADING_H1_IN_SECTION,
            id::HEADING_H1_IN_NAV,
            id::HEADING_EMPTY,
            id::HEADING_GENERIC,
        ]
    }

    fn analyze(&self, text: &str, ctx: &DocumentContext, _opts: &AnalysisOptions) -> Vec<Diagnostic> {
        let headings = collect_headings(text, ctx);
        let mut diagnostics = Vec::new();

        check_level_skips(&headings, &mut diagnostics);
        check_h1_placement(&headings, &mut diagnostics);
        for heading in &headings {
            check_content(heading, &mut diagnostics);
        }

        diagnostics
    }
}

fn collect_headings(text: &str, ctx: &DocumentContext) -> Vec<Heading> {
    let mut headings = Vec::new();

    for tag in text::tags(text) {
        if tag.is_closing() {
            continue;
        }
        let Some(name) = tag.name() else { continue };
        let Some(level) = heading_level(&name) else { continue };

        let content = text::element_content_span(text, tag.start);
        let inner = &text[content.start..content.end];
        let stripped = text::strip_tags(inner);
        let has_img = text::tags(inner).any(|t| t.name().as_deref() == Some("img"));

        headings.push(Heading {
            level,
            context: classify(ctx, tag.start, &stripped),
            text: stripped,
            span: tag.span(),
            has_img,
        });
    }

    headings
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn classify(ctx: &DocumentContext, offset: usize, stripped: &str) -> HeadingContext {
    let lower = stripped.to_lowercase();
    if ctx.is_in_navigation_context(offset)
        || NAV_HEADING_PHRASES.iter().any(|p| lower.contains(p))
    {
        HeadingContext::Navigation
    } else if ctx.is_in_subsection(offset) {
        HeadingContext::SectioningContent
    } else if ctx.is_in_template_section(offset) && !ctx.is_in_sectioning_element(offset) {
        HeadingContext::TemplateSection
    } else {
        HeadingContext::MainContent
    }
}

/// Per context group: a heading more than one level below its nearest lower
/// ancestor skips levels.
fn check_level_skips(headings: &[Heading], out: &mut Vec<Diagnostic>) {
    for (i, heading) in headings.iter().enumerate() {
        let ancestor = headings[..i]
            .iter()
            .rev()
            .filter(|h| h.context == heading.context)
            .find(|h| h.level < heading.level);
        let Some(ancestor) = ancestor else { continue };

        if heading.level - ancestor.level > 1 {
            let expected = ancestor.level + 1;
            out.push(Diagnostic::new(
                id::HEADING_SKIP,
                heading.span,
                Severity::Warning,
                format!(
                    "Heading level skipped: <h{}> follows <h{}>, expected <h{}>",
                    heading.level, ancestor.level, expected
                ),
            ));
        }
    }
}

fn check_h1_placement(headings: &[Heading], out: &mut Vec<Diagnostic>) {
    let mut main_h1_seen = false;

    for heading in headings {
        if heading.level != 1 {
            continue;
        }
        match heading.context {
            HeadingContext::MainContent => {
                if main_h1_seen {
                    out.push(Diagnostic::new(
                        id::HEADING_MULTIPLE_H1,
                        heading.span,
                        Severity::Warning,
                        "Multiple <h1> headings in main content; demote this one to <h2>",
                    ));
                }
                main_h1_seen = true;
            }
            HeadingContext::SectioningContent => {
                if main_h1_seen {
                    out.push(Diagnostic::new(
                        id::HEADING_H1_IN_SECTION,
                        heading.span,
                        Severity::WeakWarning,
                        "Prefer <h2> inside a sectioning element when the page already has an <h1>",
                    ));
                }
            }
            HeadingContext::Navigation => {
                if main_h1_seen {
                    out.push(Diagnostic::new(
                        id::HEADING_H1_IN_NAV,
                        heading.span,
                        Severity::WeakWarning,
                        "Navigation heading at level 1; prefer an aria-label on the <nav> element instead",
                    ));
                }
            }
            HeadingContext::TemplateSection => {}
        }
    }
}

fn check_content(heading: &Heading, out: &mut Vec<Diagnostic>) {
    if heading.text.is_empty() {
        let message = if heading.has_img {
            "Heading contains only an image; ensure the image has descriptive alt text"
        } else {
            "Empty heading; add text or remove the element"
        };
        out.push(Diagnostic::new(
            id::HEADING_EMPTY,
            heading.span,
            Severity::Error,
            message,
        ));
        return;
    }

    let chars = heading.text.chars().count();
    let numeric = heading.text.chars().all(|c| c.is_ascii_digit() || c.is_whitespace());
    if text::is_generic_placeholder_text(&heading.text) || chars == 1 || numeric {
        out.push(Diagnostic::new(
            id::HEADING_GENERIC,
            heading.span,
            Severity::Warning,
            format!(
                "Heading text \"{}\" is not descriptive; use text that summarizes the section",
                heading.text
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::AnalysisOptions;

    fn run(html: &str) -> Vec<Diagnostic> {
        let ctx = DocumentContext::build(html);
        HeadingAnalyzer.analyze(html, &ctx, &AnalysisOptions::new())
    }

    fn rule_count(diags: &[Diagnostic], rule: &str) -> usize {
        diags.iter().filter(|d| d.rule_id == rule).count()
    }

    #[test]
    fn test_level_skip() {
        let diags = run("<h1>Quarterly results</h1><h3>Revenue by region</h3>");
        assert_eq!(rule_count(&diags, id::HEADING_SKIP), 1);
        assert!(diags[0].message.contains("<h2>"));
    }

    #[test]
    fn test_no_skip_in_order() {
        let diags = run("<h1>Annual report</h1><h2>Summary of changes</h2><h3>Details by quarter</h3>");
        assert_eq!(rule_count(&diags, id::HEADING_SKIP), 0);
    }

    #[test]
    fn test_going_back_up_is_fine() {
        let diags = run("<h1>Product catalog</h1><h2>Hardware items</h2><h3>Laptops available</h3><h2>Software items</h2>");
        assert_eq!(rule_count(&diags, id::HEADING_SKIP), 0);
    }

    #[test]
    fn test_multiple_h1_main() {
        let diags = run("<h1>First page title</h1><p>x</p><h1>Second page title</h1>");
        assert_eq!(rule_count(&diags, id::HEADING_MULTIPLE_H1), 1);
    }

    #[test]
    fn test_h1_in_section_weak_warning() {
        let diags =
            run("<h1>Page title here</h1><section><h1>Section title here</h1></section>");
        assert_eq!(rule_count(&diags, id::HEADING_H1_IN_SECTION), 1);
        assert_eq!(rule_count(&diags, id::HEADING_MULTIPLE_H1), 0);
    }

    #[test]
    fn test_nav_h1_suggests_aria_label() {
        let diags = run("<h1>Welcome to the docs</h1><nav><h1>Main navigation</h1></nav>");
        assert_eq!(rule_count(&diags, id::HEADING_H1_IN_NAV), 1);
    }

    #[test]
    fn test_nav_context_separate_hierarchy() {
        // The h4 in the nav must not be measured against the main h1
        let diags = run("<h1>Page title here</h1><nav><h4>Site menu</h4></nav>");
        assert_eq!(rule_count(&diags, id::HEADING_SKIP), 0);
    }

    #[test]
    fn test_empty_heading() {
        let diags = run("<h2>   </h2>");
        assert_eq!(rule_count(&diags, id::HEADING_EMPTY), 1);
        assert_eq!(diags[0].severity, Severity::Error);
        assert!(diags[0].message.contains("add text"));
    }

    #[test]
    fn test_image_only_heading() {
        let diags = run(r#"<h1><img src="logo.png"></h1>"#);
        assert_eq!(rule_count(&diags, id::HEADING_EMPTY), 1);
        assert!(diags[0].message.contains("alt text"));
    }

    #[test]
    fn test_generic_heading() {
        let diags = run("<h2>Untitled</h2>");
        assert_eq!(rule_count(&diags, id::HEADING_GENERIC), 1);
    }

    #[test]
    fn test_numeric_heading() {
        let diags = run("<h2>42</h2>");
        assert_eq!(rule_count(&diags, id::HEADING_GENERIC), 1);
    }
}
