// SPDX-License-Identifier: PMPL-1.0-or-later
//! List structure analyzer.
//!
//! Enforces valid direct children of `<ul>`/`<ol>`/`<dl>` and applies a
//! content-consistency heuristic: a content list where a large share of
//! items is empty or generic probably misuses list markup.

use crate::analyzers::Analyzer;
use crate::context::DocumentContext;
use crate::diagnostic::{Diagnostic, Fix, Severity, Span};
use crate::rules::{id, AnalysisOptions};
use crate::text::{self, Tag};

/// List structure analyzer
pub struct ListAnalyzer;

/// Valid direct children of ul/ol besides li
const LIST_AUX_CHILDREN: &[&str] = &["script", "template"];

/// Valid direct children of dl
const DL_CHILDREN: &[&str] = &["dt", "dd", "div", "script", "template"];

/// Share of low-content items above which a list is flagged
const LOW_CONTENT_RATIO: f64 = 0.3;

/// Items below this many characters count as low-content
const LOW_CONTENT_CHARS: usize = 3;

/// Minimum items before the consistency heuristic applies
const CONSISTENCY_MIN_ITEMS: usize = 3;

/// What a list appears to be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListPurpose {
    Navigation,
    Content,
}

impl Analyzer for ListAnalyzer {
    fn name(&self) -> &str {
        "List Structure"
    }

    fn description(&self) -> &str {
        "Checks list children validity and item content consistency"
    }

    fn rule_ids(&self) -> &[&str] {
        &[id::LIST_INVALID_CHILD, id::LIST_CONTENT_CONSISTENCY]
    }

    fn analyze(&self, text: &str, _ctx: &DocumentContext, _opts: &AnalysisOptions) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for tag in text::tags(text) {
            if tag.is_closing() {
                continue;
            }
            match tag.name().as_deref() {
                Some("ul") | Some("ol") => check_list(text, &tag, &mut diagnostics),
                Some("dl") => check_dl(text, &tag, &mut diagnostics),
                _ => {}
            }
        }

        diagnostics
    }
}

/// Direct children of the element opening at `tag`, as located tags.
fn direct_children<'a>(text: &'a str, tag: &Tag<'a>) -> Vec<Tag<'a>> {
    let content = text::element_content_span(text, tag.start);
    let mut children = Vec::new();
    let mut depth: usize = 0;

    for inner in text::tags_from(text, content.start) {
        if inner.start >= content.end {
            break;
        }
        let Some(name) = inner.name() else { continue };
        if inner.is_closing() {
            depth = depth.saturating_sub(1);
            continue;
        }
        if depth == 0 {
            children.push(inner);
        }
        if !inner.is_self_closing() && !text::is_void_tag(&name) {
            depth += 1;
        }
    }
    children
}

fn check_list(text: &str, tag: &Tag<'_>, out: &mut Vec<Diagnostic>) {
    let list_name = tag.name().unwrap_or_default();
    let children = direct_children(text, tag);

    let mut item_texts = Vec::new();
    let mut all_link_items = true;

    for child in &children {
        let Some(child_name) = child.name() else { continue };

        if child_name == "li" {
            let content = text::element_content_span(text, child.start);
            let inner = &text[content.start..content.end];
            item_texts.push(text::strip_tags(inner));
            if !text::tags(inner).any(|t| !t.is_closing() && t.name().as_deref() == Some("a")) {
                all_link_items = false;
            }
            continue;
        }

        // Template control-flow tags (f:for, f:if) legitimately wrap items
        if child_name.contains(':') || LIST_AUX_CHILDREN.contains(&child_name.as_str()) {
            continue;
        }

        out.push(
            Diagnostic::new(
                id::LIST_INVALID_CHILD,
                child.span(),
                Severity::Error,
                format!(
                    "<{}> is not a valid direct child of <{}>; only <li> (and script/template) is allowed",
                    child_name, list_name
                ),
            )
            .with_fix(Fix::wrap_in_tag("li")),
        );
    }

    let purpose = if all_link_items && !item_texts.is_empty() {
        ListPurpose::Navigation
    } else {
        ListPurpose::Content
    };
    if purpose == ListPurpose::Content {
        check_consistency(tag.span(), &item_texts, out);
    }
}

fn check_dl(text: &str, tag: &Tag<'_>, out: &mut Vec<Diagnostic>) {
    for child in direct_children(text, tag) {
        let Some(child_name) = child.name() else { continue };
        if DL_CHILDREN.contains(&child_name.as_str()) || child_name.contains(':') {
            continue;
        }
        out.push(Diagnostic::new(
            id::LIST_INVALID_CHILD,
            child.span(),
            Severity::Error,
            format!(
                "<{}> is not a valid direct child of <dl>; use <dt>/<dd> pairs",
                child_name
            ),
        ));
    }
}

/// A content list where many items are empty or generic is suspect.
fn check_consistency(span: Span, item_texts: &[String], out: &mut Vec<Diagnostic>) {
    if item_texts.len() < CONSISTENCY_MIN_ITEMS {
        return;
    }
    let low = item_texts
        .iter()
        .filter(|t| t.chars().count() < LOW_CONTENT_CHARS || text::is_generic_placeholder_text(t))
        .count();
    let ratio = low as f64 / item_texts.len() as f64;

    if ratio > LOW_CONTENT_RATIO {
        out.push(Diagnostic::new(
            id::LIST_CONTENT_CONSISTENCY,
            span,
            Severity::Warning,
            format!(
                "{} of {} list items are empty or placeholder text; the list may be structural markup misuse",
                low,
                item_texts.len()
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
        ListAnalyzer.analyze(html, &ctx, &AnalysisOptions::new())
    }

    fn rule_count(diags: &[Diagnostic], rule: &str) -> usize {
        diags.iter().filter(|d| d.rule_id == rule).count()
    }

    #[test]
    fn test_valid_list() {
        let diags = run("<ul><li>First item</li><li>Second item</li><li>Third item</li></ul>");
        assert!(diags.is_empty(), "unexpected: {:?}", diags);
    }

    #[test]
    fn test_invalid_child() {
        let diags = run("<ul><div>Not an item</div><li>Item text</li></ul>");
        assert_eq!(rule_count(&diags, id::LIST_INVALID_CHILD), 1);
    }

    #[test]
    fn test_nested_div_inside_li_ok() {
        let diags = run("<ul><li><div>Wrapped content</div></li><li>Plain text</li></ul>");
        assert_eq!(rule_count(&diags, id::LIST_INVALID_CHILD), 0);
    }

    #[test]
    fn test_template_loop_child_ok() {
        let diags = run(r#"<ul><f:for each="{items}" as="item"><li>{item.title}</li></f:for></ul>"#);
        assert_eq!(rule_count(&diags, id::LIST_INVALID_CHILD), 0);
    }

    #[test]
    fn test_dl_children() {
        let diags = run("<dl><dt>Term</dt><dd>Definition</dd><li>wrong</li></dl>");
        assert_eq!(rule_count(&diags, id::LIST_INVALID_CHILD), 1);
    }

    #[test]
    fn test_low_content_items() {
        let diags = run("<ul><li>Real item text</li><li></li><li>-</li></ul>");
        assert_eq!(rule_count(&diags, id::LIST_CONTENT_CONSISTENCY), 1);
    }

    #[test]
    fn test_nav_list_skips_consistency() {
        let diags =
            run(r#"<ul><li><a href="/a">A</a></li><li><a href="/b">B</a></li><li><a href="/c">C</a></li></ul>"#);
        assert_eq!(rule_count(&diags, id::LIST_CONTENT_CONSISTENCY), 0);
    }

    #[test]
    fn test_list_with_br_items_depth_ok() {
        // <br> has no closing tag and must not skew child depth
        let diags = run("<ul><li>One<br>Two</li><li>Three item</li><li>Four item</li></ul>");
        assert_eq!(rule_count(&diags, id::LIST_INVALID_CHILD), 0);
    }
}
