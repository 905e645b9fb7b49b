// SPDX-License-Identifier: PMPL-1.0-or-later
//! Link text analyzer.
//!
//! Collects anchors (plain `<a>` and template-engine link helpers) and
//! checks that each has descriptive accessible text: no empty or
//! icon-only links without labels, no generic phrases outside a topical
//! context, no bare URLs, no duplicate text pointing at different targets,
//! and no dense clusters of links outside list/nav structure.

use crate::analyzers::Analyzer;
use crate::context::DocumentContext;
use crate::diagnostic::{Diagnostic, Fix, Severity, Span};
use crate::rules::{id, AnalysisOptions};
use crate::text;

/// Link text analyzer
pub struct LinkAnalyzer;

/// Phrases that say nothing about the destination
const NON_DESCRIPTIVE_PHRASES: &[&str] = &[
    "click", "click here", "details", "go", "here", "info", "learn more", "link", "more",
    "more info", "read more", "see more", "this", "this link", "this page",
];

/// Subset acceptable when the surrounding context names the topic
const CONTEXTUAL_PHRASES: &[&str] =
    &["continue reading", "learn more", "more", "read more", "see more"];

/// Keywords whose presence nearby makes a contextual phrase acceptable
const TOPIC_KEYWORDS: &[&str] = &[
    "article", "blog", "chapter", "documentation", "download", "event", "guide", "news",
    "offer", "post", "product", "project", "release", "report", "review", "story",
    "topic", "tutorial", "update",
];

/// Maximum descriptive link text length
const MAX_LINK_TEXT_CHARS: usize = 100;

/// Window for contextual-phrase and clustering checks
const CONTEXT_WINDOW: usize = 200;
const CLUSTER_WINDOW: usize = 500;

/// Clusters need at least this many links with little intervening text
const CLUSTER_MIN_LINKS: usize = 3;
const CLUSTER_MAX_GAP_TEXT: usize = 20;

#[derive(Debug)]
struct Link {
    span: Span,
    content_end: usize,
    text: String,
    href: Option<String>,
    aria_label: Option<String>,
    title: Option<String>,
    has_icon: bool,
    raw_empty: bool,
}

impl Analyzer for LinkAnalyzer {
    fn name(&self) -> &str {
        "Link Text"
    }

    fn description(&self) -> &str {
        "Checks link text quality, duplicates, and link clustering"
    }

    fn rule_ids(&self) -> &[&str] {
        &[
            id::LINK_TEXT_EMPTY,
            id::LINK_TEXT_ICON_ONLY,
            id::LINK_TEXT_GENERIC,
            id::LINK_TEXT_SINGLE_CHAR,
            id::LINK_TEXT_URL,
            id::LINK_TEXT_LONG,
            id::LINK_TEXT_WHITESPACE,
            id::LINK_TEXT_DUPLICATE,
            id::LINK_CLUSTER,
        ]
    }

    fn analyze(&self, text: &str, ctx: &DocumentContext, _opts: &AnalysisOptions) -> Vec<Diagnostic> {
        let links = collect_links(text);
        let mut diagnostics = Vec::new();

        for link in &links {
            check_link_text(text, link, &mut diagnostics);
        }
        check_duplicates(&links, &mut diagnostics);
        check_clusters(text, ctx, &links, &mut diagnostics);

        diagnostics
    }
}

fn collect_links(text: &str) -> Vec<Link> {
    let mut links = Vec::new();
    for tag in text::tags(text) {
        if tag.is_closing() || !is_anchor_tag(&tag) {
            continue;
        }

        let content = if tag.is_self_closing() {
            Span::new(tag.end, tag.end)
        } else {
            text::element_content_span(text, tag.start)
        };
        let inner = &text[content.start..content.end];
        let stripped = text::strip_tags(inner);

        let has_icon = text::is_icon_glyph_text(&stripped)
            || text::tags(inner).any(|t| {
                !t.is_closing() && t.attr("class").is_some_and(|c| text::is_icon_class(&c))
            })
            || tag.attr("class").is_some_and(|c| text::is_icon_class(&c));

        links.push(Link {
            span: tag.span(),
            content_end: content.end,
            text: stripped,
            href: tag.attr("href"),
            aria_label: tag.attr("aria-label").filter(|v| !v.trim().is_empty()),
            title: tag.attr("title").filter(|v| !v.trim().is_empty()),
            has_icon,
            raw_empty: inner.is_empty(),
        });
    }
    links
}

fn is_anchor_tag(tag: &text::Tag<'_>) -> bool {
    match tag.name() {
        Some(name) if name == "a" => true,
        // Template link helpers such as <f:link.action> / <f:link.page>
        Some(name) => name
            .split_once(':')
            .is_some_and(|(_, local)| local == "link" || local.starts_with("link.")),
        None => false,
    }
}

fn check_link_text(text: &str, link: &Link, out: &mut Vec<Diagnostic>) {
    let labeled = link.aria_label.is_some() || link.title.is_some();

    if link.text.is_empty() {
        if labeled {
            return;
        }
        if link.has_icon {
            out.push(
                Diagnostic::new(
                    id::LINK_TEXT_ICON_ONLY,
                    link.span,
                    Severity::Error,
                    "Icon-only link has no accessible text; add an aria-label",
                )
                .with_fix(Fix::add_attribute("aria-label", "")),
            );
        } else if link.raw_empty {
            out.push(Diagnostic::new(
                id::LINK_TEXT_EMPTY,
                link.span,
                Severity::Error,
                "Link has no text content and no accessible name",
            ));
        } else {
            out.push(Diagnostic::new(
                id::LINK_TEXT_WHITESPACE,
                link.span,
                Severity::Error,
                "Link content collapses to whitespace; it has no accessible name",
            ));
        }
        return;
    }

    let lower = normalize_phrase(&link.text);

    if NON_DESCRIPTIVE_PHRASES.contains(&lower.as_str()) {
        let allowed = CONTEXTUAL_PHRASES.contains(&lower.as_str())
            && context_names_topic(text, link);
        if !allowed {
            out.push(Diagnostic::new(
                id::LINK_TEXT_GENERIC,
                link.span,
                Severity::Error,
                format!(
                    "Link text \"{}\" does not describe the destination",
                    link.text
                ),
            ));
        }
        return;
    }

    let chars = link.text.chars().count();
    if chars == 1 && link.text.chars().all(|c| c.is_alphanumeric()) && !labeled {
        out.push(Diagnostic::new(
            id::LINK_TEXT_SINGLE_CHAR,
            link.span,
            Severity::Warning,
            format!("Single-character link text \"{}\"; add an aria-label", link.text),
        ));
        return;
    }

    if text::is_url_like_text(&link.text) {
        out.push(Diagnostic::new(
            id::LINK_TEXT_URL,
            link.span,
            Severity::Warning,
            "Raw URL as link text is hard to listen to; use descriptive text",
        ));
    }

    if chars > MAX_LINK_TEXT_CHARS {
        out.push(Diagnostic::new(
            id::LINK_TEXT_LONG,
            link.span,
            Severity::Warning,
            format!("Link text of {} characters; keep it concise", chars),
        ));
    }
}

fn normalize_phrase(text: &str) -> String {
    text.trim()
        .trim_end_matches(['.', '!', '…', '>', '»'])
        .trim()
        .to_lowercase()
}

/// A contextual phrase like "read more" is fine when the nearby heading or
/// prose names what "more" refers to.
fn context_names_topic(text: &str, link: &Link) -> bool {
    let raw = text::window(
        text,
        link.span.start.saturating_sub(CONTEXT_WINDOW),
        link.span.end + CONTEXT_WINDOW,
    );
    let window = text::strip_tags(raw).to_lowercase();

    TOPIC_KEYWORDS.iter().any(|k| window.contains(k))
}

fn check_duplicates(links: &[Link], out: &mut Vec<Diagnostic>) {
    for (i, link) in links.iter().enumerate() {
        if link.text.is_empty() {
            continue;
        }
        let Some(href) = &link.href else { continue };

        let conflicting = links.iter().enumerate().any(|(j, other)| {
            i != j
                && other.text.eq_ignore_ascii_case(&link.text)
                && other.href.as_ref().is_some_and(|h| h != href)
        });
        if conflicting {
            out.push(Diagnostic::new(
                id::LINK_TEXT_DUPLICATE,
                link.span,
                Severity::Error,
                format!(
                    "Link text \"{}\" is also used for a different destination; distinguish them",
                    link.text
                ),
            ));
        }
    }
}

/// Dense runs of adjacent links read poorly outside list or nav structure.
fn check_clusters(
    text: &str,
    ctx: &DocumentContext,
    links: &[Link],
    out: &mut Vec<Diagnostic>,
) {
    let mut run_start = 0;
    for i in 0..links.len() {
        let run_continues = i + 1 < links.len() && {
            let gap = &text[links[i].content_end.min(links[i + 1].span.start)..links[i + 1].span.start];
            links[i + 1].span.start - links[i].span.start < CLUSTER_WINDOW
                && text::strip_tags(gap).chars().count() < CLUSTER_MAX_GAP_TEXT
        };
        if run_continues {
            continue;
        }

        let run = &links[run_start..=i];
        let ungrouped: Vec<&Link> = run
            .iter()
            .filter(|l| {
                !ctx.is_in_navigation_context(l.span.start) && !in_list(text, l.span.start)
            })
            .collect();
        if ungrouped.len() >= CLUSTER_MIN_LINKS {
            out.push(Diagnostic::new(
                id::LINK_CLUSTER,
                ungrouped[0].span,
                Severity::WeakWarning,
                format!(
                    "{} adjacent links; consider grouping them in a list or nav element",
                    ungrouped.len()
                ),
            ));
        }
        run_start = i + 1;
    }
}

/// Prefix heuristic: an open `<li>` before the offset with no `</li>` yet.
fn in_list(text: &str, offset: usize) -> bool {
    let before = text[..offset.min(text.len())].to_lowercase();
    let last_open = before.rfind("<li");
    let last_close = before.rfind("</li");
    match (last_open, last_close) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::AnalysisOptions;

    fn run(html: &str) -> Vec<Diagnostic> {
        let ctx = DocumentContext::build(html);
        LinkAnalyzer.analyze(html, &ctx, &AnalysisOptions::new())
    }

    fn rule_count(diags: &[Diagnostic], rule: &str) -> usize {
        diags.iter().filter(|d| d.rule_id == rule).count()
    }

    #[test]
    fn test_click_here_flagged() {
        let diags = run(r#"<a href="/x">click here</a>"#);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_GENERIC), 1);
    }

    #[test]
    fn test_read_more_with_topic_context_ok() {
        let html = r#"<h2>Quarterly Report</h2><p>Revenue grew.</p><a href="/report">read more</a>"#;
        let diags = run(html);
        assert!(diags.is_empty(), "unexpected: {:?}", diags);
    }

    #[test]
    fn test_read_more_without_context_flagged() {
        let diags = run(r#"<a href="/x">read more</a>"#);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_GENERIC), 1);
    }

    #[test]
    fn test_click_here_never_contextual() {
        let html = r#"<h2>Quarterly Report</h2><a href="/report">click here</a>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_GENERIC), 1);
    }

    #[test]
    fn test_empty_link() {
        let diags = run(r#"<a href="/x"></a>"#);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_EMPTY), 1);
    }

    #[test]
    fn test_whitespace_link() {
        let diags = run("<a href=\"/x\">&nbsp;</a>");
        assert_eq!(rule_count(&diags, id::LINK_TEXT_WHITESPACE), 0);
        let diags = run("<a href=\"/x\">  \n </a>");
        // collapses to whitespace but the content is not byte-empty
        assert_eq!(rule_count(&diags, id::LINK_TEXT_WHITESPACE), 1);
    }

    #[test]
    fn test_icon_only_link() {
        let diags = run(r#"<a href="/close"><i class="icon-x"></i></a>"#);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_ICON_ONLY), 1);
    }

    #[test]
    fn test_icon_link_with_label_ok() {
        let diags = run(r#"<a href="/close" aria-label="Close panel"><i class="icon-x"></i></a>"#);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_ICON_ONLY), 0);
    }

    #[test]
    fn test_single_char() {
        let diags = run(r#"<a href="/p/2">2</a>"#);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_SINGLE_CHAR), 1);
    }

    #[test]
    fn test_url_as_text() {
        let diags = run(r#"<a href="https://example.com">https://example.com/page</a>"#);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_URL), 1);
    }

    #[test]
    fn test_long_text() {
        let long = "word ".repeat(25);
        let html = format!(r#"<a href="/x">{}</a>"#, long.trim());
        let diags = run(&html);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_LONG), 1);
    }

    #[test]
    fn test_duplicate_text_different_targets() {
        let html = r#"<a href="/a">Pricing details</a><p>and</p><a href="/b">Pricing details</a>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_DUPLICATE), 2);
    }

    #[test]
    fn test_same_text_same_target_ok() {
        let html = r#"<a href="/a">Pricing details</a><p>and</p><a href="/a">Pricing details</a>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_DUPLICATE), 0);
    }

    #[test]
    fn test_cluster_outside_list() {
        let html = r#"<p><a href="/a">Alpha one</a> <a href="/b">Beta two</a> <a href="/c">Gamma three</a></p>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::LINK_CLUSTER), 1);
    }

    #[test]
    fn test_cluster_in_list_ok() {
        let html = r#"<ul><li><a href="/a">Alpha one</a></li><li><a href="/b">Beta two</a></li><li><a href="/c">Gamma three</a></li></ul>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::LINK_CLUSTER), 0);
    }

    #[test]
    fn test_cluster_in_nav_ok() {
        let html = r#"<nav><a href="/a">Alpha one</a> <a href="/b">Beta two</a> <a href="/c">Gamma three</a></nav>"#;
        let diags = run(html);
        assert_eq!(rule_count(&diags, id::LINK_CLUSTER), 0);
    }

    #[test]
    fn test_template_link_helper() {
        let diags = run(r#"<f:link.action action="show">click here</f:link.action>"#);
        assert_eq!(rule_count(&diags, id::LINK_TEXT_GENERIC), 1);
    }
}
