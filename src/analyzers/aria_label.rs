// SPDX-License-Identifier: PMPL-1.0-or-later
//! ARIA labeling analyzer.
//!
//! Validates how elements get their accessible names: conflicting or empty
//! labeling mechanisms, labels that fight visible text, dangling
//! `aria-labelledby` references, unlabeled icon-only controls, and labels
//! on elements that are hidden or never exposed to assistive technology.

use crate::analyzers::Analyzer;
use crate::context::DocumentContext;
use crate::diagnostic::{Diagnostic, Fix, Severity};
use crate::rules::{id, AnalysisOptions};
use crate::text::{self, Tag};

/// ARIA labeling analyzer
pub struct AriaLabelAnalyzer;

/// Non-interactive elements where aria-label has no effect without a role
const NON_INTERACTIVE_TAGS: &[&str] = &[
    "b", "blockquote", "code", "dd", "div", "dl", "dt", "em", "h1", "h2", "h3", "h4",
    "h5", "h6", "i", "li", "ol", "p", "pre", "small", "span", "strong", "table", "td",
    "th", "tr", "ul",
];

/// Elements labeled by their own content
const SELF_LABELING_TAGS: &[&str] = &[
    "a", "button", "caption", "figcaption", "label", "legend", "optgroup", "option",
    "summary",
];

/// Interactive elements that need accessible text when icon-only
const ICON_CHECK_TAGS: &[&str] = &["a", "button"];

/// Visible text may be this many characters longer than the label before the
/// label counts as hiding more descriptive text
const LABEL_SLACK_CHARS: usize = 5;

impl Analyzer for AriaLabelAnalyzer {
    fn name(&self) -> &str {
        "ARIA Label"
    }

    fn description(&self) -> &str {
        "Validates accessible-name mechanisms and icon-only controls"
    }

    fn rule_ids(&self) -> &[&str] {
        &[
            id::ARIA_LABEL_CONFLICT,
            id::ARIA_LABEL_EMPTY,
            id::ARIA_LABEL_UNNECESSARY,
            id::ARIA_LABEL_REDUNDANT,
            id::ARIA_LABEL_OVERRIDES,
            id::ARIA_LABEL_GENERIC,
            id::ARIA_LABELLEDBY_DANGLING,
            id::ARIA_LABEL_ICON_ONLY,
            id::ARIA_LABEL_HIDDEN,
        ]
    }

    fn analyze(&self, text: &str, ctx: &DocumentContext, _opts: &AnalysisOptions) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for tag in text::tags(text) {
            if tag.is_closing() {
                continue;
            }
            let Some(name) = tag.name() else { continue };

            let label = tag.attr("aria-label");
            let labelledby = tag.attr("aria-labelledby");

            if label.is_some() && labelledby.is_some() {
                diagnostics.push(Diagnostic::new(
                    id::ARIA_LABEL_CONFLICT,
                    tag.span(),
                    Severity::Warning,
                    format!(
                        "<{}> uses both aria-label and aria-labelledby; aria-labelledby wins, use one mechanism",
                        name
                    ),
                ));
            }

            if let Some(ref value) = label {
                check_label_value(text, &tag, &name, value, &mut diagnostics);
            }

            if let Some(ref refs) = labelledby {
                check_labelledby_refs(ctx, &tag, refs, &mut diagnostics);
            }

            if ICON_CHECK_TAGS.contains(&name.as_str()) {
                check_icon_only(text, &tag, &name, &mut diagnostics);
            }
        }

        diagnostics
    }
}

fn check_label_value(
    text: &str,
    tag: &Tag<'_>,
    tag_name: &str,
    label: &str,
    out: &mut Vec<Diagnostic>,
) {
    if label.trim().is_empty() {
        out.push(
            Diagnostic::new(
                id::ARIA_LABEL_EMPTY,
                tag.span(),
                Severity::Error,
                format!("Empty aria-label on <{}> provides no accessible name", tag_name),
            )
            .with_fix(Fix::remove_attribute("aria-label")),
        );
        return;
    }

    if tag.attr("aria-hidden").as_deref() == Some("true") {
        out.push(Diagnostic::new(
            id::ARIA_LABEL_HIDDEN,
            tag.span(),
            Severity::Warning,
            format!(
                "aria-label on <{}> is ignored because the element is aria-hidden",
                tag_name
            ),
        ));
    }

    if NON_INTERACTIVE_TAGS.contains(&tag_name)
        && !tag.has_attr("role")
        && !tag.has_attr("tabindex")
    {
        out.push(
            Diagnostic::new(
                id::ARIA_LABEL_UNNECESSARY,
                tag.span(),
                Severity::Warning,
                format!(
                    "aria-label on non-interactive <{}> is not reliably announced; move the text into the content",
                    tag_name
                ),
            )
            .with_fix(Fix::remove_attribute("aria-label")),
        );
    }

    if SELF_LABELING_TAGS.contains(&tag_name) && !tag.is_self_closing() {
        let content = text::element_content_span(text, tag.start);
        let visible = text::strip_tags(&text[content.start..content.end]);
        if !visible.is_empty() {
            compare_label_with_text(tag, tag_name, label, &visible, out);
        }
    }
}

fn compare_label_with_text(
    tag: &Tag<'_>,
    tag_name: &str,
    label: &str,
    visible: &str,
    out: &mut Vec<Diagnostic>,
) {
    let label_trim = label.trim();
    if label_trim.eq_ignore_ascii_case(visible) {
        out.push(
            Diagnostic::new(
                id::ARIA_LABEL_REDUNDANT,
                tag.span(),
                Severity::Warning,
                format!(
                    "aria-label on <{}> duplicates the visible text \"{}\"",
                    tag_name, visible
                ),
            )
            .with_fix(Fix::remove_attribute("aria-label")),
        );
    } else if visible.chars().count() > label_trim.chars().count() + LABEL_SLACK_CHARS {
        out.push(Diagnostic::new(
            id::ARIA_LABEL_OVERRIDES,
            tag.span(),
            Severity::Warning,
            format!(
                "aria-label \"{}\" overrides the more descriptive visible text \"{}\"",
                label_trim, visible
            ),
        ));
    } else if text::is_generic_placeholder_text(label_trim)
        && !text::is_generic_placeholder_text(visible)
    {
        out.push(Diagnostic::new(
            id::ARIA_LABEL_GENERIC,
            tag.span(),
            Severity::Warning,
            format!(
                "Generic aria-label \"{}\" overrides the specific visible text \"{}\"",
                label_trim, visible
            ),
        ));
    }
}

fn check_labelledby_refs(
    ctx: &DocumentContext,
    tag: &Tag<'_>,
    refs: &str,
    out: &mut Vec<Diagnostic>,
) {
    for id_ref in refs.split_whitespace() {
        if !ctx.has_id(id_ref) {
            out.push(Diagnostic::new(
                id::ARIA_LABELLEDBY_DANGLING,
                tag.span(),
                Severity::Error,
                format!("aria-labelledby references non-existent id \"{}\"", id_ref),
            ));
        }
    }
}

/// Icon-only interactive elements need accessible text from somewhere.
fn check_icon_only(text: &str, tag: &Tag<'_>, tag_name: &str, out: &mut Vec<Diagnostic>) {
    if tag.has_attr("aria-label") || tag.has_attr("aria-labelledby") || tag.has_attr("title") {
        return;
    }
    if tag.is_self_closing() {
        return;
    }

    let content = text::element_content_span(text, tag.start);
    let inner = &text[content.start..content.end];
    let visible = text::strip_tags(inner);

    let glyph_only = !visible.is_empty() && text::is_icon_glyph_text(&visible);
    let icon_child = visible.is_empty() && contains_icon_element(inner);
    let own_icon_class = tag.attr("class").is_some_and(|c| text::is_icon_class(&c));

    if glyph_only || icon_child || (visible.is_empty() && own_icon_class) {
        out.push(
            Diagnostic::new(
                id::ARIA_LABEL_ICON_ONLY,
                tag.span(),
                Severity::Error,
                format!(
                    "Icon-only <{}> has no accessible text; add aria-label, aria-labelledby, or a title",
                    tag_name
                ),
            )
            .with_fix(Fix::add_attribute("aria-label", "")),
        );
    }
}

fn contains_icon_element(inner: &str) -> bool {
    text::tags(inner).any(|t| {
        !t.is_closing() && t.attr("class").is_some_and(|c| text::is_icon_class(&c))
    })
}
