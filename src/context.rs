// SPDX-License-Identifier: PMPL-1.0-or-later
//! Per-file document context snapshot.
//!
//! Built by a single left-to-right scan before any analyzer runs, then
//! queried read-only. Containment queries are approximations: sectioning
//! and template-section queries are offset-prefix tests against recorded
//! opening positions, and class/role navigation hints cover only the
//! attribute-pattern match span. True containment would need full tag
//! matching on every query, which this crate avoids on large template
//! files.

use crate::text::{self, Tag};
use std::collections::HashMap;

/// Sectioning element kinds that establish a heading-hierarchy scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectioningKind {
    Section,
    Article,
    Aside,
    Nav,
    Main,
}

impl SectioningKind {
    fn from_tag_name(name: &str) -> Option<Self> {
        match name {
            "section" => Some(SectioningKind::Section),
            "article" => Some(SectioningKind::Article),
            "aside" => Some(SectioningKind::Aside),
            "nav" => Some(SectioningKind::Nav),
            "main" => Some(SectioningKind::Main),
            _ => None,
        }
    }
}

/// Keywords in `class`/`role` values that mark a navigation context.
const NAV_KEYWORDS: &[&str] = &["nav", "menu", "breadcrumb"];

/// Read-only snapshot of document structure, built once per analysis run.
#[derive(Debug, Default)]
pub struct DocumentContext {
    /// Sectioning elements as (open offset, end offset, kind), document order
    sectioning: Vec<(usize, usize, SectioningKind)>,
    /// Opening offsets and names of template sections (`<ns:section name="...">`)
    template_sections: Vec<(usize, String)>,
    /// Navigation spans: full element extent for `<nav>`, attribute-match
    /// span for class/role keyword matches
    navigation: Vec<(usize, usize)>,
    /// Declared id -> defining element's tag name, first occurrence wins
    ids: HashMap<String, String>,
    /// label[for] target id -> stripped label text
    label_for: HashMap<String, String>,
}

impl DocumentContext {
    /// Build the context with one pass over the tags of `text`.
    pub fn build(text: &str) -> Self {
        let mut ctx = DocumentContext::default();

        for tag in text::tags(text) {
            if tag.is_closing() {
                continue;
            }
            let Some(name) = tag.name() else { continue };

            if let Some(kind) = SectioningKind::from_tag_name(&name) {
                let end = text::find_element_end(text, tag.start);
                ctx.sectioning.push((tag.start, end, kind));
                if kind == SectioningKind::Nav {
                    ctx.navigation.push((tag.start, end));
                }
            }

            if is_template_section_tag(&name) {
                let section_name = tag
                    .attr("name")
                    .or_else(|| tag.attr("section"))
                    .unwrap_or_default();
                ctx.template_sections.push((tag.start, section_name));
            }

            if name != "nav" {
                if let Some(span) = navigation_hint_span(&tag) {
                    ctx.navigation.push(span);
                }
            }

            if let Some(id) = tag.attr("id") {
                let id = id.trim().to_string();
                if !id.is_empty() {
                    ctx.ids.entry(id).or_insert(name.clone());
                }
            }

            if name == "label" {
                if let Some(target) = tag.attr("for") {
                    let content = text::element_content_span(text, tag.start);
                    let label_text = text::strip_tags(&text[content.start..content.end]);
                    ctx.label_for.entry(target.trim().to_string()).or_insert(label_text);
                }
            }
        }

        ctx
    }

    /// Whether any sectioning element opens at or before `offset`.
    ///
    /// Prefix approximation: closing tags are not consulted.
    pub fn is_in_sectioning_element(&self, offset: usize) -> bool {
        self.sectioning.iter().any(|(open, _, _)| *open <= offset)
    }

    /// Whether `offset` falls within the extent of a non-main sectioning
    /// element. Range test, unlike [`Self::is_in_sectioning_element`].
    pub fn is_in_subsection(&self, offset: usize) -> bool {
        self.sectioning.iter().any(|(open, end, kind)| {
            *open <= offset && offset < *end && *kind != SectioningKind::Main
        })
    }

    /// Whether any template section opens at or before `offset`.
    pub fn is_in_template_section(&self, offset: usize) -> bool {
        self.template_sections.iter().any(|(open, _)| *open <= offset)
    }

    /// Whether `offset` falls inside a recorded navigation span.
    pub fn is_in_navigation_context(&self, offset: usize) -> bool {
        self.navigation.iter().any(|(start, end)| *start <= offset && offset < *end)
    }

    /// Tag name that declared `id`, if any.
    pub fn tag_name_for_id(&self, id: &str) -> Option<&str> {
        self.ids.get(id).map(String::as_str)
    }

    /// Whether `id` is declared anywhere in the document.
    pub fn has_id(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Stripped text of the `<label for=id>` targeting `id`, if any.
    pub fn label_text_for(&self, id: &str) -> Option<&str> {
        self.label_for.get(id).map(String::as_str)
    }

    /// All recorded sectioning elements, in document order.
    pub fn sectioning_elements(&self) -> &[(usize, usize, SectioningKind)] {
        &self.sectioning
    }

    /// All recorded template section openings, in document order.
    pub fn template_sections(&self) -> &[(usize, String)] {
        &self.template_sections
    }

    /// Whether the document declares any template sections at all.
    pub fn has_template_sections(&self) -> bool {
        !self.template_sections.is_empty()
    }
}

/// Template-engine section/layout/render markers: a namespaced tag such as
/// `<f:section>`, `<v:layout>`, `<f:render>`.
fn is_template_section_tag(name: &str) -> bool {
    match name.split_once(':') {
        Some((ns, local)) => {
            !ns.is_empty() && matches!(local, "section" | "layout" | "render")
        }
        None => false,
    }
}

/// Span of a navigation-indicating `class`/`role` attribute match, if any.
fn navigation_hint_span(tag: &Tag<'_>) -> Option<(usize, usize)> {
    let hinted = [tag.attr("class"), tag.attr("role")]
        .into_iter()
        .flatten()
        .any(|v| {
            let lower = v.to_lowercase();
            NAV_KEYWORDS.iter().any(|k| lower.contains(k))
        });
    // The attribute-pattern match span, not the full element span
    hinted.then(|| (tag.start, tag.end))
}
