// SPDX-License-Identifier: PMPL-1.0-or-later
//! ARIA role and attribute analyzer.
//!
//! Validates explicit `role` attributes against the ARIA role taxonomy:
//! - abstract roles must not be used directly
//! - unknown roles are invalid
//! - roles with required properties/states must carry them
//! - explicit roles that repeat or contradict the tag's implicit role
//! - `role="presentation"` must not erase semantic elements
//! - `aria-hidden="true"` must not be combined with interactivity
//! - unknown `aria-*` attribute names

use crate::analyzers::Analyzer;
use crate::context::DocumentContext;
use crate::diagnostic::{Diagnostic, Fix, Severity};
use crate::rules::{id, AnalysisOptions};
use crate::text::{self, Tag};
use regex::Regex;
use std::sync::LazyLock;

/// ARIA role and attribute analyzer
pub struct AriaRoleAnalyzer;

/// Abstract roles: part of the taxonomy, never valid in markup
const ABSTRACT_ROLES: &[&str] = &[
    "command", "composite", "input", "landmark", "range", "roletype", "section",
    "sectionhead", "select", "structure", "widget", "window",
];

/// Concrete ARIA roles
const VALID_ROLES: &[&str] = &[
    "alert", "alertdialog", "application", "article", "banner", "blockquote", "button",
    "caption", "cell", "checkbox", "code", "columnheader", "combobox", "complementary",
    "contentinfo", "definition", "deletion", "dialog", "directory", "document", "emphasis",
    "feed", "figure", "form", "generic", "grid", "gridcell", "group", "heading", "img",
    "insertion", "link", "list", "listbox", "listitem", "log", "main", "marquee", "math",
    "menu", "menubar", "menuitem", "menuitemcheckbox", "menuitemradio", "meter",
    "navigation", "none", "note", "option", "paragraph", "presentation", "progressbar",
    "radio", "radiogroup", "region", "row", "rowgroup", "rowheader", "scrollbar", "search",
    "searchbox", "separator", "slider", "spinbutton", "status", "strong", "subscript",
    "superscript", "switch", "tab", "table", "tablist", "tabpanel", "term", "textbox",
    "time", "timer", "toolbar", "tooltip", "tree", "treegrid", "treeitem",
];

/// Roles that require specific ARIA properties
const REQUIRED_PROPS: &[(&str, &[&str])] = &[
    ("checkbox", &["aria-checked"]),
    ("combobox", &["aria-expanded"]),
    ("heading", &["aria-level"]),
    ("meter", &["aria-valuenow"]),
    ("option", &["aria-selected"]),
    ("radio", &["aria-checked"]),
    ("scrollbar", &["aria-controls", "aria-valuenow"]),
    ("slider", &["aria-valuenow", "aria-valuemin", "aria-valuemax"]),
    ("spinbutton", &["aria-valuenow"]),
    ("switch", &["aria-checked"]),
];

/// Roles that require at least one of a set of naming attributes
const REQUIRED_NAME: &[(&str, &[&str])] = &[
    ("alertdialog", &["aria-labelledby", "aria-label"]),
    ("dialog", &["aria-labelledby", "aria-label"]),
    ("radiogroup", &["aria-labelledby", "aria-label"]),
    ("region", &["aria-labelledby", "aria-label"]),
];

/// Implicit roles of plain HTML tags
const IMPLICIT_ROLES: &[(&str, &str)] = &[
    ("a", "link"),
    ("article", "article"),
    ("aside", "complementary"),
    ("button", "button"),
    ("dialog", "dialog"),
    ("footer", "contentinfo"),
    ("form", "form"),
    ("h1", "heading"),
    ("h2", "heading"),
    ("h3", "heading"),
    ("h4", "heading"),
    ("h5", "heading"),
    ("h6", "heading"),
    ("header", "banner"),
    ("hr", "separator"),
    ("img", "img"),
    ("li", "listitem"),
    ("main", "main"),
    ("nav", "navigation"),
    ("ol", "list"),
    ("option", "option"),
    ("output", "status"),
    ("progress", "progressbar"),
    ("section", "region"),
    ("select", "listbox"),
    ("summary", "button"),
    ("table", "table"),
    ("td", "cell"),
    ("textarea", "textbox"),
    ("th", "columnheader"),
    ("tr", "row"),
    ("ul", "list"),
];

/// Explicit roles that contradict a tag's implicit role
const CONFLICTING_ROLES: &[(&str, &[&str])] = &[
    ("button", &["link", "heading", "list", "listitem"]),
    ("columnheader", &["button", "link"]),
    ("heading", &["button", "link", "list"]),
    ("link", &["button", "heading", "list"]),
    ("list", &["button", "link", "table"]),
    ("listitem", &["button", "link"]),
    ("table", &["list", "button"]),
];

/// Natively interactive tags
const INTERACTIVE_TAGS: &[&str] =
    &["a", "button", "input", "select", "textarea", "details", "summary"];

/// Roles implying interactivity
const INTERACTIVE_ROLES: &[&str] = &[
    "button", "checkbox", "combobox", "link", "listbox", "menuitem", "menuitemcheckbox",
    "menuitemradio", "option", "radio", "scrollbar", "searchbox", "slider", "spinbutton",
    "switch", "tab", "textbox",
];

/// Semantic tags that `role="presentation"` would strip of meaning
const SEMANTIC_TAGS: &[&str] = &[
    "a", "article", "aside", "button", "caption", "fieldset", "figure", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "label", "legend", "li", "main", "nav",
    "ol", "section", "table", "td", "th", "ul",
];

/// Known aria-* attribute names
const VALID_ARIA_ATTRS: &[&str] = &[
    "aria-activedescendant", "aria-atomic", "aria-autocomplete", "aria-braillelabel",
    "aria-brailleroledescription", "aria-busy", "aria-checked", "aria-colcount",
    "aria-colindex", "aria-colspan", "aria-controls", "aria-current", "aria-describedby",
    "aria-description", "aria-details", "aria-disabled", "aria-dropeffect",
    "aria-errormessage", "aria-expanded", "aria-flowto", "aria-grabbed", "aria-haspopup",
    "aria-hidden", "aria-invalid", "aria-keyshortcuts", "aria-label", "aria-labelledby",
    "aria-level", "aria-live", "aria-modal", "aria-multiline", "aria-multiselectable",
    "aria-orientation", "aria-owns", "aria-placeholder", "aria-posinset", "aria-pressed",
    "aria-readonly", "aria-relevant", "aria-required", "aria-roledescription",
    "aria-rowcount", "aria-rowindex", "aria-rowspan", "aria-selected", "aria-setsize",
    "aria-sort", "aria-valuemax", "aria-valuemin", "aria-valuenow", "aria-valuetext",
];

static ARIA_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)aria-[a-z]+(?:-[a-z]+)*").expect("valid regex"));

impl Analyzer for AriaRoleAnalyzer {
    fn name(&self) -> &str {
        "ARIA Role & Attribute"
    }

    fn description(&self) -> &str {
        "Validates ARIA roles, required properties, and attribute names"
    }

    fn rule_ids(&self) -> &[&str] {
        &[
            id::ARIA_ROLE_MULTIPLE,
            id::ARIA_ROLE_ABSTRACT,
            id::ARIA_ROLE_INVALID,
            id::ARIA_ROLE_REQUIRED_ATTR,
            id::ARIA_ROLE_REQUIRED_NAME,
            id::ARIA_ROLE_REDUNDANT,
            id::ARIA_ROLE_CONFLICT,
            id::ARIA_ROLE_PRESENTATION_SEMANTIC,
            id::ARIA_HIDDEN_INTERACTIVE,
            id::ARIA_ATTR_INVALID,
        ]
    }

    fn analyze(&self, text: &str, _ctx: &DocumentContext, _opts: &AnalysisOptions) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for tag in text::tags(text) {
            if tag.is_closing() {
                continue;
            }
            let Some(name) = tag.name() else { continue };

            if let Some(role) = tag.attr("role") {
                check_role(text, &tag, &name, &role, &mut diagnostics);
            }
            check_aria_hidden(&tag, &name, &mut diagnostics);
            check_aria_attr_names(&tag, &mut diagnostics);
        }

        diagnostics
    }
}

fn check_role(text: &str, tag: &Tag<'_>, tag_name: &str, raw_role: &str, out: &mut Vec<Diagnostic>) {
    let normalized = raw_role.trim().to_lowercase();
    if normalized.is_empty() {
        out.push(Diagnostic::new(
            id::ARIA_ROLE_INVALID,
            tag.span(),
            Severity::Error,
            format!("Empty role attribute on <{}>", tag_name),
        ));
        return;
    }

    // Only the first token is considered when several are given
    let role = match normalized.split_whitespace().next() {
        Some(first) if normalized.contains(char::is_whitespace) => {
            out.push(Diagnostic::new(
                id::ARIA_ROLE_MULTIPLE,
                tag.span(),
                Severity::Warning,
                format!(
                    "Multiple roles \"{}\" are not allowed; only the first (\"{}\") takes effect",
                    normalized, first
                ),
            ));
            first
        }
        _ => normalized.as_str(),
    };

    if ABSTRACT_ROLES.contains(&role) {
        out.push(Diagnostic::new(
            id::ARIA_ROLE_ABSTRACT,
            tag.span(),
            Severity::Error,
            format!("Abstract role \"{}\" must not be used directly in markup", role),
        ));
    } else if !VALID_ROLES.contains(&role) {
        out.push(Diagnostic::new(
            id::ARIA_ROLE_INVALID,
            tag.span(),
            Severity::Error,
            format!("\"{}\" is not a valid ARIA role", role),
        ));
    } else {
        check_required_props(tag, role, out);
        check_required_name(tag, role, out);
    }

    check_implicit_role(tag, tag_name, role, out);
    if role == "presentation" || role == "none" {
        check_presentation_on_semantic(text, tag, tag_name, role, out);
    }
}

fn check_required_props(tag: &Tag<'_>, role: &str, out: &mut Vec<Diagnostic>) {
    let Some((_, props)) = REQUIRED_PROPS.iter().find(|(r, _)| *r == role) else {
        return;
    };
    for prop in *props {
        if !tag.has_attr(prop) {
            out.push(
                Diagnostic::new(
                    id::ARIA_ROLE_REQUIRED_ATTR,
                    tag.span(),
                    Severity::Error,
                    format!("Role \"{}\" requires the {} attribute", role, prop),
                )
                .with_fix(Fix::add_attribute(prop, "")),
            );
        }
    }
}

fn check_required_name(tag: &Tag<'_>, role: &str, out: &mut Vec<Diagnostic>) {
    let Some((_, alternatives)) = REQUIRED_NAME.iter().find(|(r, _)| *r == role) else {
        return;
    };
    if alternatives.iter().any(|a| tag.has_attr(a)) {
        return;
    }
    out.push(Diagnostic::new(
        id::ARIA_ROLE_REQUIRED_NAME,
        tag.span(),
        Severity::Error,
        format!(
            "Role \"{}\" requires an accessible name via one of: {}",
            role,
            alternatives.join(", ")
        ),
    ));
}

fn check_implicit_role(tag: &Tag<'_>, tag_name: &str, role: &str, out: &mut Vec<Diagnostic>) {
    let Some((_, implicit)) = IMPLICIT_ROLES.iter().find(|(t, _)| *t == tag_name) else {
        return;
    };

    if role == *implicit {
        out.push(
            Diagnostic::new(
                id::ARIA_ROLE_REDUNDANT,
                tag.span(),
                Severity::Warning,
                format!(
                    "Redundant role=\"{}\" on <{}>; the element already has this implicit role",
                    role, tag_name
                ),
            )
            .with_fix(Fix::remove_attribute("role")),
        );
        return;
    }

    let conflicts = CONFLICTING_ROLES
        .iter()
        .find(|(imp, _)| imp == implicit)
        .is_some_and(|(_, set)| set.contains(&role));
    if conflicts {
        out.push(Diagnostic::new(
            id::ARIA_ROLE_CONFLICT,
            tag.span(),
            Severity::Error,
            format!(
                "role=\"{}\" conflicts with the implicit \"{}\" role of <{}>",
                role, implicit, tag_name
            ),
        ));
    }
}

/// `role="presentation"` on (or directly around) a semantic element strips
/// its semantics from assistive technology.
fn check_presentation_on_semantic(
    text: &str,
    tag: &Tag<'_>,
    tag_name: &str,
    role: &str,
    out: &mut Vec<Diagnostic>,
) {
    let offending = if SEMANTIC_TAGS.contains(&tag_name) {
        Some(tag_name.to_string())
    } else {
        let content = text::element_content_span(text, tag.start);
        text::tags_from(text, content.start)
            .take_while(|t| t.start < content.end)
            .filter(|t| !t.is_closing())
            .filter_map(|t| t.name())
            .find(|n| SEMANTIC_TAGS.contains(&n.as_str()))
    };

    if let Some(inner) = offending {
        out.push(
            Diagnostic::new(
                id::ARIA_ROLE_PRESENTATION_SEMANTIC,
                tag.span(),
                Severity::Warning,
                format!(
                    "role=\"{}\" on semantic element <{}> removes accessibility information",
                    role, inner
                ),
            )
            .with_fix(Fix::remove_attribute("role")),
        );
    }
}

fn check_aria_hidden(tag: &Tag<'_>, tag_name: &str, out: &mut Vec<Diagnostic>) {
    if tag.attr("aria-hidden").as_deref() != Some("true") {
        return;
    }

    let tabindex_focusable = tag
        .attr("tabindex")
        .and_then(|v| v.trim().parse::<i32>().ok())
        .is_some_and(|v| v >= 0);
    let interactive_role = tag.attr("role").is_some_and(|r| {
        r.to_lowercase()
            .split_whitespace()
            .next()
            .is_some_and(|first| INTERACTIVE_ROLES.contains(&first))
    });

    if INTERACTIVE_TAGS.contains(&tag_name) || tabindex_focusable || interactive_role {
        out.push(
            Diagnostic::new(
                id::ARIA_HIDDEN_INTERACTIVE,
                tag.span(),
                Severity::Error,
                format!(
                    "aria-hidden=\"true\" on interactive <{}>; the element stays focusable but is invisible to screen readers",
                    tag_name
                ),
            )
            .with_fix(Fix::remove_attribute("aria-hidden")),
        );
    }
}

fn check_aria_attr_names(tag: &Tag<'_>, out: &mut Vec<Diagnostic>) {
    // Quoted values are blanked out first so attribute names mentioned in
    // prose ("aria-bogus" inside a title) are not mistaken for attributes.
    let masked = mask_quoted_values(tag.raw);
    let bytes = masked.as_bytes();

    for m in ARIA_ATTR_RE.find_iter(&masked) {
        let attr = m.as_str().to_lowercase();
        let before_ok = m.start() > 0 && bytes[m.start() - 1].is_ascii_whitespace();
        let after_ok = match bytes.get(m.end()) {
            None | Some(b'=') | Some(b'>') | Some(b'/') => true,
            Some(c) => c.is_ascii_whitespace(),
        };
        if !(before_ok && after_ok) {
            continue;
        }
        if !VALID_ARIA_ATTRS.contains(&attr.as_str()) {
            out.push(
                Diagnostic::new(
                    id::ARIA_ATTR_INVALID,
                    tag.span(),
                    Severity::Error,
                    format!("\"{}\" is not a valid ARIA attribute", attr),
                )
                .with_fix(Fix::remove_attribute(&attr)),
            );
        }
    }
}

/// Replace the contents of quoted attribute values with spaces, keeping
/// offsets stable.
fn mask_quoted_values(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut quote: Option<char> = None;
    for c in raw.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                out.push(c);
            }
            Some(_) => out.push(if c.is_ascii() { ' ' } else { c }),
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::AnalysisOptions;

    fn run(html: &str) -> Vec<Diagnostic> {
        let ctx = DocumentContext::build(html);
        AriaRoleAnalyzer.analyze(html, &ctx, &AnalysisOptions::new())
    }

    fn rule_count(diags: &[Diagnostic], rule: &str) -> usize {
        diags.iter().filter(|d| d.rule_id == rule).count()
    }

    #[test]
    fn test_valid_role_no_findings() {
        let diags = run(r#"<div role="dialog" aria-label="Settings">x</div>"#);
        assert!(diags.is_empty(), "unexpected: {:?}", diags);
    }

    #[test]
    fn test_abstract_role() {
        let diags = run(r#"<div role="widget">x</div>"#);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_ABSTRACT), 1);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_INVALID), 0);
    }

    #[test]
    fn test_invalid_role() {
        let diags = run(r#"<div role="bogus">x</div>"#);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_INVALID), 1);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_ABSTRACT), 0);
    }

    #[test]
    fn test_multiple_roles_first_wins() {
        let diags = run(r#"<div role="button link">x</div>"#);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_MULTIPLE), 1);
        // "button" is valid, so no invalid-role diagnostic
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_INVALID), 0);
    }

    #[test]
    fn test_required_props_slider() {
        let diags = run(r#"<div role="slider" aria-valuenow="5">x</div>"#);
        // aria-valuemin and aria-valuemax still missing
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_REQUIRED_ATTR), 2);
    }

    #[test]
    fn test_required_name_dialog() {
        let diags = run(r#"<div role="dialog">x</div>"#);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_REQUIRED_NAME), 1);

        let diags = run(r#"<div role="dialog" aria-labelledby="t">x</div>"#);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_REQUIRED_NAME), 0);
    }

    #[test]
    fn test_redundant_role_on_button() {
        let diags = run(r#"<button role="button">Go</button>"#);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_REDUNDANT), 1);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_INVALID), 0);
        assert_eq!(
            diags[0].fix,
            Some(Fix::remove_attribute("role"))
        );
    }

    #[test]
    fn test_conflicting_role() {
        let diags = run(r#"<button role="link">Go</button>"#);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_CONFLICT), 1);
    }

    #[test]
    fn test_presentation_on_semantic_child() {
        let diags = run(r#"<div role="presentation"><h1>Title</h1></div>"#);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_PRESENTATION_SEMANTIC), 1);
        assert!(diags[0].message.contains("<h1>"));
    }

    #[test]
    fn test_presentation_on_plain_div_ok() {
        let diags = run(r#"<div role="presentation"><span>decoration</span></div>"#);
        assert_eq!(rule_count(&diags, id::ARIA_ROLE_PRESENTATION_SEMANTIC), 0);
    }

    #[test]
    fn test_aria_hidden_on_button() {
        let diags = run(r#"<button aria-hidden="true">Click</button>"#);
        assert_eq!(rule_count(&diags, id::ARIA_HIDDEN_INTERACTIVE), 1);
        assert_eq!(diags[0].severity, Severity::Error);
    }

    #[test]
    fn test_aria_hidden_tabindex() {
        let diags = run(r#"<div aria-hidden="true" tabindex="0">x</div>"#);
        assert_eq!(rule_count(&diags, id::ARIA_HIDDEN_INTERACTIVE), 1);

        let diags = run(r#"<div aria-hidden="true" tabindex="-1">x</div>"#);
        assert_eq!(rule_count(&diags, id::ARIA_HIDDEN_INTERACTIVE), 0);
    }

    #[test]
    fn test_invalid_aria_attr() {
        let diags = run(r#"<div aria-lable="oops">x</div>"#);
        assert_eq!(rule_count(&diags, id::ARIA_ATTR_INVALID), 1);
        assert!(diags[0].message.contains("aria-lable"));
    }

    #[test]
    fn test_aria_attr_in_value_not_flagged() {
        let diags = run(r#"<div title="mentions aria-bogus in text">x</div>"#);
        assert_eq!(rule_count(&diags, id::ARIA_ATTR_INVALID), 0);
    }
}
