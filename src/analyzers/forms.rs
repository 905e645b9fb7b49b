// SPDX-License-Identifier: PMPL-1.0-or-later
//! Form labeling analyzer.
//!
//! Checks that every form control has an accessible label (explicit
//! `<label for>`, implicit nesting, ARIA labeling, or title), that related
//! radio/checkbox groups are enclosed in a fieldset with a legend, and that
//! placeholders are not used as the only labeling mechanism.

use crate::analyzers::Analyzer;
use crate::context::DocumentContext;
use crate::diagnostic::{Diagnostic, Fix, Severity, Span};
use crate::rules::{id, AnalysisOptions};
use crate::text::{self, Tag};

/// Form labeling analyzer
pub struct FormAnalyzer;

/// Input types that label themselves
const SELF_LABELING_TYPES: &[&str] = &["submit", "reset", "button", "hidden"];

/// Checkbox clusters within this many bytes count as one group
const CHECKBOX_CLUSTER_WINDOW: usize = 500;

/// Minimum checkboxes before a fieldset is expected
const CHECKBOX_CLUSTER_MIN: usize = 3;

/// Placeholder values at least this long are treated as label substitutes
const SUBSTANTIAL_PLACEHOLDER_CHARS: usize = 4;

#[derive(Debug)]
struct Control<'a> {
    tag: Tag<'a>,
    kind: String,
    input_type: String,
}

impl Analyzer for FormAnalyzer {
    fn name(&self) -> &str {
        "Form Labeling"
    }

    fn description(&self) -> &str {
        "Checks form control labels, fieldset grouping, and placeholder misuse"
    }

    fn rule_ids(&self) -> &[&str] {
        &[
            id::FORM_LABEL_MISSING,
            id::FORM_RADIO_NO_FIELDSET,
            id::FORM_CHECKBOX_NO_FIELDSET,
            id::FORM_LEGEND_MISSING,
            id::FORM_LEGEND_EMPTY,
            id::FORM_LEGEND_NOT_FIRST,
            id::FORM_PLACEHOLDER_ONLY,
        ]
    }

    fn analyze(&self, text: &str, ctx: &DocumentContext, _opts: &AnalysisOptions) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        let label_spans = collect_label_spans(text);
        let fieldset_spans = collect_fieldset_spans(text);
        let controls = collect_controls(text);

        for control in &controls {
            check_labeling(ctx, control, &label_spans, &mut diagnostics);
        }
        check_radio_groups(&controls, &fieldset_spans, &mut diagnostics);
        check_checkbox_clusters(&controls, &fieldset_spans, &mut diagnostics);
        check_fieldset_legends(text, &mut diagnostics);

        diagnostics
    }
}

/// Content spans of every `<label>` element, for implicit-nesting checks.
fn collect_label_spans(text: &str) -> Vec<Span> {
    text::tags(text)
        .filter(|t| !t.is_closing() && t.name().as_deref() == Some("label"))
        .map(|t| text::element_content_span(text, t.start))
        .collect()
}

/// Content spans of every `<fieldset>` element.
fn collect_fieldset_spans(text: &str) -> Vec<Span> {
    text::tags(text)
        .filter(|t| !t.is_closing() && t.name().as_deref() == Some("fieldset"))
        .map(|t| text::element_content_span(text, t.start))
        .collect()
}

fn collect_controls(text: &str) -> Vec<Control<'_>> {
    let mut controls = Vec::new();
    for tag in text::tags(text) {
        if tag.is_closing() {
            continue;
        }
        let Some(name) = tag.name() else { continue };
        if !is_form_control(&name) {
            continue;
        }
        let input_type = tag.attr("type").unwrap_or_default().to_lowercase();
        if SELF_LABELING_TYPES.contains(&input_type.as_str()) {
            continue;
        }
        controls.push(Control { tag, kind: name, input_type });
    }
    controls
}

/// Plain HTML form controls plus template-engine equivalents such as
/// `<f:form.textfield>`.
fn is_form_control(name: &str) -> bool {
    if matches!(name, "input" | "textarea" | "select") {
        return true;
    }
    match name.rsplit_once([':', '.']) {
        Some((_, local)) => matches!(
            local,
            "input" | "textfield" | "textarea" | "select" | "checkbox" | "radio" | "upload"
        ),
        None => false,
    }
}

fn check_labeling(
    ctx: &DocumentContext,
    control: &Control<'_>,
    label_spans: &[Span],
    out: &mut Vec<Diagnostic>,
) {
    let tag = &control.tag;

    let explicit = tag
        .attr("id")
        .is_some_and(|control_id| ctx.label_text_for(control_id.trim()).is_some());
    let implicit = label_spans.iter().any(|s| s.contains(tag.start));
    let aria = tag.has_attr("aria-label") || tag.has_attr("aria-labelledby");
    let titled = tag.attr("title").is_some_and(|t| !t.trim().is_empty());

    if explicit || implicit || aria || titled {
        return;
    }

    let placeholder = tag.attr("placeholder").unwrap_or_default();
    let placeholder = placeholder.trim();
    if placeholder.chars().count() >= SUBSTANTIAL_PLACEHOLDER_CHARS
        && !is_format_hint(placeholder)
    {
        out.push(Diagnostic::new(
            id::FORM_PLACEHOLDER_ONLY,
            tag.span(),
            Severity::Warning,
            format!(
                "<{}> is labeled only by its placeholder \"{}\"; placeholders disappear while typing, add a real label",
                control.kind, placeholder
            ),
        ));
        return;
    }

    let described = if control.input_type.is_empty() {
        control.kind.clone()
    } else {
        format!("{} type=\"{}\"", control.kind, control.input_type)
    };
    out.push(
        Diagnostic::new(
            id::FORM_LABEL_MISSING,
            tag.span(),
            Severity::Error,
            format!(
                "<{}> has no associated label; add a <label for>, aria-label, or aria-labelledby",
                described
            ),
        )
        .with_fix(Fix::add_child_element("label", "")),
    );
}

/// Placeholder text that demonstrates a format rather than naming the field.
fn is_format_hint(placeholder: &str) -> bool {
    let lower = placeholder.to_lowercase();
    lower.starts_with("e.g.")
        || lower.starts_with("z.b.")
        || lower.starts_with("ex:")
        || lower.contains('@')
        || lower.contains("yyyy")
        || lower.contains("dd")
        || lower.contains("mm")
        || lower.contains("format")
}

fn check_radio_groups(controls: &[Control<'_>], fieldsets: &[Span], out: &mut Vec<Diagnostic>) {
    let mut groups: Vec<(String, Vec<&Control<'_>>)> = Vec::new();
    for control in controls {
        if control.input_type != "radio" {
            continue;
        }
        let Some(group_name) = control.tag.attr("name") else { continue };
        match groups.iter_mut().find(|(n, _)| *n == group_name) {
            Some((_, members)) => members.push(control),
            None => groups.push((group_name, vec![control])),
        }
    }

    for (group_name, members) in groups {
        if members.len() < 2 {
            continue;
        }
        let enclosed = members
            .iter()
            .all(|c| fieldsets.iter().any(|f| f.contains(c.tag.start)));
        if !enclosed {
            out.push(Diagnostic::new(
                id::FORM_RADIO_NO_FIELDSET,
                members[0].tag.span(),
                Severity::Error,
                format!(
                    "Radio group \"{}\" ({} options) is not enclosed in a <fieldset> with a <legend>",
                    group_name,
                    members.len()
                ),
            ));
        }
    }
}

fn check_checkbox_clusters(
    controls: &[Control<'_>],
    fieldsets: &[Span],
    out: &mut Vec<Diagnostic>,
) {
    let checkboxes: Vec<&Control<'_>> = controls
        .iter()
        .filter(|c| c.input_type == "checkbox")
        .collect();

    let mut cluster_start = 0;
    let mut i = 0;
    while i < checkboxes.len() {
        let end_of_cluster = i + 1 == checkboxes.len()
            || checkboxes[i + 1].tag.start - checkboxes[i].tag.start > CHECKBOX_CLUSTER_WINDOW;
        if end_of_cluster {
            let cluster = &checkboxes[cluster_start..=i];
            if cluster.len() >= CHECKBOX_CLUSTER_MIN {
                let enclosed = cluster
                    .iter()
                    .all(|c| fieldsets.iter().any(|f| f.contains(c.tag.start)));
                if !enclosed {
                    out.push(Diagnostic::new(
                        id::FORM_CHECKBOX_NO_FIELDSET,
                        cluster[0].tag.span(),
                        Severity::Warning,
                        format!(
                            "{} related checkboxes without a grouping <fieldset>; group them with a <legend>",
                            cluster.len()
                        ),
                    ));
                }
            }
            cluster_start = i + 1;
        }
        i += 1;
    }
}

fn check_fieldset_legends(text: &str, out: &mut Vec<Diagnostic>) {
    for tag in text::tags(text) {
        if tag.is_closing() || tag.name().as_deref() != Some("fieldset") {
            continue;
        }
        let content = text::element_content_span(text, tag.start);

        let mut first_child_name: Option<String> = None;
        let mut legend: Option<Tag<'_>> = None;
        for inner in text::tags_from(text, content.start) {
            if inner.start >= content.end {
                break;
            }
            if inner.is_closing() {
                continue;
            }
            let Some(inner_name) = inner.name() else { continue };
            if first_child_name.is_none() {
                first_child_name = Some(inner_name.clone());
            }
            if inner_name == "legend" {
                legend = Some(inner);
                break;
            }
        }

        match legend {
            None => {
                out.push(
                    Diagnostic::new(
                        id::FORM_LEGEND_MISSING,
                        tag.span(),
                        Severity::Error,
                        "<fieldset> has no <legend>; the group has no announced name",
                    )
                    .with_fix(Fix::add_child_element_in("legend", "", "fieldset")),
                );
            }
            Some(legend_tag) => {
                let legend_content = text::element_content_span(text, legend_tag.start);
                let legend_text =
                    text::strip_tags(&text[legend_content.start..legend_content.end]);
                if legend_text.is_empty() {
                    out.push(Diagnostic::new(
                        id::FORM_LEGEND_EMPTY,
                        legend_tag.span(),
                        Severity::Error,
                        "Empty <legend>; the fieldset group has no announced name",
                    ));
                }
                if first_child_name.as_deref() != Some("legend") {
                    out.push(Diagnostic::new(
                        id::FORM_LEGEND_NOT_FIRST,
                        legend_tag.span(),
                        Severity::Warning,
                        "<legend> should be the first child of its <fieldset>",
                    ));
                }
            }
        }
    }
}
