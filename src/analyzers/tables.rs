// SPDX-License-Identifier: PMPL-1.0-or-later
//! Table structure analyzer.
//!
//! Classifies each table as layout, data, or ambiguous, then applies the
//! checks appropriate to the class: no semantic markup in layout tables,
//! headers/captions on data tables, and explicit header association on
//! complex tables.

use crate::analyzers::Analyzer;
use crate::context::DocumentContext;
use crate::diagnostic::{Diagnostic, Fix, Severity};
use crate::rules::{id, AnalysisOptions};
use crate::text::{self, Tag};

/// Table structure analyzer
pub struct TableAnalyzer;

/// Row/column thresholds beyond which a data table counts as complex
const COMPLEX_ROWS: usize = 5;
const COMPLEX_COLS: usize = 4;

/// Row threshold beyond which header association is mandatory
const ASSOCIATION_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableClass {
    Layout,
    Data,
    Ambiguous,
}

#[derive(Debug)]
struct TableInfo<'a> {
    tag: Tag<'a>,
    rows: usize,
    cols: usize,
    th_tags: Vec<Tag<'a>>,
    caption: Option<Tag<'a>>,
    first_child: Option<String>,
    has_spans: bool,
    has_headers_attr: bool,
    header_rows: usize,
    total_cells: usize,
    numeric_cells: usize,
}

impl Analyzer for TableAnalyzer {
    fn name(&self) -> &str {
        "Table Structure"
    }

    fn description(&self) -> &str {
        "Classifies tables and checks headers, captions, and cell association"
    }

    fn rule_ids(&self) -> &[&str] {
        &[
            id::TABLE_LAYOUT_SEMANTICS,
            id::TABLE_HEADERS_MISSING,
            id::TABLE_CAPTION_MISSING,
            id::TABLE_SUMMARY_OBSOLETE,
            id::TABLE_CAPTION_EMPTY,
            id::TABLE_CAPTION_NOT_FIRST,
            id::TABLE_COMPLEX_ASSOCIATION,
            id::TABLE_DESCRIBEDBY_DANGLING,
        ]
    }

    fn analyze(&self, text: &str, ctx: &DocumentContext, _opts: &AnalysisOptions) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for tag in text::tags(text) {
            if tag.is_closing() || tag.name().as_deref() != Some("table") {
                continue;
            }
            let info = inspect_table(text, tag);
            check_table(text, ctx, &info, &mut diagnostics);
        }

        diagnostics
    }
}

fn inspect_table<'a>(text: &'a str, tag: Tag<'a>) -> TableInfo<'a> {
    let content = text::element_content_span(text, tag.start);

    let mut rows = 0;
    let mut cols = 0;
    let mut th_tags = Vec::new();
    let mut caption = None;
    let mut first_child = None;
    let mut has_spans = false;
    let mut has_headers_attr = false;
    let mut header_rows = 0;
    let mut total_cells = 0;
    let mut numeric_cells = 0;

    for inner in text::tags_from(text, content.start) {
        if inner.start >= content.end {
            break;
        }
        if inner.is_closing() {
            continue;
        }
        let Some(name) = inner.name() else { continue };

        if first_child.is_none() {
            first_child = Some(name.clone());
        }

        match name.as_str() {
            "tr" => {
                rows += 1;
                let row_content = text::element_content_span(text, inner.start);
                let mut row_cells = 0;
                let mut row_has_th = false;
                for cell in text::tags_from(text, row_content.start) {
                    if cell.start >= row_content.end {
                        break;
                    }
                    if cell.is_closing() {
                        continue;
                    }
                    match cell.name().as_deref() {
                        Some("td") => row_cells += 1,
                        Some("th") => {
                            row_cells += 1;
                            row_has_th = true;
                        }
                        _ => {}
                    }
                }
                cols = cols.max(row_cells);
                if row_has_th {
                    header_rows += 1;
                }
            }
            "th" => th_tags.push(inner),
            "td" => {
                let cell = text::element_content_span(text, inner.start);
                let cell_text = text::strip_tags(&text[cell.start..cell.end]);
                total_cells += 1;
                if is_numeric_cell(&cell_text) {
                    numeric_cells += 1;
                }
            }
            "caption" if caption.is_none() => caption = Some(inner),
            _ => {}
        }

        if matches!(name.as_str(), "td" | "th")
            && (inner.has_attr("rowspan") || inner.has_attr("colspan"))
        {
            has_spans = true;
        }
        if name == "td" && inner.has_attr("headers") {
            has_headers_attr = true;
        }
    }

    TableInfo {
        tag,
        rows,
        cols,
        th_tags,
        caption,
        first_child,
        has_spans,
        has_headers_attr,
        header_rows,
        total_cells,
        numeric_cells,
    }
}

/// Numbers, amounts, percentages: cell content that marks a data table.
fn is_numeric_cell(cell_text: &str) -> bool {
    let trimmed = cell_text.trim();
    !trimmed.is_empty()
        && trimmed.chars().any(|c| c.is_ascii_digit())
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '%' | '$' | '€' | '-' | '+' | ' '))
}

fn classify(info: &TableInfo<'_>) -> TableClass {
    let tag = &info.tag;
    let role = tag.attr("role").unwrap_or_default().to_lowercase();
    if role == "presentation" || role == "none" {
        return TableClass::Layout;
    }
    let class = tag.attr("class").unwrap_or_default().to_lowercase();
    if class.contains("layout") || class.contains("grid-layout") {
        return TableClass::Layout;
    }

    let data_like_content = info.total_cells >= 4 && info.numeric_cells * 2 > info.total_cells;
    if !info.th_tags.is_empty()
        || info.caption.is_some()
        || info.rows > COMPLEX_ROWS
        || info.cols > COMPLEX_COLS
        || data_like_content
    {
        return TableClass::Data;
    }
    TableClass::Ambiguous
}

fn is_complex(info: &TableInfo<'_>) -> bool {
    info.rows > COMPLEX_ROWS || info.cols > COMPLEX_COLS
}

fn check_table(
    text: &str,
    ctx: &DocumentContext,
    info: &TableInfo<'_>,
    out: &mut Vec<Diagnostic>,
) {
    let tag = &info.tag;

    if let Some(refs) = tag.attr("aria-describedby") {
        for id_ref in refs.split_whitespace() {
            if !ctx.has_id(id_ref) {
                out.push(Diagnostic::new(
                    id::TABLE_DESCRIBEDBY_DANGLING,
                    tag.span(),
                    Severity::Error,
                    format!("aria-describedby references non-existent id \"{}\"", id_ref),
                ));
            }
        }
    }

    match classify(info) {
        TableClass::Layout => check_layout_table(info, out),
        TableClass::Data => check_data_table(text, info, out),
        TableClass::Ambiguous => {}
    }
}

fn check_layout_table(info: &TableInfo<'_>, out: &mut Vec<Diagnostic>) {
    if !info.th_tags.is_empty() || info.caption.is_some() {
        out.push(
            Diagnostic::new(
                id::TABLE_LAYOUT_SEMANTICS,
                info.tag.span(),
                Severity::Warning,
                "Layout table contains <th> or <caption>; either make it a data table or drop the semantic markup (CSS layout avoids this entirely)",
            )
            .with_fix(Fix::change_tag_name("div")),
        );
    }
}

fn check_data_table(text: &str, info: &TableInfo<'_>, out: &mut Vec<Diagnostic>) {
    let tag = &info.tag;

    if info.rows > 1 && info.th_tags.is_empty() {
        out.push(Diagnostic::new(
            id::TABLE_HEADERS_MISSING,
            tag.span(),
            Severity::Error,
            format!(
                "Data table with {} rows has no <th> header cells",
                info.rows
            ),
        ));
    }

    let named = info.caption.is_some()
        || tag.has_attr("aria-label")
        || tag.has_attr("aria-labelledby");
    if is_complex(info) && !named {
        out.push(
            Diagnostic::new(
                id::TABLE_CAPTION_MISSING,
                tag.span(),
                Severity::Warning,
                format!(
                    "Complex table ({} rows, {} columns) has no <caption> or aria-label",
                    info.rows, info.cols
                ),
            )
            .with_fix(Fix::add_child_element_in("caption", "", "table")),
        );
    }

    if let Some(summary) = tag.attr("summary") {
        out.push(
            Diagnostic::new(
                id::TABLE_SUMMARY_OBSOLETE,
                tag.span(),
                Severity::Warning,
                "The summary attribute is obsolete; use a <caption> instead",
            )
            .with_fix(Fix::add_child_element_in("caption", &summary, "table")),
        );
    }

    if let Some(caption) = &info.caption {
        let caption_content = text::element_content_span(text, caption.start);
        let caption_text = text::strip_tags(&text[caption_content.start..caption_content.end]);
        if caption_text.is_empty() {
            out.push(Diagnostic::new(
                id::TABLE_CAPTION_EMPTY,
                caption.span(),
                Severity::Error,
                "Empty <caption> names nothing; add text or remove it",
            ));
        }
        if info.first_child.as_deref() != Some("caption") {
            out.push(Diagnostic::new(
                id::TABLE_CAPTION_NOT_FIRST,
                caption.span(),
                Severity::Warning,
                "<caption> must be the first child of <table>",
            ));
        }
    }

    check_association(info, out);
}

/// Complex tables need scope attributes or headers/id association.
fn check_association(info: &TableInfo<'_>, out: &mut Vec<Diagnostic>) {
    let complex =
        info.has_spans || info.rows > ASSOCIATION_ROWS || info.header_rows > 1;
    if !complex || info.th_tags.is_empty() {
        return;
    }

    let all_scoped = info.th_tags.iter().all(|t| t.has_attr("scope") || t.has_attr("id"));
    if info.has_spans && !all_scoped && !info.has_headers_attr {
        out.push(Diagnostic::new(
            id::TABLE_COMPLEX_ASSOCIATION,
            info.tag.span(),
            Severity::Error,
            "Table with spanning cells needs scope attributes on headers or headers/id associations on cells",
        ));
    } else if !info.has_spans && !all_scoped {
        out.push(Diagnostic::new(
            id::TABLE_COMPLEX_ASSOCIATION,
            info.tag.span(),
            Severity::Warning,
            "Complex table headers should carry scope=\"col\" or scope=\"row\"",
        ));
    }
}
