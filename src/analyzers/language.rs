// SPDX-License-Identifier: PMPL-1.0-or-later
//! Page language analyzer.
//!
//! Checks the root `lang` attribute, `xml:lang` consistency, per-element
//! language declarations, and whether the dominant script of the text
//! matches the declared language. Skipped entirely for layout/partial
//! fragments, where the root language belongs to the including page.

use crate::analyzers::Analyzer;
use crate::context::DocumentContext;
use crate::diagnostic::{Diagnostic, Fix, Severity};
use crate::rules::{id, AnalysisOptions, FileKind};
use crate::text::{self, Tag};

/// Page language analyzer
pub struct LanguageAnalyzer;

/// Expected script per language prefix, for the mismatch heuristic
const LANG_SCRIPTS: &[(&str, Script)] = &[
    ("ar", Script::Arabic),
    ("bg", Script::Cyrillic),
    ("de", Script::Latin),
    ("el", Script::Greek),
    ("en", Script::Latin),
    ("es", Script::Latin),
    ("fr", Script::Latin),
    ("he", Script::Hebrew),
    ("it", Script::Latin),
    ("ja", Script::Cjk),
    ("ko", Script::Hangul),
    ("nl", Script::Latin),
    ("pt", Script::Latin),
    ("ru", Script::Cyrillic),
    ("uk", Script::Cyrillic),
    ("zh", Script::Cjk),
];

/// Minimum letters before the script heuristic is meaningful
const SCRIPT_SAMPLE_MIN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Arabic,
    Cjk,
    Cyrillic,
    Greek,
    Hangul,
    Hebrew,
    Latin,
}

impl Analyzer for LanguageAnalyzer {
    fn name(&self) -> &str {
        "Page Language"
    }

    fn description(&self) -> &str {
        "Checks lang/xml:lang presence, shape, and script consistency"
    }

    fn rule_ids(&self) -> &[&str] {
        &[
            id::LANG_MISSING,
            id::LANG_INVALID,
            id::LANG_XML_MISMATCH,
            id::LANG_XML_ONLY,
            id::LANG_CHANGE,
            id::LANG_SCRIPT_MISMATCH,
        ]
    }

    fn analyze(&self, text: &str, _ctx: &DocumentContext, opts: &AnalysisOptions) -> Vec<Diagnostic> {
        if is_fragment(text, opts) {
            return Vec::new();
        }

        let mut diagnostics = Vec::new();
        let mut root_lang: Option<String> = None;

        for tag in text::tags(text) {
            if tag.is_closing() {
                continue;
            }
            let Some(name) = tag.name() else { continue };

            if name == "html" && root_lang.is_none() {
                root_lang = check_root(&tag, &mut diagnostics);
            } else {
                check_element_lang(&tag, &name, &mut diagnostics);
            }
            check_xml_lang(&tag, &name, &mut diagnostics);
        }

        if let Some(lang) = &root_lang {
            check_script_consistency(text, lang, &mut diagnostics);
        }

        diagnostics
    }
}

/// Layout/partial fragments skip this analyzer: path hint first, content
/// heuristics otherwise.
fn is_fragment(text: &str, opts: &AnalysisOptions) -> bool {
    match opts.file_kind {
        Some(FileKind::Fragment) => return true,
        Some(FileKind::Page) => return false,
        None => {}
    }

    // Without a document skeleton the root language belongs to whichever
    // page ends up including this markup
    let lower = text.to_lowercase();
    !(lower.contains("<!doctype") || lower.contains("<head"))
}

fn check_root(tag: &Tag<'_>, out: &mut Vec<Diagnostic>) -> Option<String> {
    match tag.attr("lang") {
        None => {
            out.push(
                Diagnostic::new(
                    id::LANG_MISSING,
                    tag.span(),
                    Severity::Error,
                    "The root <html> element has no lang attribute; screen readers cannot pick a voice",
                )
                .with_fix(Fix::add_attribute("lang", "en")),
            );
            None
        }
        Some(lang) if lang.trim().is_empty() => {
            out.push(Diagnostic::new(
                id::LANG_INVALID,
                tag.span(),
                Severity::Error,
                "Empty lang attribute on <html>",
            ));
            None
        }
        Some(lang) if !text::is_valid_bcp47_language_code(&lang) => {
            out.push(Diagnostic::new(
                id::LANG_INVALID,
                tag.span(),
                Severity::Error,
                format!("lang=\"{}\" is not a valid BCP 47 language tag", lang),
            ));
            None
        }
        Some(lang) => Some(lang.trim().to_string()),
    }
}

fn check_element_lang(tag: &Tag<'_>, name: &str, out: &mut Vec<Diagnostic>) {
    let Some(lang) = tag.attr("lang") else { return };

    if lang.trim().is_empty() {
        out.push(Diagnostic::new(
            id::LANG_INVALID,
            tag.span(),
            Severity::Error,
            format!("Empty lang attribute on <{}>", name),
        ));
    } else if !text::is_valid_bcp47_language_code(&lang) {
        out.push(Diagnostic::new(
            id::LANG_INVALID,
            tag.span(),
            Severity::Error,
            format!("lang=\"{}\" on <{}> is not a valid BCP 47 language tag", lang, name),
        ));
    } else {
        // Language changes marked in markup are good practice (WCAG 3.1.2)
        out.push(Diagnostic::new(
            id::LANG_CHANGE,
            tag.span(),
            Severity::Info,
            format!("Language change to \"{}\" marked on <{}>", lang.trim(), name),
        ));
    }
}

fn check_xml_lang(tag: &Tag<'_>, name: &str, out: &mut Vec<Diagnostic>) {
    let Some(xml_lang) = tag.attr("xml:lang") else { return };

    match tag.attr("lang") {
        Some(lang) if !lang.trim().eq_ignore_ascii_case(xml_lang.trim()) => {
            out.push(Diagnostic::new(
                id::LANG_XML_MISMATCH,
                tag.span(),
                Severity::Warning,
                format!(
                    "xml:lang=\"{}\" disagrees with lang=\"{}\" on <{}>",
                    xml_lang, lang, name
                ),
            ));
        }
        Some(_) => {}
        None => {
            out.push(
                Diagnostic::new(
                    id::LANG_XML_ONLY,
                    tag.span(),
                    Severity::Warning,
                    format!(
                        "<{}> has xml:lang but no lang; HTML user agents only honor lang",
                        name
                    ),
                )
                .with_fix(Fix::add_attribute("lang", xml_lang.trim())),
            );
        }
    }
}

/// Declared language vs. the dominant script of the visible text.
fn check_script_consistency(text: &str, root_lang: &str, out: &mut Vec<Diagnostic>) {
    let prefix = root_lang
        .split('-')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    let Some((_, expected)) = LANG_SCRIPTS.iter().find(|(l, _)| *l == prefix) else {
        return;
    };

    let visible = text::strip_tags(text);
    let letters: Vec<Script> = visible.chars().filter_map(classify_char).collect();
    if letters.len() < SCRIPT_SAMPLE_MIN {
        return;
    }

    let matching = letters.iter().filter(|s| *s == expected).count();
    if matching * 2 < letters.len() {
        out.push(Diagnostic::new(
            id::LANG_SCRIPT_MISMATCH,
            crate::diagnostic::Span::new(0, 0),
            Severity::Warning,
            format!(
                "Declared language \"{}\" does not match the dominant script of the page text",
                root_lang
            ),
        ));
    }
}

fn classify_char(c: char) -> Option<Script> {
    let cp = c as u32;
    match cp {
        0x0041..=0x024F if c.is_alphabetic() => Some(Script::Latin),
        0x0370..=0x03FF => Some(Script::Greek),
        0x0400..=0x04FF => Some(Script::Cyrillic),
        0x0590..=0x05FF => Some(Script::Hebrew),
        0x0600..=0x06FF => Some(Script::Arabic),
        0x3040..=0x30FF | 0x4E00..=0x9FFF => Some(Script::Cjk),
        0xAC00..=0xD7AF => Some(Script::Hangul),
        _ => None,
    }
}
