// SPDX-License-Identifier: PMPL-1.0-or-later
//! Accessibility rule analyzers.
//!
//! Each analyzer is an independent unit: a pure function of the file text
//! and the shared [`DocumentContext`], producing span-anchored diagnostics.
//! Analyzers never fail the run; a panic inside one is caught, logged, and
//! its contribution skipped.

pub mod aria_label;
pub mod aria_role;
pub mod forms;
pub mod headings;
pub mod language;
pub mod links;
pub mod lists;
pub mod live_region;
pub mod skip_link;
pub mod tables;

use crate::context::DocumentContext;
use crate::diagnostic::Diagnostic;
use crate::rules::AnalysisOptions;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Trait implemented by all analyzers
pub trait Analyzer: Send + Sync {
    /// Human-readable name of this analyzer
    fn name(&self) -> &str;

    /// Short description of what this analyzer checks
    fn description(&self) -> &str;

    /// Rule ids this analyzer can emit
    fn rule_ids(&self) -> &[&str];

    /// Analyze one file's text against the pre-built context
    fn analyze(&self, text: &str, ctx: &DocumentContext, opts: &AnalysisOptions) -> Vec<Diagnostic>;
}

/// The full analyzer registry, in reporting order.
pub fn all_analyzers() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(aria_role::AriaRoleAnalyzer),
        Box::new(aria_label::AriaLabelAnalyzer),
        Box::new(headings::HeadingAnalyzer),
        Box::new(forms::FormAnalyzer),
        Box::new(tables::TableAnalyzer),
        Box::new(live_region::LiveRegionAnalyzer),
        Box::new(links::LinkAnalyzer),
        Box::new(lists::ListAnalyzer),
        Box::new(language::LanguageAnalyzer),
        Box::new(skip_link::SkipLinkAnalyzer),
    ]
}

/// Analyze one file's full text and return all enabled diagnostics.
///
/// The context is built once, before any analyzer runs. Analyzers run in
/// registry order; each is isolated so an unexpected panic in one cannot
/// suppress the findings of the others.
pub fn analyze_file(text: &str, opts: &AnalysisOptions) -> Vec<Diagnostic> {
    let ctx = DocumentContext::build(text);
    let mut diagnostics = Vec::new();

    for analyzer in all_analyzers() {
        if analyzer.rule_ids().iter().all(|r| !opts.rules.is_enabled(r)) {
            continue;
        }

        let result = catch_unwind(AssertUnwindSafe(|| analyzer.analyze(text, &ctx, opts)));
        match result {
            Ok(found) => diagnostics.extend(
                found
                    .into_iter()
                    .filter(|d| opts.rules.is_enabled(&d.rule_id))
                    .filter(|d| !opts.rules.is_superseded(&d.rule_id)),
            ),
            Err(_) => {
                warn!(analyzer = analyzer.name(), "analyzer panicked, skipping its findings");
            }
        }
    }

    diagnostics
}
