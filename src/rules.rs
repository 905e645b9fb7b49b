// SPDX-License-Identifier: PMPL-1.0-or-later
//! Rule inventory and per-run analysis configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Rule identifiers, grouped by analyzer.
pub mod id {
    // ARIA role & attribute
    pub const ARIA_ROLE_MULTIPLE: &str = "aria-role-multiple";
    pub const ARIA_ROLE_ABSTRACT: &str = "aria-role-abstract";
    pub const ARIA_ROLE_INVALID: &str = "aria-role-invalid";
    pub const ARIA_ROLE_REQUIRED_ATTR: &str = "aria-role-required-attr";
    pub const ARIA_ROLE_REQUIRED_NAME: &str = "aria-role-required-name";
    pub const ARIA_ROLE_REDUNDANT: &str = "aria-role-redundant";
    pub const ARIA_ROLE_CONFLICT: &str = "aria-role-conflict";
    pub const ARIA_ROLE_PRESENTATION_SEMANTIC: &str = "aria-role-presentation-semantic";
    pub const ARIA_HIDDEN_INTERACTIVE: &str = "aria-hidden-interactive";
    pub const ARIA_ATTR_INVALID: &str = "aria-attr-invalid";

    // ARIA labeling
    pub const ARIA_LABEL_CONFLICT: &str = "aria-label-conflict";
    pub const ARIA_LABEL_EMPTY: &str = "aria-label-empty";
    pub const ARIA_LABEL_UNNECESSARY: &str = "aria-label-unnecessary";
    pub const ARIA_LABEL_REDUNDANT: &str = "aria-label-redundant";
    pub const ARIA_LABEL_OVERRIDES: &str = "aria-label-overrides";
    pub const ARIA_LABEL_GENERIC: &str = "aria-label-generic";
    pub const ARIA_LABELLEDBY_DANGLING: &str = "aria-labelledby-dangling";
    pub const ARIA_LABEL_ICON_ONLY: &str = "aria-label-icon-only";
    pub const ARIA_LABEL_HIDDEN: &str = "aria-label-hidden";

    // Headings
    pub const HEADING_SKIP: &str = "heading-skip";
    pub const HEADING_MULTIPLE_H1: &str = "heading-multiple-h1";
    pub const HEADING_H1_IN_SECTION: &str = "heading-h1-in-section";
    pub const HEADING_H1_IN_NAV: &str = "heading-h1-in-nav";
    pub const HEADING_EMPTY: &str = "heading-empty";
    pub const HEADING_GENERIC: &str = "heading-generic";

    // Forms
    pub const FORM_LABEL_MISSING: &str = "form-label-missing";
    pub const FORM_RADIO_NO_FIELDSET: &str = "form-radio-no-fieldset";
    pub const FORM_CHECKBOX_NO_FIELDSET: &str = "form-checkbox-no-fieldset";
    pub const FORM_LEGEND_MISSING: &str = "form-legend-missing";
    pub const FORM_LEGEND_EMPTY: &str = "form-legend-empty";
    pub const FORM_LEGEND_NOT_FIRST: &str = "form-legend-not-first";
    pub const FORM_PLACEHOLDER_ONLY: &str = "form-placeholder-only";

    // Tables
    pub const TABLE_LAYOUT_SEMANTICS: &str = "table-layout-semantics";
    pub const TABLE_HEADERS_MISSING: &str = "table-headers-missing";
    pub const TABLE_CAPTION_MISSING: &str = "table-caption-missing";
    pub const TABLE_SUMMARY_OBSOLETE: &str = "table-summary-obsolete";
    pub const TABLE_CAPTION_EMPTY: &str = "table-caption-empty";
    pub const TABLE_CAPTION_NOT_FIRST: &str = "table-caption-not-first";
    pub const TABLE_COMPLEX_ASSOCIATION: &str = "table-complex-association";
    pub const TABLE_DESCRIBEDBY_DANGLING: &str = "table-describedby-dangling";

    // Live regions
    pub const LIVE_REGION_INVALID_VALUE: &str = "live-region-invalid-value";
    pub const LIVE_REGION_REDUNDANT_ROLE: &str = "live-region-redundant-role";
    pub const LIVE_REGION_MISSING: &str = "live-region-missing";
    pub const LIVE_REGION_ASSERTIVE_OVERUSE: &str = "live-region-assertive-overuse";
    pub const LIVE_REGION_POLITE_IN_ERRORS: &str = "live-region-polite-in-errors";
    pub const LIVE_REGION_COMPETING: &str = "live-region-competing";

    // Links
    pub const LINK_TEXT_EMPTY: &str = "link-text-empty";
    pub const LINK_TEXT_ICON_ONLY: &str = "link-text-icon-only";
    pub const LINK_TEXT_GENERIC: &str = "link-text-generic";
    pub const LINK_TEXT_SINGLE_CHAR: &str = "link-text-single-char";
    pub const LINK_TEXT_URL: &str = "link-text-url";
    pub const LINK_TEXT_LONG: &str = "link-text-long";
    pub const LINK_TEXT_WHITESPACE: &str = "link-text-whitespace";
    pub const LINK_TEXT_DUPLICATE: &str = "link-text-duplicate";
    pub const LINK_CLUSTER: &str = "link-cluster";

    // Lists
    pub const LIST_INVALID_CHILD: &str = "list-invalid-child";
    pub const LIST_CONTENT_CONSISTENCY: &str = "list-content-consistency";

    // Language
    pub const LANG_MISSING: &str = "lang-missing";
    pub const LANG_INVALID: &str = "lang-invalid";
    pub const LANG_XML_MISMATCH: &str = "lang-xml-mismatch";
    pub const LANG_XML_ONLY: &str = "lang-xml-only";
    pub const LANG_CHANGE: &str = "lang-change";
    pub const LANG_SCRIPT_MISMATCH: &str = "lang-script-mismatch";

    // Skip links
    pub const SKIP_LINK_MISSING: &str = "skip-link-missing";
    pub const SKIP_LINK_DANGLING: &str = "skip-link-dangling";
    pub const SKIP_LINK_TARGET_NAME: &str = "skip-link-target-name";
    pub const SKIP_LINK_FOCUS_STYLE: &str = "skip-link-focus-style";
    pub const SKIP_LINK_NOT_FIRST: &str = "skip-link-not-first";
}

/// Legacy rules suppressed while their superseding universal rule is active.
///
/// Both rules in a pair detect overlapping defects; when the superseding
/// rule is enabled, the legacy rule's diagnostics are dropped so the same
/// element is not reported twice.
pub const SUPERSEDED_BY: &[(&str, &str)] =
    &[(id::LINK_TEXT_ICON_ONLY, id::ARIA_LABEL_ICON_ONLY)];

/// Enabled/disabled state for all rules.
///
/// All rules are enabled by default; callers disable by id. Serializable so
/// a surrounding tool can persist user preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    disabled: BTreeSet<String>,
    /// Apply the [`SUPERSEDED_BY`] suppression table
    #[serde(default = "default_true")]
    pub suppress_superseded: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::all()
    }
}

impl RuleSet {
    /// All rules enabled, superseded-rule suppression on.
    pub fn all() -> Self {
        Self { disabled: BTreeSet::new(), suppress_superseded: true }
    }

    pub fn is_enabled(&self, rule_id: &str) -> bool {
        !self.disabled.contains(rule_id)
    }

    pub fn disable(&mut self, rule_id: &str) {
        self.disabled.insert(rule_id.to_string());
    }

    pub fn enable(&mut self, rule_id: &str) {
        self.disabled.remove(rule_id);
    }

    /// Whether diagnostics for `rule_id` should be dropped because a
    /// superseding rule is active.
    pub fn is_superseded(&self, rule_id: &str) -> bool {
        self.suppress_superseded
            && SUPERSEDED_BY
                .iter()
                .any(|(legacy, universal)| *legacy == rule_id && self.is_enabled(universal))
    }
}

/// Path-based file classification supplied by the caller.
///
/// Absent a hint, content-based heuristics decide (template-section
/// markers, missing `<!DOCTYPE>`/`<head>`/`<body>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A full page template
    Page,
    /// A layout/partial fragment; page-level checks are skipped
    Fragment,
}

/// Per-run analysis configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub rules: RuleSet,
    pub file_kind: Option<FileKind>,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_kind(mut self, kind: FileKind) -> Self {
        self.file_kind = Some(kind);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_enabled_by_default() {
        let rules = RuleSet::all();
        assert!(rules.is_enabled(id::FORM_LABEL_MISSING));
        assert!(rules.is_enabled(id::HEADING_SKIP));
    }

    #[test]
    fn test_disable_enable() {
        let mut rules = RuleSet::all();
        rules.disable(id::LINK_TEXT_GENERIC);
        assert!(!rules.is_enabled(id::LINK_TEXT_GENERIC));
        rules.enable(id::LINK_TEXT_GENERIC);
        assert!(rules.is_enabled(id::LINK_TEXT_GENERIC));
    }

    #[test]
    fn test_superseded_suppression() {
        let rules = RuleSet::all();
        assert!(rules.is_superseded(id::LINK_TEXT_ICON_ONLY));
        assert!(!rules.is_superseded(id::LINK_TEXT_EMPTY));

        // Disabling the universal rule reactivates the legacy one
        let mut rules = RuleSet::all();
        rules.disable(id::ARIA_LABEL_ICON_ONLY);
        assert!(!rules.is_superseded(id::LINK_TEXT_ICON_ONLY));

        // Suppression can be switched off entirely
        let mut rules = RuleSet::all();
        rules.suppress_superseded = false;
        assert!(!rules.is_superseded(id::LINK_TEXT_ICON_ONLY));
    }

    #[test]
    fn test_ruleset_serde_round_trip() {
        let mut rules = RuleSet::all();
        rules.disable(id::LANG_CHANGE);
        let json = serde_json::to_string(&rules).expect("serializable");
        let parsed: RuleSet = serde_json::from_str(&json).expect("round trip");
        assert!(!parsed.is_enabled(id::LANG_CHANGE));
        assert!(parsed.suppress_superseded);
    }
}
