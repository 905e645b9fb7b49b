// SPDX-License-Identifier: PMPL-1.0-or-later
//! Diagnostic and fix-descriptor model shared by all analyzers.
//!
//! Diagnostics are plain value types: no ids, no timestamps. Running the
//! same analysis twice over the same text must yield an identical sequence.

use serde::{Deserialize, Serialize};

/// Byte-offset range into the analyzed text.
///
/// Invariant: `start <= end`, both within the text the span was derived
/// from. Spans anchor diagnostics and fix targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside this span.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Severity levels for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Defect that should block; prominent in reports
    Error,
    /// Should be addressed
    Warning,
    /// Advisory; likely but not certainly a problem
    WeakWarning,
    /// Informational, including good-practice notes
    Info,
}

impl Severity {
    /// Whether this severity fails a check run
    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::WeakWarning => write!(f, "WEAK WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// A typed fix intent attached to a diagnostic.
///
/// Each variant carries only the intent; resolving it against live text is
/// the consumer's job. The target element is inferable from the owning
/// diagnostic's span alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fix {
    /// Add `name="value"` to the element at the diagnostic's span
    AddAttribute { name: String, value: String },
    /// Remove the named attribute from the element
    RemoveAttribute { name: String },
    /// Rename the element's tag
    ChangeTagName { new_name: String },
    /// Wrap the element in a new parent tag
    WrapInTag { tag_name: String },
    /// Insert a child element with the given content
    AddChildElement {
        tag_name: String,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        required_parent_tag: Option<String>,
    },
}

impl Fix {
    pub fn add_attribute(name: &str, value: &str) -> Self {
        Fix::AddAttribute { name: name.to_string(), value: value.to_string() }
    }

    pub fn remove_attribute(name: &str) -> Self {
        Fix::RemoveAttribute { name: name.to_string() }
    }

    pub fn change_tag_name(new_name: &str) -> Self {
        Fix::ChangeTagName { new_name: new_name.to_string() }
    }

    pub fn wrap_in_tag(tag_name: &str) -> Self {
        Fix::WrapInTag { tag_name: tag_name.to_string() }
    }

    pub fn add_child_element(tag_name: &str, content: &str) -> Self {
        Fix::AddChildElement {
            tag_name: tag_name.to_string(),
            content: content.to_string(),
            required_parent_tag: None,
        }
    }

    pub fn add_child_element_in(tag_name: &str, content: &str, parent: &str) -> Self {
        Fix::AddChildElement {
            tag_name: tag_name.to_string(),
            content: content.to_string(),
            required_parent_tag: Some(parent.to_string()),
        }
    }
}

/// A single located accessibility finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule identifier, e.g. "form-label-missing"
    pub rule_id: String,
    /// Byte range in the analyzed text
    pub span: Span,
    /// Human-readable message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Optional fix intent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(rule_id: &str, span: Span, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            span,
            message: message.into(),
            severity,
            fix: None,
        }
    }

    /// Attach a fix intent
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}

/// Aggregated diagnostics for one file-analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticSet {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn by_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == severity).collect()
    }

    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.by_severity(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_blocking())
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_contains() {
        let span = Span::new(5, 10);
        assert!(span.contains(5));
        assert!(span.contains(9));
        assert!(!span.contains(10));
        assert!(!span.contains(4));
    }

    #[test]
    fn test_severity_blocking() {
        assert!(Severity::Error.is_blocking());
        assert!(!Severity::Warning.is_blocking());
        assert!(!Severity::WeakWarning.is_blocking());
        assert!(!Severity::Info.is_blocking());
    }

    #[test]
    fn test_fix_serialization() {
        let fix = Fix::add_attribute("aria-label", "Close");
        let json = serde_json::to_string(&fix).expect("serializable");
        assert!(json.contains("add_attribute"));
        assert!(json.contains("aria-label"));

        let parsed: Fix = serde_json::from_str(&json).expect("round trip");
        assert_eq!(parsed, fix);
    }

    #[test]
    fn test_diagnostic_set_counts() {
        let mut set = DiagnosticSet::new();
        set.add(Diagnostic::new("a", Span::new(0, 1), Severity::Error, "e"));
        set.add(Diagnostic::new("b", Span::new(1, 2), Severity::Warning, "w"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.errors().len(), 1);
        assert!(set.has_errors());
    }

    #[test]
    fn test_diagnostic_equality_is_structural() {
        let a = Diagnostic::new("r", Span::new(0, 4), Severity::Info, "m");
        let b = Diagnostic::new("r", Span::new(0, 4), Severity::Info, "m");
        assert_eq!(a, b);
    }
}
