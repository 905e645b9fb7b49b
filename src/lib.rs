// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11ylint - Static accessibility linter for HTML and template markup
//!
//! Analyzes raw HTML/template source text for accessibility defects and
//! reports them as byte-offset-anchored diagnostics, optionally carrying a
//! typed fix descriptor. No DOM is built: analyzers reconstruct just enough
//! structure (tag boundaries, attributes, nesting, id references) from the
//! raw text, which keeps them usable on template markup that is only
//! almost-HTML (namespaced tags, control-flow pseudo-elements).
//!
//! ## Analyzers
//!
//! - **ARIA Role** (4.1.2): role validity, required properties, implicit-role conflicts
//! - **ARIA Label** (4.1.2): labeling mechanisms, icon-only controls
//! - **Headings** (1.3.1/2.4.6): per-context hierarchy, H1 placement
//! - **Forms** (3.3.2/1.3.1): control labels, fieldset grouping
//! - **Tables** (1.3.1): layout/data classification, header association
//! - **Live Regions** (4.1.3): aria-live validity, priority, competition
//! - **Links** (2.4.4): descriptive text, duplicates, clustering
//! - **Lists** (1.3.1): valid children, content consistency
//! - **Language** (3.1.1/3.1.2): lang presence, BCP 47 shape
//! - **Skip Links** (2.4.1): presence, target resolution, focus visibility

pub mod analyzers;
pub mod context;
pub mod diagnostic;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod text;

pub use analyzers::analyze_file;
pub use context::DocumentContext;
pub use diagnostic::{Diagnostic, Fix, Severity, Span};
pub use rules::{AnalysisOptions, FileKind, RuleSet};
