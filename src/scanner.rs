// SPDX-License-Identifier: PMPL-1.0-or-later
//! Directory scanner for running accessibility analysis across a project.
//!
//! Walks directory trees, identifies applicable template files, classifies
//! layouts/partials by path, and runs the analyzers on each file.

use crate::analyzers;
use crate::diagnostic::Diagnostic;
use crate::rules::{AnalysisOptions, FileKind};
use crate::text;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// File extensions to scan
const SCANNABLE_EXTENSIONS: &[&str] = &["html", "htm", "xhtml", "tpl", "twig", "fluid"];

/// Directories to skip
const SKIP_DIRS: &[&str] = &[
    "node_modules", ".git", "target", "dist", "build", "_build", "vendor", ".next",
    ".nuxt", "coverage",
];

/// Path components marking layout/partial fragments
const FRAGMENT_DIRS: &[&str] = &["partials", "layouts"];

/// A diagnostic with its position resolved to line and column.
#[derive(Debug, Clone, Serialize)]
pub struct LocatedDiagnostic {
    /// 1-indexed line of the span start
    pub line: usize,
    /// 1-indexed column of the span start
    pub column: usize,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

/// All findings for one analyzed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileFindings {
    pub path: PathBuf,
    pub findings: Vec<LocatedDiagnostic>,
}

impl FileFindings {
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.diagnostic.severity.is_blocking())
    }
}

/// Classify a file as a layout/partial fragment from its path alone.
pub fn classify_path(path: &Path) -> Option<FileKind> {
    let fragment = path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|s| FRAGMENT_DIRS.contains(&s.to_lowercase().as_str()))
    });
    fragment.then_some(FileKind::Fragment)
}

/// Scan a directory tree for accessibility issues.
pub fn scan_directory(dir: &Path, opts: &AnalysisOptions) -> anyhow::Result<Vec<FileFindings>> {
    let mut results = Vec::new();
    let mut files_scanned = 0usize;

    info!("scanning directory {}", dir.display());

    for entry in WalkDir::new(dir).follow_links(false).into_iter().filter_entry(|e| {
        let name = e.file_name().to_str().unwrap_or("");
        if e.file_type().is_dir() {
            return !SKIP_DIRS.contains(&name) && !name.starts_with('.');
        }
        true
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !SCANNABLE_EXTENSIONS.contains(&ext) {
            continue;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!("skipping {}: {}", path.display(), e);
                continue;
            }
        };

        results.push(analyze_content(path, &content, opts));
        files_scanned += 1;
    }

    let total: usize = results.iter().map(|r| r.findings.len()).sum();
    info!("scanned {} files, {} findings", files_scanned, total);

    Ok(results)
}

/// Scan a single file for accessibility issues.
pub fn scan_file(path: &Path, opts: &AnalysisOptions) -> anyhow::Result<FileFindings> {
    let content = std::fs::read_to_string(path)?;
    Ok(analyze_content(path, &content, opts))
}

fn analyze_content(path: &Path, content: &str, opts: &AnalysisOptions) -> FileFindings {
    let mut file_opts = opts.clone();
    if file_opts.file_kind.is_none() {
        file_opts.file_kind = classify_path(path);
    }

    let findings = analyzers::analyze_file(content, &file_opts)
        .into_iter()
        .map(|diagnostic| {
            let (line, column) = text::line_col(content, diagnostic.span.start);
            LocatedDiagnostic { line, column, diagnostic }
        })
        .collect();

    FileFindings { path: path.to_path_buf(), findings }
}
