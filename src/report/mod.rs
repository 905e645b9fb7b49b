// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for accessibility findings.
//!
//! Supports multiple output formats:
//! - Text: human-readable findings grouped by severity
//! - JSON: structured findings for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use crate::diagnostic::{DiagnosticSet, Severity};
use crate::scanner::FileFindings;
use serde::Serialize;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Generate a report from per-file findings
pub fn generate_report(files: &[FileFindings], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(files),
        OutputFormat::Json => generate_json_report(files),
        OutputFormat::Sarif => generate_sarif_report(files),
    }
}

const SEVERITY_ORDER: &[Severity] =
    &[Severity::Error, Severity::Warning, Severity::WeakWarning, Severity::Info];

fn generate_text_report(files: &[FileFindings]) -> String {
    let mut output = String::new();

    output.push_str("=== a11ylint report ===\n\n");

    let total: usize = files.iter().map(|f| f.findings.len()).sum();
    if total == 0 {
        output.push_str("No accessibility issues found.\n");
        return output;
    }

    let mut all = DiagnosticSet::new();
    for file in files {
        all.extend(file.findings.iter().map(|f| f.diagnostic.clone()));
    }
    output.push_str(&format!(
        "Found {} issue(s): {} error(s), {} warning(s), {} weak warning(s), {} info\n\n",
        all.len(),
        all.errors().len(),
        all.warnings().len(),
        all.by_severity(Severity::WeakWarning).len(),
        all.by_severity(Severity::Info).len(),
    ));

    for severity in SEVERITY_ORDER {
        let in_band: Vec<_> = files
            .iter()
            .flat_map(|f| f.findings.iter().map(move |d| (f, d)))
            .filter(|(_, d)| d.diagnostic.severity == *severity)
            .collect();
        if in_band.is_empty() {
            continue;
        }

        output.push_str(&format!("--- {} ({}) ---\n", severity, in_band.len()));
        for (file, located) in in_band {
            output.push_str(&format!(
                "[{}] {}\n  Location: {}:{}:{}\n",
                located.diagnostic.rule_id,
                located.diagnostic.message,
                file.path.display(),
                located.line,
                located.column,
            ));
            if let Some(fix) = &located.diagnostic.fix {
                output.push_str(&format!("  Fix: {}\n", describe_fix(fix)));
            }
            output.push('\n');
        }
    }

    if all.has_errors() {
        output.push_str("RESULT: FAIL (errors found)\n");
    } else {
        output.push_str("RESULT: PASS WITH REMARKS\n");
    }

    output
}

fn describe_fix(fix: &crate::diagnostic::Fix) -> String {
    use crate::diagnostic::Fix;
    match fix {
        Fix::AddAttribute { name, value } if value.is_empty() => {
            format!("add a {} attribute", name)
        }
        Fix::AddAttribute { name, value } => format!("add {}=\"{}\"", name, value),
        Fix::RemoveAttribute { name } => format!("remove the {} attribute", name),
        Fix::ChangeTagName { new_name } => format!("rename the tag to <{}>", new_name),
        Fix::WrapInTag { tag_name } => format!("wrap the element in <{}>", tag_name),
        Fix::AddChildElement { tag_name, .. } => format!("add a <{}> child element", tag_name),
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: &'a [FileFindings],
}

fn generate_json_report(files: &[FileFindings]) -> String {
    serde_json::to_string_pretty(&JsonReport { files })
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize findings: {}\"}}", e))
}

/// SARIF report structure (simplified)
#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    #[serde(rename = "informationUri")]
    information_uri: String,
}

#[derive(Debug, Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Debug, Serialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
    #[serde(rename = "startColumn")]
    start_column: usize,
    #[serde(rename = "charOffset")]
    char_offset: usize,
    #[serde(rename = "charLength")]
    char_length: usize,
}

fn generate_sarif_report(files: &[FileFindings]) -> String {
    let results: Vec<SarifResult> = files
        .iter()
        .flat_map(|file| {
            file.findings.iter().map(|located| {
                let d = &located.diagnostic;
                let level = match d.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                    Severity::WeakWarning | Severity::Info => "note",
                };
                SarifResult {
                    rule_id: d.rule_id.clone(),
                    level: level.to_string(),
                    message: SarifMessage { text: d.message.clone() },
                    locations: vec![SarifLocation {
                        physical_location: SarifPhysicalLocation {
                            artifact_location: SarifArtifactLocation {
                                uri: file.path.display().to_string(),
                            },
                            region: SarifRegion {
                                start_line: located.line,
                                start_column: located.column,
                                char_offset: d.span.start,
                                char_length: d.span.len(),
                            },
                        },
                    }],
                }
            })
        })
        .collect();

    let report = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "a11ylint".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: "https://github.com/hyperpolymath/a11ylint".to_string(),
                },
            },
            results,
        }],
    };

    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize SARIF report: {}\"}}", e))
}
