// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11ylint CLI - static accessibility linter for HTML and template markup.

use a11ylint::analyzers;
use a11ylint::report::{generate_report, OutputFormat};
use a11ylint::rules::FileKind;
use a11ylint::scanner;
use a11ylint::AnalysisOptions;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Static accessibility linter for HTML and template markup
#[derive(Parser)]
#[command(name = "a11ylint")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks on a directory
    Check {
        /// Directory to scan
        dir: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Rule ids to disable (repeatable)
        #[arg(long = "disable", value_name = "RULE")]
        disabled: Vec<String>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Analyze a single file
    Analyze {
        /// File to analyze
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Treat the file as a layout/partial fragment
        #[arg(long)]
        fragment: bool,

        /// Rule ids to disable (repeatable)
        #[arg(long = "disable", value_name = "RULE")]
        disabled: Vec<String>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Generate a SARIF report for a directory
    Report {
        /// Directory to scan
        dir: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// List all analyzers and their rule ids
    Rules,
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("a11ylint=debug")
    } else {
        EnvFilter::new("a11ylint=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_options(disabled: &[String], fragment: bool) -> AnalysisOptions {
    let mut opts = AnalysisOptions::new();
    for rule in disabled {
        opts.rules.disable(rule);
    }
    if fragment {
        opts.file_kind = Some(FileKind::Fragment);
    }
    opts
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { dir, format, output, disabled, verbose } => {
            init_logging(verbose);
            let opts = build_options(&disabled, false);
            let results = scanner::scan_directory(&dir, &opts)?;
            let report = generate_report(&results, format.into());
            write_output(&report, output.as_deref())?;

            if results.iter().any(|r| r.has_errors()) {
                std::process::exit(1);
            }
        }

        Commands::Analyze { file, format, fragment, disabled, verbose } => {
            init_logging(verbose);
            let opts = build_options(&disabled, fragment);
            let result = scanner::scan_file(&file, &opts)?;
            let report = generate_report(std::slice::from_ref(&result), format.into());
            println!("{}", report);

            if result.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Report { dir, output, verbose } => {
            init_logging(verbose);
            let results = scanner::scan_directory(&dir, &AnalysisOptions::new())?;
            let report = generate_report(&results, OutputFormat::Sarif);
            write_output(&report, output.as_deref())?;
        }

        Commands::Rules => {
            for analyzer in analyzers::all_analyzers() {
                println!("{} - {}", analyzer.name(), analyzer.description());
                for rule in analyzer.rule_ids() {
                    println!("  {}", rule);
                }
            }
        }
    }

    Ok(())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&std::path::Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
