// SPDX-License-Identifier: PMPL-1.0-or-later
//! Compliancebot CLI - scan a saved page for legal and accessibility
//! compliance.
//!
//! The engine does not fetch URLs; pass markup saved by your fetch
//! pipeline (plus any linked stylesheets via `--css`).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use compliancebot::report::{render_report, OutputFormat};
use compliancebot::{DocumentSnapshot, ScanConfig, SiteProfile, WcagLevel};
use tracing_subscriber::EnvFilter;

/// Web page legal & accessibility compliance scanner
#[derive(Parser)]
#[command(name = "compliancebot")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a saved page and print the full compliance report
    Check {
        /// HTML file to scan
        file: PathBuf,

        /// URL to record in the report (defaults to the file path)
        #[arg(long)]
        url: Option<String>,

        /// Additional stylesheet files fetched alongside the page
        #[arg(long = "css")]
        stylesheets: Vec<PathBuf>,

        /// Site profile selecting the score weights
        #[arg(long, default_value = "generic")]
        profile: ProfileArg,

        /// WCAG conformance target for contrast checks
        #[arg(long, default_value = "aa")]
        level: LevelArg,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Scan a saved page and print findings as JSON, without scores
    Findings {
        /// HTML file to scan
        file: PathBuf,

        /// URL to record in the report (defaults to the file path)
        #[arg(long)]
        url: Option<String>,

        /// WCAG conformance target for contrast checks
        #[arg(long, default_value = "aa")]
        level: LevelArg,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },
}

/// Site profile CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileArg {
    /// Content/brochure site
    Generic,
    /// E-commerce site
    Shop,
}

impl From<ProfileArg> for SiteProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Generic => SiteProfile::Generic,
            ProfileArg::Shop => SiteProfile::Shop,
        }
    }
}

/// WCAG level CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LevelArg {
    /// Level AA - standard
    Aa,
    /// Level AAA - enhanced
    Aaa,
}

impl From<LevelArg> for WcagLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Aa => WcagLevel::AA,
            LevelArg::Aaa => WcagLevel::AAA,
        }
    }
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("compliancebot=debug")
    } else {
        EnvFilter::new("compliancebot=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_snapshot(
    file: &PathBuf,
    url: Option<&str>,
    stylesheets: &[PathBuf],
) -> anyhow::Result<DocumentSnapshot> {
    let html = std::fs::read_to_string(file)?;
    let url = url
        .map(String::from)
        .unwrap_or_else(|| format!("file://{}", file.display()));
    let mut snapshot = DocumentSnapshot::parse(&url, &html);
    for path in stylesheets {
        let css = std::fs::read_to_string(path)?;
        snapshot.push_stylesheet(&css);
    }
    Ok(snapshot)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file, url, stylesheets, profile, level, format, output, verbose } => {
            init_logging(verbose);
            let snapshot = build_snapshot(&file, url.as_deref(), &stylesheets)?;
            let config = ScanConfig {
                profile: profile.into(),
                wcag_level: level.into(),
                ..ScanConfig::default()
            };
            let report = compliancebot::scan(&snapshot, &config);
            write_output(&render_report(&report, format.into()), output.as_deref())?;

            if report.has_critical_findings() {
                std::process::exit(1);
            }
        }

        Commands::Findings { file, url, level, verbose } => {
            init_logging(verbose);
            let snapshot = build_snapshot(&file, url.as_deref(), &[])?;
            let config = ScanConfig {
                wcag_level: level.into(),
                ..ScanConfig::default()
            };
            let report = compliancebot::scan(&snapshot, &config);
            let findings: Vec<_> = report
                .categories
                .values()
                .flat_map(|c| c.findings.iter())
                .collect();
            println!("{}", serde_json::to_string_pretty(&findings)?);

            if report.has_critical_findings() {
                std::process::exit(1);
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
