//! # CLI Support
//!
//! Command-line surface for running the contract once from CI:
//! `users-contract --format json --report target/users-contract.json`.
//! Exit codes: 0 when every scenario passed, 1 on any failure or skip,
//! 2 when the environment is misconfigured.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::testing::RunReport;

pub const EXIT_PASSED: u8 = 0;
pub const EXIT_FAILED: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;

/// CLI configuration parsed from command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "users-contract",
    about = "Check the paginated users endpoint against its contract"
)]
pub struct CliConfig {
    /// Format of the summary printed to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Also write the JSON report to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Output format for CLI reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render(report: &RunReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => to_json(report),
    }
}

pub fn write_report(report: &RunReport, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            format!("Failed to create report directory `{}`: {e}", parent.display())
        })?;
    }
    let raw = to_json(report)?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write report file `{}`: {e}", path.display()))
}

pub fn exit_code(report: &RunReport) -> u8 {
    if report.success() { EXIT_PASSED } else { EXIT_FAILED }
}

fn to_json(report: &RunReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|e| format!("Failed to serialize report: {e}"))
}
