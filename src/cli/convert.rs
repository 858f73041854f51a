//! Convert subcommand for timesheet-jiffy CLI
//!
//! Reads a Timesheet export and writes a Jiffy database.

use crate::config::Config;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON report (with rows on --dry-run)
    Json,
}

/// Arguments for the convert subcommand
#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Timesheet export to read (plain or gzipped XML)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Jiffy database to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Empty Jiffy database to copy before writing
    #[arg(long, conflicts_with = "no_template")]
    pub template: Option<PathBuf>,

    /// Create the output from scratch instead of copying a template
    #[arg(long)]
    pub no_template: bool,

    /// Most-significant half for generated ids
    #[arg(long, allow_negative_numbers = true)]
    pub id_namespace: Option<i64>,

    /// Run the conversion and report without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Replace the output database if it already exists
    #[arg(long)]
    pub force: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

impl ConvertArgs {
    /// Apply command-line overrides to the loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref file) = self.file {
            config.paths.source = file.clone();
        }
        if let Some(ref output) = self.output {
            config.paths.output = output.clone();
        }
        if let Some(ref template) = self.template {
            config.paths.template = Some(template.clone());
        }
        if self.no_template {
            config.paths.template = None;
        }
        if let Some(namespace) = self.id_namespace {
            config.ids.namespace = namespace;
        }
    }

    /// Describe the run mode for logging
    pub fn mode(&self) -> &'static str {
        if self.dry_run {
            "dry-run"
        } else if self.force {
            "overwrite"
        } else {
            "create"
        }
    }
}
