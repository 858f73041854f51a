//! CLI command definitions for timesheet-jiffy
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod convert;

use clap::{Parser, Subcommand};
use convert::{ConvertArgs, ReportFormat};

/// Convert Timesheet XML exports into Jiffy databases
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Whether stdout carries a JSON report.
    pub fn json_report(&self) -> bool {
        matches!(
            &self.command,
            Some(Command::Convert(args)) if args.format == ReportFormat::Json
        )
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a Timesheet export into a Jiffy database (default)
    Convert(ConvertArgs),

    /// Print the SQL for the Jiffy tables
    Schema,
}
