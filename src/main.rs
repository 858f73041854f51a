//! Timesheet → Jiffy converter
//!
//! Reads a Timesheet XML export and writes the projects and time entries into
//! a Jiffy SQLite database.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::path::Path;
use timesheet_jiffy::cli::convert::{ConvertArgs, ReportFormat};
use timesheet_jiffy::cli::{Cli, Command};
use timesheet_jiffy::config::{Config, ConfigLoader};
use timesheet_jiffy::convert::{Conversion, ConvertOptions, convert};
use timesheet_jiffy::db::schema::SCHEMA_SQL;
use timesheet_jiffy::db::{Database, prepare_output};
use timesheet_jiffy::logging::{self, LogTarget};
use timesheet_jiffy::source::SourceDocument;
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let target = LogTarget::parse(&cli.log).off_stdout(cli.json_report());
    logging::init(&target, cli.verbose)?;

    let mut loader = ConfigLoader::load_from(cli.config.as_deref().map(Path::new))?;
    for source in loader.sources() {
        debug!(path = %source.display(), "Using config file");
    }

    match cli.command {
        Some(Command::Schema) => {
            print!("{}", SCHEMA_SQL);
        }
        Some(Command::Convert(args)) => {
            args.apply_to(loader.config_mut());
            run_convert(loader.config(), &args)?;
        }
        None => {
            let args = ConvertArgs::default();
            run_convert(loader.config(), &args)?;
        }
    }

    Ok(())
}

fn run_convert(config: &Config, args: &ConvertArgs) -> Result<()> {
    info!(
        source = %config.paths.source.display(),
        output = %config.paths.output.display(),
        mode = args.mode(),
        "Converting Timesheet export"
    );

    let doc = SourceDocument::from_file(&config.paths.source)
        .with_context(|| format!("Failed to read {}", config.paths.source.display()))?;
    let conversion = convert(&doc, &ConvertOptions::from_config(config))
        .with_context(|| format!("Failed to convert {}", config.paths.source.display()))?;

    if args.dry_run {
        print_report(&conversion, args.format, true)?;
        return Ok(());
    }

    prepare_output(
        &config.paths.output,
        config.paths.template.as_deref(),
        args.force,
    )?;
    let mut db = Database::open(&config.paths.output)?;
    let result = db.import_rows(&conversion.project_rows, &conversion.task_rows)?;

    info!(
        output = %config.paths.output.display(),
        rows = result.total_rows(),
        "Wrote Jiffy database"
    );
    print_report(&conversion, args.format, false)?;

    Ok(())
}

fn print_report(conversion: &Conversion, format: ReportFormat, dry_run: bool) -> Result<()> {
    let report = &conversion.report;
    match format {
        ReportFormat::Json => {
            let mut value = json!({ "dry_run": dry_run, "report": report });
            if dry_run {
                value["rows"] = json!({
                    "jiffy_time_tree": conversion.project_rows,
                    "jiffy_times": conversion.task_rows,
                });
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ReportFormat::Text => {
            if dry_run {
                println!("Dry run results:");
            } else {
                println!("Conversion complete:");
            }
            println!("  Source records:");
            for (group, count) in &report.source_records {
                println!("    {}: {}", group, count);
            }
            println!("  Breaks applied: {}", report.breaks_applied);
            for rule in &report.rules {
                println!(
                    "  Rule '{}': {} tasks moved",
                    rule.bucket_name, rule.tasks_moved
                );
            }
            let verb = if dry_run { "Would write" } else { "Rows written" };
            println!("  {}:", verb);
            println!("    jiffy_time_tree: {}", report.project_rows);
            println!("    jiffy_times: {}", report.task_rows);
            if !report.warnings.is_empty() {
                println!("  Warnings:");
                for warning in &report.warnings {
                    println!("    - {}", warning);
                }
            }
        }
    }
    Ok(())
}
