//! Consolidation run handler

use std::fs;

use anyhow::{Context, Result, bail};
use colored::*;
use log::error;

use super::Cli;
use crate::config::Config;
use crate::consolidate::{delete_files, run_batch};
use crate::publish::{GitPublisher, Publisher};

pub fn run(args: Cli) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(input_dir) = args.input_dir {
        config.input_dir = input_dir;
    }
    if let Some(shift_key) = args.shift_key {
        config.shift_key = shift_key;
    }
    if let Some(output) = args.output {
        config.output_path = output;
    }

    let git_publisher;
    let publisher: Option<&dyn Publisher> = if args.no_publish || !config.publish.enabled {
        None
    } else {
        git_publisher = GitPublisher::new(&config.publish.remote, &config.publish.branch);
        Some(&git_publisher)
    };

    execute(&config, publisher, args.keep_files)
}

/// Run the batch, write the report, then delete sources and publish.
///
/// The publisher is injected so the whole run can be exercised in tests
/// without a git checkout. Source files are deleted only after the report
/// has been written; see `consolidate::batch`.
fn execute(config: &Config, publisher: Option<&dyn Publisher>, keep_files: bool) -> Result<()> {
    if !config.input_dir.is_dir() {
        bail!("Input directory not found: {}", config.input_dir.display());
    }

    let report = run_batch(&config.input_dir, &config.shift_key)?;

    if report.tree.is_empty() {
        println!(
            "{}",
            "The spreadsheets found were empty or failed to process; no report was written."
                .yellow()
        );
        return Ok(());
    }

    let json = report.tree.to_json_string()?;
    fs::write(&config.output_path, json)
        .with_context(|| format!("Failed to write report: {}", config.output_path.display()))?;

    if !keep_files {
        delete_files(&report.merged_files);
    }

    println!(
        "Consolidated data saved to {}.",
        config.output_path.display().to_string().bright_green()
    );
    println!("Files processed: {}", report.processed_count);
    if report.skipped_count() > 0 || report.failed_count() > 0 {
        println!(
            "Files skipped: {}, failed: {}",
            report.skipped_count(),
            report.failed_count()
        );
    }
    println!("Total processing time: {} seconds", report.duration.as_secs());

    if let Some(publisher) = publisher {
        // A publish failure never rolls back the local report.
        match publisher.publish(&config.output_path) {
            Ok(()) => println!("{}", "Report committed and pushed.".green()),
            Err(err) => {
                error!("publish failed: {:#}", err);
                println!("{}", format!("Publish failed: {:#}", err).red());
            }
        }
    }

    Ok(())
}
