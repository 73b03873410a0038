//! Sequential batch driver over the export directory

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::warn;

use super::aggregate::{aggregate_rows, filter_shift};
use super::excel::read_staffing_rows;
use super::tree::ConsolidatedTree;

/// Terminal state of one source file after a batch pass
#[derive(Debug)]
pub enum FileOutcome {
    /// Aggregated and folded into the tree; deleted once the report lands
    Merged,
    /// Zero data rows; left on disk
    Skipped,
    /// Read or aggregation failure; left on disk, batch continues
    Failed(anyhow::Error),
}

/// Everything one run produced
#[derive(Debug)]
pub struct BatchReport {
    pub tree: ConsolidatedTree,
    /// Files that reached [`FileOutcome::Merged`]
    pub processed_count: usize,
    pub duration: Duration,
    pub outcomes: Vec<(PathBuf, FileOutcome)>,
    /// Merged source files, awaiting deletion after the report is written
    pub merged_files: Vec<PathBuf>,
}

impl BatchReport {
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, FileOutcome::Skipped))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, FileOutcome::Failed(_)))
            .count()
    }
}

/// Enumerate spreadsheet files in `dir`, non-recursive, sorted by name.
pub fn list_spreadsheets(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if matches!(path.extension().and_then(|e| e.to_str()), Some("xls" | "xlsx")) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Run the full pipeline over every spreadsheet in `input_dir`.
///
/// Files are processed strictly one at a time: load, filter to `shift_key`,
/// aggregate, fold into the tree. A failing or empty file is reported and
/// never aborts the batch or disturbs what earlier files contributed.
///
/// Merged source files are NOT deleted here. The caller deletes them with
/// [`delete_files`] once the report has been durably written, so a crash
/// anywhere before that leaves every source file in place for the next run.
pub fn run_batch(input_dir: &Path, shift_key: &str) -> Result<BatchReport> {
    let files = list_spreadsheets(input_dir)?;
    let start = Instant::now();

    let mut tree = ConsolidatedTree::new();
    let mut outcomes = Vec::with_capacity(files.len());
    let mut merged_files = Vec::new();
    let mut processed_count = 0;

    let bar = ProgressBar::new(files.len() as u64);
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let outcome = process_file(&path, shift_key, &mut tree);
        match &outcome {
            FileOutcome::Merged => {
                processed_count += 1;
                merged_files.push(path.clone());
            }
            FileOutcome::Skipped => {
                bar.println(format!("File {} is empty and will be ignored.", name));
            }
            FileOutcome::Failed(err) => {
                bar.println(format!("Error processing file {}: {:#}", name, err));
                warn!("failed to process {}: {:#}", path.display(), err);
            }
        }

        outcomes.push((path, outcome));
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(BatchReport {
        tree,
        processed_count,
        duration: start.elapsed(),
        outcomes,
        merged_files,
    })
}

/// Take one file through load -> filter -> aggregate -> merge.
fn process_file(path: &Path, shift_key: &str, tree: &mut ConsolidatedTree) -> FileOutcome {
    let rows = match read_staffing_rows(path) {
        Ok(rows) => rows,
        Err(err) => return FileOutcome::Failed(err),
    };

    if rows.is_empty() {
        return FileOutcome::Skipped;
    }

    let matching = filter_shift(rows, shift_key);
    tree.merge_groups(aggregate_rows(matching));
    FileOutcome::Merged
}

/// Remove source files whose data is already in the written report.
///
/// Deletion failures are logged and otherwise ignored; a leftover file is
/// merely reprocessed on the next run.
pub fn delete_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = fs::remove_file(path) {
            warn!("failed to delete {}: {}", path.display(), err);
        }
    }
}
