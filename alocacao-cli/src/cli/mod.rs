//! Command-line surface

pub mod handler;

use std::path::PathBuf;

use clap::Parser;

/// Consolidates downloaded staffing spreadsheets into a published JSON report
#[derive(Debug, Parser)]
#[command(name = "alocacao-cli", version, about)]
pub struct Cli {
    /// Path to an alternate config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the downloaded .xls/.xlsx spreadsheets
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Shift rows must match exactly, e.g. "05/11/2023 - Tarde"
    #[arg(long)]
    pub shift_key: Option<String>,

    /// Where the consolidated JSON report is written
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Skip the git publish step after writing the report
    #[arg(long)]
    pub no_publish: bool,

    /// Leave processed source files on disk
    #[arg(long)]
    pub keep_files: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
