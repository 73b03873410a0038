//! Spreadsheet consolidation pipeline
//!
//! Reads per-event staffing exports, filters rows to a single shift,
//! aggregates counts by (region, city, venue, role) and folds every file
//! into one consolidated tree ready for the JSON report.

pub mod aggregate;
pub mod batch;
pub mod excel;
pub mod tree;
pub mod types;

pub use aggregate::{aggregate_rows, filter_shift};
pub use batch::{BatchReport, FileOutcome, delete_files, run_batch};
pub use tree::{CityBucket, ConsolidatedTree};
pub use types::{GroupKey, GroupSummary, StaffingRow};
