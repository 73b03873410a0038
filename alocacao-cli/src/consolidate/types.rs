//! Core types for the staffing consolidation pipeline

use serde::{Deserialize, Serialize};

/// One staffing record from a portal export
///
/// Field names are English; the spreadsheet column headers they are read
/// from are the portal's Portuguese ones (see `excel::cols`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffingRow {
    /// Date + period slot, e.g. "05/11/2023 - Tarde"
    pub shift_key: String,
    /// State / UF code
    pub region: String,
    pub city: String,
    /// Exam venue name
    pub venue: String,
    /// Staff role at the venue
    pub role: String,
    pub allocated: i64,
    pub expected: i64,
    pub coordination_number: i64,
    pub venue_id: i64,
}

/// Aggregation bucket key within a single file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub region: String,
    pub city: String,
    pub venue: String,
    pub role: String,
}

impl GroupKey {
    pub fn from_row(row: &StaffingRow) -> Self {
        GroupKey {
            region: row.region.clone(),
            city: row.city.clone(),
            venue: row.venue.clone(),
            role: row.role.clone(),
        }
    }
}

/// Summed counts for one (region, city, venue, role) group
///
/// `coordination_number` and `venue_id` come from the first row seen for the
/// group; every row of a group is assumed to share them. Serialized field
/// names match the report format consumed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    #[serde(rename = "allocated")]
    pub allocated_total: i64,
    #[serde(rename = "expected")]
    pub expected_total: i64,
    #[serde(rename = "nro_coordenacao")]
    pub coordination_number: i64,
    #[serde(rename = "local_prova_id")]
    pub venue_id: i64,
}

impl GroupSummary {
    /// Start a summary from the group's first row
    pub fn from_row(row: &StaffingRow) -> Self {
        GroupSummary {
            allocated_total: 0,
            expected_total: 0,
            coordination_number: row.coordination_number,
            venue_id: row.venue_id,
        }
    }

    /// Fold one more row of the same group into the sums
    pub fn add_row(&mut self, row: &StaffingRow) {
        self.allocated_total += row.allocated;
        self.expected_total += row.expected;
    }
}
