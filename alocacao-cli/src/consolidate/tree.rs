//! Consolidated result tree accumulated across all processed files

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::types::{GroupKey, GroupSummary};

/// Per-city accumulator: running totals plus venue/role detail leaves
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityBucket {
    pub total_allocated: i64,
    pub total_expected: i64,
    /// venue -> role -> summary
    pub details: BTreeMap<String, BTreeMap<String, GroupSummary>>,
}

/// Nested region -> city -> [`CityBucket`] mapping, built incrementally as
/// each file's aggregation is folded in.
///
/// Ordered maps keep the serialized report stable between runs over the
/// same inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsolidatedTree {
    regions: BTreeMap<String, BTreeMap<String, CityBucket>>,
}

impl ConsolidatedTree {
    pub fn new() -> Self {
        ConsolidatedTree::default()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn city(&self, region: &str, city: &str) -> Option<&CityBucket> {
        self.regions.get(region)?.get(city)
    }

    /// Fold one file's aggregated groups into the tree.
    ///
    /// `details[venue][role]` is replaced when a later file carries the same
    /// key, and the replaced summary is subtracted from the city totals
    /// before the new one is added, so `total_allocated`/`total_expected`
    /// always equal the sum over the bucket's current detail leaves, even
    /// when files overlap on a key.
    pub fn merge_groups(&mut self, groups: impl IntoIterator<Item = (GroupKey, GroupSummary)>) {
        for (key, summary) in groups {
            let bucket = self
                .regions
                .entry(key.region)
                .or_default()
                .entry(key.city)
                .or_default();

            let roles = bucket.details.entry(key.venue).or_default();
            if let Some(previous) = roles.insert(key.role, summary) {
                bucket.total_allocated -= previous.allocated_total;
                bucket.total_expected -= previous.expected_total;
            }

            bucket.total_allocated += summary.allocated_total;
            bucket.total_expected += summary.expected_total;
        }
    }

    /// Render the report document.
    ///
    /// Counts serialize as plain JSON integers and non-ASCII names are kept
    /// literal; the file is version-controlled, so the output is
    /// pretty-printed for readable diffs.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize consolidated report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::aggregate::{aggregate_rows, filter_shift};
    use crate::consolidate::types::StaffingRow;

    fn group(
        region: &str,
        city: &str,
        venue: &str,
        role: &str,
        allocated: i64,
        expected: i64,
    ) -> (GroupKey, GroupSummary) {
        (
            GroupKey {
                region: region.to_string(),
                city: city.to_string(),
                venue: venue.to_string(),
                role: role.to_string(),
            },
            GroupSummary {
                allocated_total: allocated,
                expected_total: expected,
                coordination_number: 1,
                venue_id: 100,
            },
        )
    }

    #[test]
    fn test_disjoint_merge_adds_city_totals() {
        let mut tree = ConsolidatedTree::new();
        tree.merge_groups(vec![group("SP", "Santos", "V1", "Fiscal", 2, 3)]);
        tree.merge_groups(vec![group("SP", "Santos", "V2", "Chefe", 4, 5)]);

        let bucket = tree.city("SP", "Santos").unwrap();
        assert_eq!(bucket.total_allocated, 6);
        assert_eq!(bucket.total_expected, 8);
        assert_eq!(bucket.details.len(), 2);
    }

    #[test]
    fn test_overlapping_key_replaces_detail_without_double_count() {
        let mut tree = ConsolidatedTree::new();
        tree.merge_groups(vec![group("SP", "Santos", "V1", "Fiscal", 2, 3)]);
        tree.merge_groups(vec![group("SP", "Santos", "V1", "Fiscal", 10, 20)]);

        let bucket = tree.city("SP", "Santos").unwrap();
        let leaf = &bucket.details["V1"]["Fiscal"];
        assert_eq!(leaf.allocated_total, 10);
        assert_eq!(leaf.expected_total, 20);
        // Totals track the surviving leaf only.
        assert_eq!(bucket.total_allocated, 10);
        assert_eq!(bucket.total_expected, 20);
    }

    #[test]
    fn test_two_row_scenario_builds_expected_tree() {
        let rows = vec![
            StaffingRow {
                shift_key: "T".to_string(),
                region: "SP".to_string(),
                city: "SP".to_string(),
                venue: "V1".to_string(),
                role: "Fiscal".to_string(),
                allocated: 2,
                expected: 3,
                coordination_number: 10,
                venue_id: 100,
            },
            StaffingRow {
                shift_key: "T".to_string(),
                region: "SP".to_string(),
                city: "SP".to_string(),
                venue: "V1".to_string(),
                role: "Coord".to_string(),
                allocated: 1,
                expected: 1,
                coordination_number: 10,
                venue_id: 100,
            },
        ];

        let mut tree = ConsolidatedTree::new();
        tree.merge_groups(aggregate_rows(filter_shift(rows, "T")));

        let bucket = tree.city("SP", "SP").unwrap();
        assert_eq!(bucket.total_allocated, 3);
        assert_eq!(bucket.total_expected, 4);
        assert_eq!(bucket.details["V1"]["Fiscal"].allocated_total, 2);
        assert_eq!(bucket.details["V1"]["Coord"].expected_total, 1);
    }

    #[test]
    fn test_json_round_trips_integer_totals() {
        let mut tree = ConsolidatedTree::new();
        tree.merge_groups(vec![group("MG", "Uberlândia", "Escola São José", "Fiscal", 7, 9)]);

        let json = tree.to_json_string().unwrap();
        let parsed: ConsolidatedTree = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tree);

        // Counts are plain JSON integers, not floats or strings.
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let bucket = &value["MG"]["Uberlândia"];
        assert!(bucket["total_allocated"].is_i64());
        assert_eq!(bucket["total_allocated"], 7);
        assert_eq!(bucket["details"]["Escola São José"]["Fiscal"]["expected"], 9);
    }

    #[test]
    fn test_json_keeps_accents_literal() {
        let mut tree = ConsolidatedTree::new();
        tree.merge_groups(vec![group("CE", "Juazeiro do Norte", "Colégio São João", "Fiscal", 1, 1)]);

        let json = tree.to_json_string().unwrap();
        assert!(json.contains("Colégio São João"));
        assert!(!json.contains("\\u"));
    }
}
