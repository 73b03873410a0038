//! Shift filtering and per-file aggregation

use std::collections::HashMap;

use super::types::{GroupKey, GroupSummary, StaffingRow};

/// Keep only rows whose shift key exactly equals `shift_key`.
///
/// Exact string equality, no normalization. Zero matches is a valid,
/// empty result.
pub fn filter_shift(rows: Vec<StaffingRow>, shift_key: &str) -> Vec<StaffingRow> {
    rows.into_iter()
        .filter(|row| row.shift_key == shift_key)
        .collect()
}

/// Group rows by (region, city, venue, role) and sum their counts.
///
/// Representative metadata is taken from the first row encountered per
/// group, in input order.
pub fn aggregate_rows(rows: Vec<StaffingRow>) -> HashMap<GroupKey, GroupSummary> {
    let mut groups: HashMap<GroupKey, GroupSummary> = HashMap::new();

    for row in rows {
        let key = GroupKey::from_row(&row);
        groups
            .entry(key)
            .or_insert_with(|| GroupSummary::from_row(&row))
            .add_row(&row);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(shift: &str, venue: &str, role: &str, allocated: i64, expected: i64) -> StaffingRow {
        StaffingRow {
            shift_key: shift.to_string(),
            region: "GO".to_string(),
            city: "Goiânia".to_string(),
            venue: venue.to_string(),
            role: role.to_string(),
            allocated,
            expected,
            coordination_number: 7,
            venue_id: 910,
        }
    }

    #[test]
    fn test_filter_is_exact_match() {
        let rows = vec![
            row("05/11/2023 - Tarde", "V1", "Fiscal", 1, 1),
            row("05/11/2023 - Manhã", "V1", "Fiscal", 2, 2),
            row("05/11/2023 - tarde", "V1", "Fiscal", 3, 3),
        ];

        let kept = filter_shift(rows, "05/11/2023 - Tarde");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].allocated, 1);
    }

    #[test]
    fn test_filter_no_matches_is_empty_not_error() {
        let rows = vec![row("05/11/2023 - Manhã", "V1", "Fiscal", 2, 2)];
        assert!(filter_shift(rows, "05/11/2023 - Tarde").is_empty());
    }

    #[test]
    fn test_aggregate_sums_per_group() {
        let rows = vec![
            row("T", "V1", "Fiscal", 2, 3),
            row("T", "V1", "Fiscal", 5, 7),
            row("T", "V1", "Coordenador", 1, 1),
            row("T", "V2", "Fiscal", 4, 4),
        ];

        let groups = aggregate_rows(rows);
        assert_eq!(groups.len(), 3);

        let fiscal_v1 = &groups[&GroupKey {
            region: "GO".to_string(),
            city: "Goiânia".to_string(),
            venue: "V1".to_string(),
            role: "Fiscal".to_string(),
        }];
        assert_eq!(fiscal_v1.allocated_total, 7);
        assert_eq!(fiscal_v1.expected_total, 10);
    }

    #[test]
    fn test_aggregate_metadata_from_first_row() {
        let mut first = row("T", "V1", "Fiscal", 1, 1);
        first.coordination_number = 99;
        first.venue_id = 1234;
        let second = row("T", "V1", "Fiscal", 1, 1);

        let groups = aggregate_rows(vec![first.clone(), second]);
        let summary = &groups[&GroupKey::from_row(&first)];
        assert_eq!(summary.coordination_number, 99);
        assert_eq!(summary.venue_id, 1234);
    }
}
