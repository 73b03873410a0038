//! Reads staffing rows out of the portal's .xls/.xlsx exports

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Reader, open_workbook_auto};

use super::types::StaffingRow;

/// Column headers every export must carry
pub mod cols {
    pub const SHIFT: &str = "DiaTurno";
    pub const REGION: &str = "UF";
    pub const CITY: &str = "Cidade";
    pub const VENUE: &str = "Local";
    pub const ROLE: &str = "Funcao";
    pub const ALLOCATED: &str = "Alocados";
    pub const EXPECTED: &str = "Previstos";
    pub const COORDINATION: &str = "NroCoordenacao";
    pub const VENUE_ID: &str = "LocalProvaID";
}

/// Resolved header positions for one sheet
struct ColumnMap {
    shift: usize,
    region: usize,
    city: usize,
    venue: usize,
    role: usize,
    allocated: usize,
    expected: usize,
    coordination: usize,
    venue_id: usize,
}

impl ColumnMap {
    fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("Missing required column: {}", name))
        };

        Ok(ColumnMap {
            shift: find(cols::SHIFT)?,
            region: find(cols::REGION)?,
            city: find(cols::CITY)?,
            venue: find(cols::VENUE)?,
            role: find(cols::ROLE)?,
            allocated: find(cols::ALLOCATED)?,
            expected: find(cols::EXPECTED)?,
            coordination: find(cols::COORDINATION)?,
            venue_id: find(cols::VENUE_ID)?,
        })
    }
}

/// Load every data row from the first sheet of `path`.
///
/// Returns an empty vec for a sheet with no rows at all, or headers but no
/// data, so the caller can skip the file. A header row that is missing a
/// required column, or a malformed cell, is an error.
pub fn read_staffing_rows(path: &Path) -> Result<Vec<StaffingRow>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Spreadsheet has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Ok(Vec::new());
    };

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| match cell {
            Data::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .collect();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (idx, row) in sheet_rows.enumerate() {
        // Skip fully blank padding rows some exports carry at the bottom.
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let row_num = idx + 2; // 1-based, after the header
        rows.push(parse_row(row, &columns).with_context(|| format!("Row {}", row_num))?);
    }

    Ok(rows)
}

fn parse_row(row: &[Data], columns: &ColumnMap) -> Result<StaffingRow> {
    Ok(StaffingRow {
        shift_key: cell_string(row, columns.shift),
        region: cell_string(row, columns.region),
        city: cell_string(row, columns.city),
        venue: cell_string(row, columns.venue),
        role: cell_string(row, columns.role),
        allocated: cell_int(row, columns.allocated)
            .with_context(|| format!("Bad {} value", cols::ALLOCATED))?,
        expected: cell_int(row, columns.expected)
            .with_context(|| format!("Bad {} value", cols::EXPECTED))?,
        coordination_number: cell_int(row, columns.coordination)
            .with_context(|| format!("Bad {} value", cols::COORDINATION))?,
        venue_id: cell_int(row, columns.venue_id)
            .with_context(|| format!("Bad {} value", cols::VENUE_ID))?,
    })
}

fn cell_string(row: &[Data], idx: usize) -> String {
    match row.get(idx) {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Coerce a numeric cell to i64 at the read boundary.
///
/// Spreadsheet libraries hand integer columns back as floats; accept those
/// only when they carry no fractional part.
fn cell_int(row: &[Data], idx: usize) -> Result<i64> {
    match row.get(idx) {
        Some(Data::Int(i)) => Ok(*i),
        Some(Data::Float(f))
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 =>
        {
            Ok(*f as i64)
        }
        Some(Data::Float(f)) => bail!("expected an integer, got {}", f),
        Some(Data::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| anyhow!("expected an integer, got {:?}", s)),
        Some(Data::Empty) | None => bail!("missing value"),
        Some(other) => bail!("expected an integer, got {:?}", other),
    }
}
