//! User combination import from CSV
//!
//! One combination per row after a header row. Blank cells are treated as
//! missing data and dropped; whatever remains must be six distinct numbers.

use serde::Serialize;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, SenaForgeError};
use crate::types::Combination;

/// A row that became a valid combination
#[derive(Debug, Clone, Serialize)]
pub struct ImportedRow {
    /// 1-based data row index, header excluded
    pub row: usize,
    pub combination: Combination,
}

/// A row that parsed but cannot be played
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub row: usize,
    pub values: Vec<i64>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub accepted: Vec<ImportedRow>,
    pub rejected: Vec<RejectedRow>,
}

impl ImportReport {
    pub fn combinations(&self) -> Vec<Combination> {
        self.accepted.iter().map(|r| r.combination).collect()
    }

    pub fn total_rows(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }
}

/// Read combinations from a CSV file on disk
pub fn import_file(path: &Path) -> Result<ImportReport> {
    let file = std::fs::File::open(path).map_err(|e| {
        SenaForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })?;
    import_reader(file)
}

/// Read combinations from any CSV source
pub fn import_reader<R: Read>(reader: R) -> Result<ImportReport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut report = ImportReport::default();

    for (index, record) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = record?;
        let values = clean_row(&record, row)?;

        if values.is_empty() {
            tracing::debug!(row = %row, "Skipping empty row");
            continue;
        }

        match Combination::from_values(&values) {
            Ok(combination) => report.accepted.push(ImportedRow { row, combination }),
            Err(e) => {
                tracing::debug!(row = %row, error = %e, "Row rejected");
                report.rejected.push(RejectedRow {
                    row,
                    values,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        accepted = %report.accepted.len(),
        rejected = %report.rejected.len(),
        "Combination import completed"
    );

    Ok(report)
}

/// Drop blank cells and parse the rest as integers
fn clean_row(record: &csv::StringRecord, row: usize) -> Result<Vec<i64>> {
    record
        .iter()
        .filter(|cell| !cell.is_empty())
        .map(|cell| {
            parse_cell(cell).ok_or_else(|| {
                SenaForgeError::data_format(
                    format!("row {}: '{}' is not a whole number", row, cell),
                    None,
                )
            })
        })
        .collect()
}

/// Accepts "7" as well as spreadsheet-style "7.0"
fn parse_cell(cell: &str) -> Option<i64> {
    if let Ok(v) = cell.parse::<i64>() {
        return Some(v);
    }
    let v = cell.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 {
        Some(v as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_valid_rows() {
        let data = "n1,n2,n3,n4,n5,n6\n1,2,3,4,5,6\n60,50,40,30,20,10\n";
        let report = import_reader(data.as_bytes()).unwrap();
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.accepted[1].row, 2);
        assert_eq!(report.accepted[1].combination.numbers(), &[10, 20, 30, 40, 50, 60]);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn test_missing_cells_are_dropped() {
        let data = "n1,n2,n3,n4,n5,n6,n7\n1,2,,3,4,5,6\n7,8,9\n";
        let report = import_reader(data.as_bytes()).unwrap();
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].combination.numbers(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].values, vec![7, 8, 9]);
        assert_eq!(report.total_rows(), 2);
    }

    #[test]
    fn test_float_cells() {
        let data = "a,b,c,d,e,f\n1.0,2.0,3.0,4.0,5.0,6.0\n";
        let report = import_reader(data.as_bytes()).unwrap();
        assert_eq!(report.combinations().len(), 1);
    }

    #[test]
    fn test_non_numeric_cell_fails() {
        let data = "a,b,c,d,e,f\n1,2,x,4,5,6\n";
        let err = import_reader(data.as_bytes()).unwrap_err();
        assert!(err.is_data_format());
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_out_of_range_row_rejected() {
        let data = "a,b,c,d,e,f\n1,2,3,4,5,61\n0,2,3,4,5,6\n1,1,2,3,4,5\n";
        let report = import_reader(data.as_bytes()).unwrap();
        assert!(report.accepted.is_empty());
        assert_eq!(report.rejected.len(), 3);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("12"), Some(12));
        assert_eq!(parse_cell("12.0"), Some(12));
        assert_eq!(parse_cell("12.5"), None);
        assert_eq!(parse_cell("abc"), None);
    }
}
