//! Export computed aggregates.
//!
//! The JSON export mirrors `EdaReport` field for field; the CSV export writes
//! one cross-tab as a spreadsheet-friendly grid.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::AppError;
use crate::report::EdaReport;
use crate::stats::CrossTab;
use crate::stats::crosstab::display_label;

/// Write the full report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &EdaReport) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::write(path, e.to_string()))?;
    let mut out = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut out, report).map_err(|e| AppError::write(path, e.to_string()))?;
    writeln!(out).map_err(|e| AppError::write(path, e.to_string()))?;
    out.flush().map_err(|e| AppError::write(path, e.to_string()))?;

    info!(path = %path.display(), "wrote JSON report");
    Ok(())
}

/// Write a cross-tab as CSV: a header of column labels, then one line per row label.
pub fn write_crosstab_csv(path: &Path, table: &CrossTab) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| AppError::write(path, e.to_string()))?;

    let mut header = vec![table.row_column.clone()];
    header.extend(table.col_labels.iter().map(|l| display_label(l).to_string()));
    writer
        .write_record(&header)
        .map_err(|e| AppError::write(path, e.to_string()))?;

    for (label, counts) in table.row_labels.iter().zip(&table.counts) {
        let mut record = vec![display_label(label).to_string()];
        record.extend(counts.iter().map(|c| c.to_string()));
        writer
            .write_record(&record)
            .map_err(|e| AppError::write(path, e.to_string()))?;
    }
    writer.flush().map_err(|e| AppError::write(path, e.to_string()))?;

    info!(path = %path.display(), rows = table.row_labels.len(), "wrote cross-tab CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, ColumnKind, Dataset, Value};
    use crate::stats::{CrossTabQuery, crosstab};

    fn table() -> CrossTab {
        let text = |name: &str, values: &[&str]| {
            Column::new(
                name,
                ColumnKind::Text,
                values.iter().map(|s| Value::Text(s.to_string())).collect(),
            )
        };
        let ds = Dataset::new(vec![
            text("Ticket Class", &["Standard", "First Class", "Standard"]),
            text("Ticket Type", &["Advance", "Advance", "Off-Peak"]),
        ])
        .unwrap();
        crosstab(&ds, &CrossTabQuery::new("Ticket Class", "Ticket Type")).unwrap()
    }

    #[test]
    fn crosstab_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classes.csv");
        write_crosstab_csv(&path, &table()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Ticket Class,Advance,Off-Peak\nStandard,1,1\nFirst Class,1,0\n"
        );
    }

    #[test]
    fn unwritable_path_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_crosstab_csv(&path, &table()).unwrap_err();
        assert!(matches!(err, AppError::Write { .. }));
        assert_eq!(err.exit_code(), 4);
    }
}
