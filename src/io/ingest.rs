//! CSV ingest.
//!
//! Turns the ticket-purchase CSV into an in-memory `Dataset`:
//! - **Strict structure**: every record must have as many fields as the header
//! - **Strict schema**: all expected columns must be present
//! - **Raw typing only**: integer/float/text per column; dates and times are
//!   left as text for `io::normalize`

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::schema::{REQUIRED_COLUMNS, canonical_name};
use crate::domain::{Column, ColumnKind, Dataset, Value};
use crate::error::AppError;

/// Cell contents read as missing values.
pub const NULL_TOKENS: [&str; 11] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "<NA>", "#N/A",
];

/// Load the CSV at `path`. The file is closed before this returns.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path).map_err(|e| AppError::read(path, e.to_string()))?;
    let dataset = read_dataset(file, path)?;

    info!(
        path = %path.display(),
        rows = dataset.rows(),
        columns = dataset.column_count(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Parse CSV from any reader; `origin` is only used in error messages.
pub fn read_dataset<R: Read>(input: R, origin: &Path) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::read(origin, format!("failed to read header: {e}")))?
        .clone();

    let names = resolve_headers(&headers);
    ensure_required_columns_exist(&names)?;

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for result in reader.records() {
        let record = result.map_err(|e| AppError::read(origin, describe_csv_error(&e)))?;
        for (idx, field) in record.iter().enumerate() {
            cells[idx].push(parse_cell(field));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| {
            let kind = infer_kind(&raw);
            debug!(column = %name, kind = kind.label(), "inferred raw column type");
            Column::new(name, kind, convert(raw, kind))
        })
        .collect();

    Dataset::new(columns)
}

fn resolve_headers(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .map(|raw| {
            // Spreadsheet exports often prefix the first header with a BOM.
            let name = raw.trim().trim_start_matches('\u{feff}');
            canonical_name(name)
                .map(str::to_string)
                .unwrap_or_else(|| name.to_string())
        })
        .collect()
}

fn ensure_required_columns_exist(names: &[String]) -> Result<(), AppError> {
    match REQUIRED_COLUMNS
        .iter()
        .find(|required| !names.iter().any(|n| n == *required))
    {
        Some(missing) => Err(AppError::MissingColumn((*missing).to_string())),
        None => Ok(()),
    }
}

fn describe_csv_error(err: &csv::Error) -> String {
    match err.position() {
        Some(pos) => format!("malformed record at line {}: {err}", pos.line()),
        None => format!("malformed record: {err}"),
    }
}

fn parse_cell(field: &str) -> Option<String> {
    if NULL_TOKENS.contains(&field) {
        None
    } else {
        Some(field.to_string())
    }
}

fn infer_kind(raw: &[Option<String>]) -> ColumnKind {
    let mut present = raw.iter().flatten().peekable();
    if present.peek().is_none() {
        return ColumnKind::Text;
    }

    let present: Vec<&String> = present.collect();
    if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else {
        ColumnKind::Text
    }
}

fn convert(raw: Vec<Option<String>>, kind: ColumnKind) -> Vec<Value> {
    raw.into_iter()
        .map(|cell| match cell {
            None => Value::Null,
            Some(s) => match kind {
                ColumnKind::Integer => s.parse().map(Value::Int).unwrap_or(Value::Null),
                ColumnKind::Float => s
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(Value::Float)
                    .unwrap_or(Value::Null),
                _ => Value::Text(s),
            },
        })
        .collect()
}
