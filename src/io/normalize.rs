//! Date/time normalization.
//!
//! Converts the raw text date and time columns into typed `Date`/`Time`
//! columns. Strict columns abort the run on the first value that does not
//! match; the lenient actual-arrival column turns such values into nulls and
//! records them as `SoftParseFailure`s. Rows are never dropped.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::schema::{DATE_COLUMNS, LENIENT_TIME_COLUMNS, STRICT_TIME_COLUMNS};
use crate::domain::{AnalysisConfig, Column, ColumnKind, Dataset, Value};
use crate::error::AppError;

/// Candidate date formats, tried in order against a column's first value.
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// A lenient-column value that could not be parsed and was replaced by null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftParseFailure {
    pub column: String,
    pub line: usize,
    pub value: String,
}

/// Output of the normalization stage.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub dataset: Dataset,
    pub soft_failures: Vec<SoftParseFailure>,
    /// `(column, format)` actually used for each converted column.
    pub formats: Vec<(String, String)>,
}

pub fn normalize(dataset: Dataset, config: &AnalysisConfig) -> Result<Normalized, AppError> {
    let rows = dataset.rows();
    let mut soft_failures = Vec::new();
    let mut formats = Vec::new();
    let mut columns = Vec::with_capacity(dataset.column_count());

    for column in dataset.into_columns() {
        let name = column.name.as_str();
        let converted = if DATE_COLUMNS.contains(&name) {
            let format = resolve_date_format(&column, config.date_format.as_deref())?;
            let converted = parse_date_column(&column, &format)?;
            formats.push((column.name.clone(), format));
            converted
        } else if STRICT_TIME_COLUMNS.contains(&name) {
            formats.push((column.name.clone(), config.time_format.clone()));
            parse_time_column_strict(&column, &config.time_format)?
        } else if LENIENT_TIME_COLUMNS.contains(&name) {
            formats.push((column.name.clone(), config.time_format.clone()));
            parse_time_column_lenient(&column, &config.time_format, &mut soft_failures)
        } else {
            column
        };
        columns.push(converted);
    }

    let dataset = Dataset::new(columns)?;
    debug_assert_eq!(dataset.rows(), rows);

    if !soft_failures.is_empty() {
        warn!(
            count = soft_failures.len(),
            "unparseable lenient time values replaced by null"
        );
    }
    info!(rows, converted = formats.len(), "normalized date/time columns");

    Ok(Normalized {
        dataset,
        soft_failures,
        formats,
    })
}

/// Parse a time-of-day with the given format. Leap seconds (`23:59:60`) are
/// rejected.
pub fn parse_time(value: &str, format: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, format)
        .ok()
        .filter(|t| t.nanosecond() < 1_000_000_000)
}

fn resolve_date_format(column: &Column, explicit: Option<&str>) -> Result<String, AppError> {
    if let Some(format) = explicit {
        return Ok(format.to_string());
    }

    let Some((idx, first)) = column
        .values
        .iter()
        .enumerate()
        .find_map(|(idx, v)| v.label().map(|s| (idx, s)))
    else {
        // Nothing to parse; any format will do.
        return Ok(DATE_FORMATS[0].to_string());
    };

    DATE_FORMATS
        .iter()
        .find(|fmt| NaiveDate::parse_from_str(&first, fmt).is_ok())
        .map(|fmt| (*fmt).to_string())
        .ok_or_else(|| AppError::Parse {
            column: column.name.clone(),
            line: line_of(idx),
            value: first,
            expected: format!("date in one of: {}", DATE_FORMATS.join(", ")),
        })
}

fn parse_date_column(column: &Column, format: &str) -> Result<Column, AppError> {
    let mut values = Vec::with_capacity(column.values.len());
    for (idx, value) in column.values.iter().enumerate() {
        let Some(raw) = value.label() else {
            values.push(Value::Null);
            continue;
        };
        let date = NaiveDate::parse_from_str(&raw, format).map_err(|_| AppError::Parse {
            column: column.name.clone(),
            line: line_of(idx),
            value: raw.clone(),
            expected: format!("date in format {format}"),
        })?;
        values.push(Value::Date(date));
    }
    Ok(Column::new(column.name.clone(), ColumnKind::Date, values))
}

fn parse_time_column_strict(column: &Column, format: &str) -> Result<Column, AppError> {
    let mut values = Vec::with_capacity(column.values.len());
    for (idx, value) in column.values.iter().enumerate() {
        let Some(raw) = value.label() else {
            values.push(Value::Null);
            continue;
        };
        let time = parse_time(&raw, format).ok_or_else(|| AppError::Parse {
            column: column.name.clone(),
            line: line_of(idx),
            value: raw.clone(),
            expected: format!("time in format {format}"),
        })?;
        values.push(Value::Time(time));
    }
    Ok(Column::new(column.name.clone(), ColumnKind::Time, values))
}

fn parse_time_column_lenient(
    column: &Column,
    format: &str,
    failures: &mut Vec<SoftParseFailure>,
) -> Column {
    let values = column
        .values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let Some(raw) = value.label() else {
                return Value::Null;
            };
            match parse_time(&raw, format) {
                Some(time) => Value::Time(time),
                None => {
                    debug!(column = %column.name, line = line_of(idx), value = %raw, "soft parse failure");
                    failures.push(SoftParseFailure {
                        column: column.name.clone(),
                        line: line_of(idx),
                        value: raw,
                    });
                    Value::Null
                }
            }
        })
        .collect();
    Column::new(column.name.clone(), ColumnKind::Time, values)
}

/// 1-based file line of a record (the header is line 1).
fn line_of(row_index: usize) -> usize {
    row_index + 2
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::domain::schema;
    use crate::io::ingest::read_dataset;
    use crate::io::ingest::tests::sample_csv;

    fn load(text: &str) -> Dataset {
        read_dataset(text.as_bytes(), Path::new("fixture.csv")).unwrap()
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig::new("fixture.csv")
    }

    #[test]
    fn converts_date_and_time_columns() {
        let out = normalize(load(&sample_csv()), &config()).unwrap();
        let ds = &out.dataset;

        for name in schema::DATE_COLUMNS {
            assert_eq!(ds.column(name).unwrap().kind, ColumnKind::Date);
        }
        for name in schema::STRICT_TIME_COLUMNS.iter().chain(schema::LENIENT_TIME_COLUMNS.iter()) {
            assert_eq!(ds.column(name).unwrap().kind, ColumnKind::Time);
        }
        assert_eq!(
            ds.column(schema::DATE_OF_JOURNEY).unwrap().values[0],
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert!(out.soft_failures.is_empty());
        assert_eq!(ds.rows(), 6);
    }

    #[test]
    fn lenient_column_nulls_bad_values_and_keeps_rows() {
        let text = sample_csv()
            .replace("11:35:00,11:40:00", "11:35:00,11:40")
            .replace("22:30:00,22:30:00", "22:30:00,late");
        let raw = load(&text);
        let raw_nulls = raw.column(schema::ACTUAL_ARRIVAL_TIME).unwrap().null_count();

        let out = normalize(raw, &config()).unwrap();
        assert_eq!(out.dataset.rows(), 6);
        assert_eq!(out.soft_failures.len(), 2);
        assert_eq!(out.soft_failures[0].line, 3);
        assert_eq!(out.soft_failures[1].value, "late");

        // Null audit on the lenient column is exactly the raw nulls plus the
        // values that failed to parse. Other optional columns are not lenient:
        // a bad `Arrival Time` still aborts (see strict_time_column_fails).
        let nulls = out.dataset.column(schema::ACTUAL_ARRIVAL_TIME).unwrap().null_count();
        assert_eq!(nulls, raw_nulls + out.soft_failures.len());
    }

    #[test]
    fn strict_time_column_fails() {
        let text = sample_csv().replace("09:45:00,11:35:00", "09:45:00,11h35");
        let err = normalize(load(&text), &config()).unwrap_err();
        match err {
            AppError::Parse { column, line, value, .. } => {
                assert_eq!(column, schema::ARRIVAL_TIME);
                assert_eq!(line, 3);
                assert_eq!(value, "11h35");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn date_format_is_detected_then_enforced() {
        let text = sample_csv()
            .replace("2023-12-08", "08/12/2023")
            .replace("2023-12-16", "16/12/2023")
            .replace("2023-12-19", "19/12/2023")
            .replace("2023-12-20", "20/12/2023")
            .replace("2023-12-27", "27/12/2023")
            .replace("2023-12-30", "30/12/2023");
        let out = normalize(load(&text), &config()).unwrap();
        assert!(out
            .formats
            .contains(&(schema::DATE_OF_PURCHASE.to_string(), "%d/%m/%Y".to_string())));

        // A second format later in the column is not accepted.
        let mixed = sample_csv().replace("2023-12-16", "16/12/2023");
        let err = normalize(load(&mixed), &config()).unwrap_err();
        assert!(matches!(err, AppError::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn explicit_date_format_overrides_detection() {
        let mut cfg = config();
        cfg.date_format = Some("%d/%m/%Y".to_string());
        let err = normalize(load(&sample_csv()), &cfg).unwrap_err();
        assert!(matches!(err, AppError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn time_round_trips_through_format() {
        for secs in 0..86_400u32 {
            let raw = format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60);
            let t = parse_time(&raw, "%H:%M:%S").unwrap();
            assert_eq!(t.num_seconds_from_midnight(), secs);
            assert_eq!(t.format("%H:%M:%S").to_string(), raw);
        }
    }

    #[test]
    fn leap_second_is_not_a_time() {
        assert_eq!(parse_time("23:59:60", "%H:%M:%S"), None);

        let strict = sample_csv().replace("09:45:00,11:35:00", "09:45:00,23:59:60");
        let err = normalize(load(&strict), &config()).unwrap_err();
        assert!(
            matches!(&err, AppError::Parse { value, line: 3, .. } if value == "23:59:60"),
            "{err}"
        );

        let lenient = sample_csv().replace("11:35:00,11:40:00", "11:35:00,23:59:60");
        let out = normalize(load(&lenient), &config()).unwrap();
        assert_eq!(out.soft_failures.len(), 1);
        assert_eq!(out.soft_failures[0].value, "23:59:60");
    }
}
