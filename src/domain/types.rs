//! Shared domain types.
//!
//! The dataset is held column-wise: every aggregation walks one or two columns
//! at a time, and a record is simply a row index shared by all columns.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::AppError;

pub const DEFAULT_SOURCE: &str = "railway.csv";
pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_CHART_TOP_N: usize = 10;
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;
pub const DEFAULT_HEAD_ROWS: usize = 5;
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// One cell of the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Grouping key for counts and cross-tabulations (`None` for null).
    pub fn label(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NaN"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.1}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format(DEFAULT_TIME_FORMAT)),
        }
    }
}

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
    Date,
    Time,
}

impl ColumnKind {
    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Text => "text",
            ColumnKind::Date => "date",
            ColumnKind::Time => "time",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Columns summarized by value counts rather than moments.
    pub fn is_categorical(self) -> bool {
        matches!(self, ColumnKind::Text | ColumnKind::Time)
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

/// An immutable table of equally long columns.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, AppError> {
        let rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(AppError::Config(format!(
                "Column `{}` has {} values, expected {rows}",
                bad.name,
                bad.values.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Like `column`, but a missing column is an error.
    pub fn require(&self, name: &str) -> Result<&Column, AppError> {
        self.column(name)
            .ok_or_else(|| AppError::UnknownColumn(name.to_string()))
    }

    pub fn row(&self, index: usize) -> Row<'_> {
        Row { dataset: self, index }
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

/// Borrowed view of one record.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.dataset
            .column(column)
            .and_then(|c| c.values.get(self.index))
    }
}

/// Row predicate `column == value`, compared on the cell's label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFilter {
    pub column: String,
    pub equals: String,
}

impl RowFilter {
    pub fn new(column: impl Into<String>, equals: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            equals: equals.into(),
        }
    }

    pub fn matches(&self, row: &Row<'_>) -> bool {
        row.get(&self.column)
            .and_then(Value::label)
            .is_some_and(|label| label == self.equals)
    }
}

impl FromStr for RowFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, value) = s
            .split_once('=')
            .ok_or_else(|| AppError::Config(format!("Invalid filter '{s}': expected COLUMN=VALUE")))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(AppError::Config(format!("Invalid filter '{s}': empty column name")));
        }
        Ok(RowFilter::new(column, value.trim()))
    }
}

impl fmt::Display for RowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.column, self.equals)
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub source_path: PathBuf,
    /// Rows kept in console frequency tables.
    pub top_n: usize,
    /// Bars kept in frequency charts.
    pub chart_top_n: usize,
    pub histogram_bins: usize,
    pub head_rows: usize,
    /// Explicit date format; auto-detected per column when `None`.
    pub date_format: Option<String>,
    pub time_format: String,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_json: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            top_n: DEFAULT_TOP_N,
            chart_top_n: DEFAULT_CHART_TOP_N,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            head_rows: DEFAULT_HEAD_ROWS,
            date_format: None,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            plot: true,
            plot_width: 60,
            plot_height: 16,
            export_json: None,
        }
    }
}
