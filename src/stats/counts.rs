//! Frequency tables (value counts).
//!
//! Entries are ordered by count descending; equal counts keep the order in
//! which the values first appear in the data. Nulls are not an entry but are
//! kept as a separate bucket, so `counted() + nulls == rows`.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Column, Dataset};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    pub column: String,
    pub entries: Vec<FrequencyEntry>,
    pub nulls: usize,
    /// Rows the table was computed over.
    pub rows: usize,
    /// Distinct non-null values before any truncation.
    pub distinct: usize,
}

impl FrequencyTable {
    /// Keep only the `n` most frequent entries.
    pub fn top(&self, n: usize) -> FrequencyTable {
        FrequencyTable {
            entries: self.entries.iter().take(n).cloned().collect(),
            column: self.column.clone(),
            ..*self
        }
    }

    /// Sum of the listed entries (excludes nulls).
    pub fn counted(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn is_truncated(&self) -> bool {
        self.entries.len() < self.distinct
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.value.clone()).collect()
    }

    pub fn max_count(&self) -> usize {
        self.entries.iter().map(|e| e.count).max().unwrap_or(0)
    }
}

/// Value counts of a named column.
pub fn value_counts(dataset: &Dataset, column: &str) -> Result<FrequencyTable, AppError> {
    Ok(frequency_table(dataset.require(column)?))
}

pub fn frequency_table(column: &Column) -> FrequencyTable {
    let mut entries: Vec<FrequencyEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut nulls = 0usize;

    for value in &column.values {
        let Some(label) = value.label() else {
            nulls += 1;
            continue;
        };
        match index.get(&label) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(label.clone(), entries.len());
                entries.push(FrequencyEntry {
                    value: label,
                    count: 1,
                });
            }
        }
    }

    // Stable: ties stay in first-encountered order.
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    FrequencyTable {
        column: column.name.clone(),
        distinct: entries.len(),
        entries,
        nulls,
        rows: column.values.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnKind, Value};

    fn column(values: &[Option<&str>]) -> Column {
        Column::new(
            "Departure Station",
            ColumnKind::Text,
            values
                .iter()
                .map(|v| v.map(|s| Value::Text(s.to_string())).unwrap_or(Value::Null))
                .collect(),
        )
    }

    #[test]
    fn orders_by_count_then_first_seen() {
        let col = column(&[
            Some("York"),
            Some("Reading"),
            Some("London Euston"),
            Some("Reading"),
            None,
            Some("London Euston"),
            Some("Oxford"),
        ]);
        let table = frequency_table(&col);
        assert_eq!(
            table.labels(),
            vec!["Reading", "London Euston", "York", "Oxford"]
        );
        assert_eq!(table.nulls, 1);
        assert_eq!(table.counted() + table.nulls, table.rows);
    }

    #[test]
    fn top_truncates_but_keeps_totals() {
        let col = column(&[Some("a"), Some("b"), Some("b"), Some("c"), None]);
        let table = frequency_table(&col).top(2);
        assert_eq!(table.labels(), vec!["b", "a"]);
        assert!(table.is_truncated());
        assert_eq!(table.rows, 5);
        assert_eq!(table.distinct, 3);
        assert_eq!(table.max_count(), 2);
    }

    #[test]
    fn numeric_values_are_counted_by_label() {
        let col = Column::new(
            "Price",
            ColumnKind::Integer,
            vec![Value::Int(3), Value::Int(43), Value::Int(3)],
        );
        let table = frequency_table(&col);
        assert_eq!(table.entries[0], FrequencyEntry { value: "3".to_string(), count: 2 });
    }

    #[test]
    fn unknown_column_is_an_error() {
        let ds = Dataset::new(vec![column(&[Some("a")])]).unwrap();
        assert!(matches!(value_counts(&ds, "Nope"), Err(AppError::UnknownColumn(_))));
        assert_eq!(value_counts(&ds, "Departure Station").unwrap().rows, 1);
    }
}
