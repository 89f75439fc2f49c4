//! Cross-tabulation of two columns.
//!
//! Labels are `Option<String>` so a null key is its own row/column; every
//! filtered row therefore lands in exactly one cell unless an explicit label
//! order excludes it.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Dataset, RowFilter};
use crate::error::AppError;

/// What to tabulate.
#[derive(Debug, Clone, Default)]
pub struct CrossTabQuery {
    pub rows: String,
    pub cols: String,
    pub filter: Option<RowFilter>,
    /// Restrict rows to these labels, in this order.
    pub row_order: Option<Vec<String>>,
    /// Restrict columns to these labels, in this order.
    pub col_order: Option<Vec<String>>,
}

impl CrossTabQuery {
    pub fn new(rows: impl Into<String>, cols: impl Into<String>) -> Self {
        Self {
            rows: rows.into(),
            cols: cols.into(),
            ..Self::default()
        }
    }

    pub fn filtered(mut self, filter: RowFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_row_order(mut self, order: Vec<String>) -> Self {
        self.row_order = Some(order);
        self
    }

    pub fn with_col_order(mut self, order: Vec<String>) -> Self {
        self.col_order = Some(order);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    pub row_column: String,
    pub col_column: String,
    pub filter: Option<RowFilter>,
    pub row_labels: Vec<Option<String>>,
    pub col_labels: Vec<Option<String>>,
    /// `counts[r][c]`, zero for combinations that never occur.
    pub counts: Vec<Vec<usize>>,
    /// Rows that passed the filter (all rows when unfiltered).
    pub filtered_rows: usize,
}

impl CrossTab {
    pub fn get(&self, row: Option<&str>, col: Option<&str>) -> usize {
        let r = self.row_labels.iter().position(|l| l.as_deref() == row);
        let c = self.col_labels.iter().position(|l| l.as_deref() == col);
        match (r, c) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn row_total(&self, row: usize) -> usize {
        self.counts.get(row).map(|r| r.iter().sum()).unwrap_or(0)
    }
}

/// Axis labels: either fixed up front or grown in first-encountered order.
struct Axis {
    labels: Vec<Option<String>>,
    index: HashMap<Option<String>, usize>,
    fixed: bool,
}

impl Axis {
    fn new(order: Option<&Vec<String>>) -> Self {
        let labels: Vec<Option<String>> = order
            .map(|o| o.iter().cloned().map(Some).collect())
            .unwrap_or_default();
        let index = labels
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, l)| (l, i))
            .collect();
        Self {
            labels,
            index,
            fixed: order.is_some(),
        }
    }

    fn accepts(&self, label: &Option<String>) -> bool {
        !self.fixed || self.index.contains_key(label)
    }

    /// Position of `label`, and whether it was just added.
    fn slot(&mut self, label: Option<String>) -> (usize, bool) {
        if let Some(&i) = self.index.get(&label) {
            return (i, false);
        }
        let i = self.labels.len();
        self.index.insert(label.clone(), i);
        self.labels.push(label);
        (i, true)
    }
}

pub fn crosstab(dataset: &Dataset, query: &CrossTabQuery) -> Result<CrossTab, AppError> {
    let row_values = &dataset.require(&query.rows)?.values;
    let col_values = &dataset.require(&query.cols)?.values;
    if let Some(filter) = &query.filter {
        dataset.require(&filter.column)?;
    }

    let mut rows = Axis::new(query.row_order.as_ref());
    let mut cols = Axis::new(query.col_order.as_ref());
    let mut counts: Vec<Vec<usize>> = vec![vec![0; cols.labels.len()]; rows.labels.len()];
    let mut filtered_rows = 0usize;

    for idx in 0..dataset.rows() {
        if let Some(filter) = &query.filter {
            if !filter.matches(&dataset.row(idx)) {
                continue;
            }
        }
        filtered_rows += 1;

        let row_label = row_values[idx].label();
        let col_label = col_values[idx].label();
        if !rows.accepts(&row_label) || !cols.accepts(&col_label) {
            continue;
        }

        let (r, new_row) = rows.slot(row_label);
        if new_row {
            counts.push(vec![0; cols.labels.len()]);
        }
        let (c, new_col) = cols.slot(col_label);
        if new_col {
            for row in counts.iter_mut() {
                row.push(0);
            }
        }
        counts[r][c] += 1;
    }

    Ok(CrossTab {
        row_column: query.rows.clone(),
        col_column: query.cols.clone(),
        filter: query.filter.clone(),
        row_labels: rows.labels,
        col_labels: cols.labels,
        counts,
        filtered_rows,
    })
}

/// Null-aware label rendering shared by the text and chart outputs.
pub fn display_label(label: &Option<String>) -> &str {
    label.as_deref().unwrap_or("(null)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{JOURNEY_STATUS, REASON_FOR_DELAY, REFUND_REQUEST, STATUS_DELAYED};
    use crate::domain::{Column, ColumnKind, Value};

    fn text_column(name: &str, values: &[Option<&str>]) -> Column {
        Column::new(
            name,
            ColumnKind::Text,
            values
                .iter()
                .map(|v| v.map(|s| Value::Text(s.to_string())).unwrap_or(Value::Null))
                .collect(),
        )
    }

    fn delays() -> Dataset {
        Dataset::new(vec![
            text_column(JOURNEY_STATUS, &[Some("Delayed"), Some("Delayed"), Some("On Time")]),
            text_column(REASON_FOR_DELAY, &[Some("Weather"), Some("Weather"), None]),
            text_column(REFUND_REQUEST, &[Some("Yes"), Some("No"), None]),
        ])
        .unwrap()
    }

    #[test]
    fn delayed_reason_by_refund() {
        let query = CrossTabQuery::new(REASON_FOR_DELAY, REFUND_REQUEST)
            .filtered(RowFilter::new(JOURNEY_STATUS, STATUS_DELAYED));
        let table = crosstab(&delays(), &query).unwrap();

        assert_eq!(table.filtered_rows, 2);
        assert_eq!(table.row_labels, vec![Some("Weather".to_string())]);
        assert_eq!(table.get(Some("Weather"), Some("Yes")), 1);
        assert_eq!(table.get(Some("Weather"), Some("No")), 1);
        assert_eq!(table.total(), table.filtered_rows);
    }

    #[test]
    fn unfiltered_includes_null_keys() {
        let table = crosstab(&delays(), &CrossTabQuery::new(REASON_FOR_DELAY, REFUND_REQUEST)).unwrap();
        assert_eq!(table.filtered_rows, 3);
        assert_eq!(table.get(None, None), 1);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn missing_combinations_are_zero() {
        let ds = Dataset::new(vec![
            text_column("a", &[Some("x"), Some("y")]),
            text_column("b", &[Some("1"), Some("2")]),
        ])
        .unwrap();
        let table = crosstab(&ds, &CrossTabQuery::new("a", "b")).unwrap();
        assert_eq!(table.counts, vec![vec![1, 0], vec![0, 1]]);
        assert_eq!(table.row_total(1), 1);
    }

    #[test]
    fn explicit_order_restricts_and_orders_labels() {
        let ds = Dataset::new(vec![
            text_column("station", &[Some("York"), Some("Leeds"), Some("Bath"), Some("Leeds")]),
            text_column("class", &[Some("Standard"), Some("First Class"), Some("Standard"), Some("Standard")]),
        ])
        .unwrap();
        let query = CrossTabQuery::new("station", "class")
            .with_row_order(vec!["Leeds".to_string(), "York".to_string()]);
        let table = crosstab(&ds, &query).unwrap();

        assert_eq!(
            table.row_labels,
            vec![Some("Leeds".to_string()), Some("York".to_string())]
        );
        assert_eq!(
            table.col_labels,
            vec![Some("Standard".to_string()), Some("First Class".to_string())]
        );
        assert_eq!(table.counts, vec![vec![1, 1], vec![1, 0]]);
        assert_eq!(table.filtered_rows, 4);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn filter_column_must_exist() {
        let query = CrossTabQuery::new(REASON_FOR_DELAY, REFUND_REQUEST)
            .filtered(RowFilter::new("Status", STATUS_DELAYED));
        assert!(matches!(crosstab(&delays(), &query), Err(AppError::UnknownColumn(_))));
    }
}
