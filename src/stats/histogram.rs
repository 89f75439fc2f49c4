//! Equal-width histograms over numeric columns.

use serde::Serialize;

use crate::domain::{Column, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    /// Non-null values binned; equals the sum of bin counts.
    pub count: usize,
}

impl Histogram {
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Bin the column's numeric values into `bins` equal-width intervals spanning
/// `[min, max]`. The last interval is closed on the right. Returns `None` for a
/// column without numeric values.
pub fn histogram(column: &Column, bins: usize) -> Option<Histogram> {
    let values: Vec<f64> = column.values.iter().filter_map(Value::as_f64).collect();
    let bins = bins.max(1);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    // A constant column gets a unit-wide range centred on the value.
    let (lo, hi) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in &values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }

    Some(Histogram {
        column: column.name.clone(),
        bins: out,
        count: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColumnKind;

    fn prices(values: &[i64]) -> Column {
        Column::new(
            "Price",
            ColumnKind::Integer,
            values.iter().map(|&v| Value::Int(v)).collect(),
        )
    }

    #[test]
    fn counts_sum_to_values_and_max_lands_in_last_bin() {
        let col = prices(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 10]);
        let h = histogram(&col, 5).unwrap();
        assert_eq!(h.bins.len(), 5);
        assert_eq!(h.count, 10);
        assert_eq!(h.bins.iter().map(|b| b.count).sum::<usize>(), 10);
        assert_eq!(h.bins[0].count, 2);
        assert_eq!(h.bins[4].count, 2);
        assert_eq!(h.bins[4].upper, 10.0);
    }

    #[test]
    fn constant_column_fills_one_bin() {
        let h = histogram(&prices(&[7, 7, 7]), 3).unwrap();
        assert_eq!(h.bins[1].count, 3);
        assert_eq!(h.max_count(), 3);
    }

    #[test]
    fn empty_column_has_no_histogram() {
        let col = Column::new("Price", ColumnKind::Float, vec![Value::Null]);
        assert!(histogram(&col, 10).is_none());
    }
}
