//! Whole-table summaries: shape, schema, null audit, numeric and categorical
//! descriptions, price statistics and row previews.

use serde::Serialize;

use crate::domain::schema::PRICE;
use crate::domain::{Column, ColumnKind, Dataset, Value};
use crate::error::AppError;
use crate::stats::counts::frequency_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnType {
    pub column: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullCount {
    pub column: String,
    pub nulls: usize,
}

/// Count/moments/quantiles of one numeric column. Statistics are `None` when
/// the column has no values (and `std` when it has fewer than two).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

/// A slice of consecutive rows, for head/tail listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPreview {
    pub columns: Vec<String>,
    /// 0-based index of each listed row.
    pub index: Vec<usize>,
    pub rows: Vec<Vec<Value>>,
}

pub fn shape(dataset: &Dataset) -> Shape {
    Shape {
        rows: dataset.rows(),
        columns: dataset.column_count(),
    }
}

pub fn schema_summary(dataset: &Dataset) -> Vec<ColumnType> {
    dataset
        .columns()
        .iter()
        .map(|c| ColumnType {
            column: c.name.clone(),
            kind: c.kind,
        })
        .collect()
}

pub fn null_audit(dataset: &Dataset) -> Vec<NullCount> {
    dataset
        .columns()
        .iter()
        .map(|c| NullCount {
            column: c.name.clone(),
            nulls: c.null_count(),
        })
        .collect()
}

pub fn numeric_summary(column: &Column) -> NumericSummary {
    let mut values: Vec<f64> = column.values.iter().filter_map(Value::as_f64).collect();
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = mean(&values);
    let std = match (mean, count) {
        (Some(m), n) if n >= 2 => {
            let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
            Some((ss / (n as f64 - 1.0)).sqrt())
        }
        _ => None,
    };

    NumericSummary {
        column: column.name.clone(),
        count,
        mean,
        std,
        min: values.first().copied(),
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values.last().copied(),
    }
}

/// Numeric summary of every integer/float column, in column order.
pub fn describe_numeric(dataset: &Dataset) -> Vec<NumericSummary> {
    dataset
        .columns()
        .iter()
        .filter(|c| c.kind.is_numeric())
        .map(numeric_summary)
        .collect()
}

/// Count/unique/top/freq of every text and time-of-day column.
pub fn describe_categorical(dataset: &Dataset) -> Vec<CategoricalSummary> {
    dataset
        .columns()
        .iter()
        .filter(|c| c.kind.is_categorical())
        .map(|c| {
            let table = frequency_table(c);
            let top = table.entries.first();
            CategoricalSummary {
                column: c.name.clone(),
                count: table.counted(),
                unique: table.distinct,
                top: top.map(|e| e.value.clone()),
                freq: top.map(|e| e.count).unwrap_or(0),
            }
        })
        .collect()
}

/// Min/max/mean/median of the price column; `None` when it holds no values.
pub fn price_stats(dataset: &Dataset) -> Result<Option<PriceStats>, AppError> {
    let summary = numeric_summary(dataset.require(PRICE)?);
    Ok(match (summary.min, summary.max, summary.mean, summary.median) {
        (Some(min), Some(max), Some(mean), Some(median)) => Some(PriceStats {
            min,
            max,
            mean,
            median,
        }),
        _ => None,
    })
}

pub fn head(dataset: &Dataset, n: usize) -> RowPreview {
    preview(dataset, 0, n.min(dataset.rows()))
}

pub fn tail(dataset: &Dataset, n: usize) -> RowPreview {
    let n = n.min(dataset.rows());
    preview(dataset, dataset.rows() - n, n)
}

fn preview(dataset: &Dataset, start: usize, len: usize) -> RowPreview {
    let index: Vec<usize> = (start..start + len).collect();
    let rows = index
        .iter()
        .map(|&i| dataset.columns().iter().map(|c| c.values[i].clone()).collect())
        .collect();
    RowPreview {
        columns: dataset.column_names(),
        index,
        rows,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Quantile of sorted values with linear interpolation between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn prices(values: &[Option<f64>]) -> Dataset {
        let values = values
            .iter()
            .map(|v| v.map(Value::Float).unwrap_or(Value::Null))
            .collect();
        Dataset::new(vec![Column::new(PRICE, ColumnKind::Float, values)]).unwrap()
    }

    #[test]
    fn price_stats_of_three_values() {
        let ds = prices(&[Some(10.0), Some(20.0), Some(30.0)]);
        let stats = price_stats(&ds).unwrap().unwrap();
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert!((stats.mean - 20.0).abs() < 1e-12);
        assert_eq!(stats.median, 20.0);
    }

    #[test]
    fn numeric_summary_matches_describe() {
        let ds = prices(&[Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)]);
        let s = numeric_summary(&ds.columns()[0]);
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, Some(2.5));
        assert!((s.std.unwrap() - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert_eq!(s.q25, Some(1.75));
        assert_eq!(s.median, Some(2.5));
        assert_eq!(s.q75, Some(3.25));
        assert_eq!((s.min, s.max), (Some(1.0), Some(4.0)));
    }

    #[test]
    fn single_value_has_no_std_and_empty_has_no_price_stats() {
        let one = prices(&[Some(7.0)]);
        assert_eq!(numeric_summary(&one.columns()[0]).std, None);

        let empty = prices(&[None, None]);
        assert_eq!(price_stats(&empty).unwrap(), None);
    }

    #[test]
    fn price_stats_requires_price_column() {
        let ds = Dataset::new(vec![Column::new("Other", ColumnKind::Float, vec![])]).unwrap();
        assert!(matches!(price_stats(&ds), Err(AppError::UnknownColumn(_))));
    }

    #[test]
    fn mean_and_median_stay_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.gen_range(1..40);
            let values: Vec<Option<f64>> = (0..n).map(|_| Some(rng.gen_range(1.0..250.0))).collect();
            let stats = price_stats(&prices(&values)).unwrap().unwrap();
            assert!(stats.min <= stats.median && stats.median <= stats.max);
            assert!(stats.min <= stats.mean + 1e-9 && stats.mean <= stats.max + 1e-9);
        }
    }

    #[test]
    fn categorical_summary_reports_top_value() {
        let text = |s: &str| Value::Text(s.to_string());
        let ds = Dataset::new(vec![
            Column::new(
                "Ticket Class",
                ColumnKind::Text,
                vec![text("Standard"), text("First Class"), text("Standard"), Value::Null],
            ),
            Column::new(PRICE, ColumnKind::Integer, vec![Value::Int(1); 4]),
        ])
        .unwrap();

        let cats = describe_categorical(&ds);
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].count, 3);
        assert_eq!(cats[0].unique, 2);
        assert_eq!(cats[0].top.as_deref(), Some("Standard"));
        assert_eq!(cats[0].freq, 2);
    }

    #[test]
    fn head_and_tail_clamp_to_row_count() {
        let ds = prices(&[Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(head(&ds, 5).index, vec![0, 1, 2]);
        assert_eq!(tail(&ds, 2).index, vec![1, 2]);
        assert_eq!(tail(&ds, 2).rows[1], vec![Value::Float(3.0)]);
    }
}
