//! Point series for the price-over-time view.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::Dataset;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: NaiveDate,
    pub y: f64,
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub x_column: String,
    pub y_column: String,
    pub group_column: String,
    pub points: Vec<ScatterPoint>,
    /// Group labels in first-encountered order.
    pub groups: Vec<String>,
    /// Rows left out because one of the three cells was null.
    pub skipped: usize,
}

impl ScatterSeries {
    pub fn x_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.points.iter().map(|p| p.x).min()?;
        let max = self.points.iter().map(|p| p.x).max()?;
        Some((min, max))
    }
}

/// Collect `(date, number, group)` triples from three columns.
pub fn scatter_by_group(
    dataset: &Dataset,
    x_column: &str,
    y_column: &str,
    group_column: &str,
) -> Result<ScatterSeries, AppError> {
    let xs = &dataset.require(x_column)?.values;
    let ys = &dataset.require(y_column)?.values;
    let gs = &dataset.require(group_column)?.values;

    let mut points = Vec::with_capacity(dataset.rows());
    let mut groups: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    for ((x, y), g) in xs.iter().zip(ys).zip(gs) {
        let (Some(x), Some(y), Some(group)) = (x.as_date(), y.as_f64(), g.label()) else {
            skipped += 1;
            continue;
        };
        if !groups.contains(&group) {
            groups.push(group.clone());
        }
        points.push(ScatterPoint { x, y, group });
    }

    Ok(ScatterSeries {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        group_column: group_column.to_string(),
        points,
        groups,
        skipped,
    })
}
