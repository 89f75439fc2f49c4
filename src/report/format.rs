//! Formatted terminal output for an `EdaReport`.
//!
//! Sections print in analysis order: overview, conversion, summaries, then
//! objectives 1 to 6. Column labels are cut to `LABEL_WIDTH`.

use crate::domain::{AnalysisConfig, Value};
use crate::report::EdaReport;
use crate::stats::crosstab::display_label;
use crate::stats::{
    CategoricalSummary, ColumnType, CrossTab, FrequencyTable, NullCount, NumericSummary, PriceStats,
    RowPreview,
};

const LABEL_WIDTH: usize = 28;
const CELL_WIDTH: usize = 16;

/// Format the full report in the order the analysis is read.
pub fn format_report(report: &EdaReport, config: &AnalysisConfig) -> String {
    let ov = &report.overview;
    let mut out = String::new();

    out.push_str(&format!("=== rail-eda - {} ===\n\n", report.source));

    out.push_str("Dataset Shape (rows, columns):\n");
    out.push_str(&format!("({}, {})\n\n", ov.shape.rows, ov.shape.columns));

    out.push_str("Column Names:\n");
    out.push_str(&format!("[{}]\n\n", ov.columns.join(", ")));

    out.push_str("Data Types:\n");
    out.push_str(&format_schema(&ov.schema));
    out.push('\n');

    out.push_str(&format!("First {} Rows:\n", ov.head.index.len()));
    out.push_str(&format_preview(&ov.head));
    out.push('\n');

    out.push_str(&format!("Last {} Rows:\n", ov.tail.index.len()));
    out.push_str(&format_preview(&ov.tail));
    out.push('\n');

    out.push_str("Missing Values in Each Column:\n");
    out.push_str(&format_nulls(&ov.nulls));
    out.push('\n');

    out.push_str("Type Conversion:\n");
    for c in &report.normalization.converted {
        out.push_str(&format!("{:<LABEL_WIDTH$} {}\n", truncate(&c.column, LABEL_WIDTH), c.format));
    }
    out.push_str(&format!(
        "Unparseable lenient values set to null: {}\n\n",
        report.normalization.soft_failures.len()
    ));

    out.push_str("Missing Values After Conversion:\n");
    out.push_str(&format_nulls(&report.normalization.nulls));
    out.push('\n');

    out.push_str("Numerical Columns Summary:\n");
    out.push_str(&format_numeric_summary(&report.numeric));
    out.push('\n');

    out.push_str("Categorical Columns Summary:\n");
    out.push_str(&format_categorical_summary(&report.categorical));
    out.push('\n');

    out.push_str("Price Statistics:\n");
    out.push_str(&format_price_stats(report.price.as_ref()));
    out.push('\n');

    out.push_str("Journey Status Counts:\n");
    out.push_str(&format_frequency_table(&report.journey_status, None));
    out.push('\n');

    out.push_str("Top Departure Stations:\n");
    out.push_str(&format_frequency_table(&report.departure_stations, Some(config.top_n)));
    out.push('\n');

    out.push_str("Top Arrival Destinations:\n");
    out.push_str(&format_frequency_table(&report.arrival_destinations, Some(config.top_n)));
    out.push('\n');

    out.push_str(&format!(
        "Delay Reason vs Refund Request ({} delayed journeys):\n",
        report.delay_refunds.filtered_rows
    ));
    out.push_str(&format_crosstab(&report.delay_refunds));
    out.push('\n');

    for table in &report.purchase_behaviour {
        out.push_str(&format!("{} Counts:\n", table.column));
        out.push_str(&format_frequency_table(table, None));
        out.push('\n');
    }

    let series = &report.price_over_time;
    out.push_str(&format!(
        "{} over {} by {}: {} points",
        series.y_column,
        series.x_column,
        series.group_column,
        series.points.len()
    ));
    if let Some((from, to)) = series.x_range() {
        out.push_str(&format!(" ({from} .. {to})"));
    }
    out.push('\n');

    out
}

pub fn format_schema(schema: &[ColumnType]) -> String {
    let mut out = String::new();
    for c in schema {
        out.push_str(&format!("{:<LABEL_WIDTH$} {}\n", truncate(&c.column, LABEL_WIDTH), c.kind.label()));
    }
    out
}

pub fn format_nulls(nulls: &[NullCount]) -> String {
    let mut out = String::new();
    for n in nulls {
        out.push_str(&format!("{:<LABEL_WIDTH$} {:>8}\n", truncate(&n.column, LABEL_WIDTH), n.nulls));
    }
    out
}

pub fn format_preview(preview: &RowPreview) -> String {
    let widths: Vec<usize> = preview
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            preview
                .rows
                .iter()
                .map(|r| cell(&r[i]).chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
                .min(CELL_WIDTH)
        })
        .collect();

    let mut out = String::new();
    let mut header = format!("{:>6}", "");
    for (name, &w) in preview.columns.iter().zip(&widths) {
        header.push_str(&format!("  {:<w$}", truncate(name, w)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for (idx, row) in preview.index.iter().zip(&preview.rows) {
        let mut line = format!("{idx:>6}");
        for (value, &w) in row.iter().zip(&widths) {
            line.push_str(&format!("  {:<w$}", truncate(&cell(value), w)));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn format_numeric_summary(summaries: &[NumericSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<8}", "stat"));
    for s in summaries {
        out.push_str(&format!(" {:>14}", truncate(&s.column, 14)));
    }
    out.push('\n');

    let rows: [(&str, fn(&NumericSummary) -> Option<f64>); 8] = [
        ("count", |s| Some(s.count as f64)),
        ("mean", |s| s.mean),
        ("std", |s| s.std),
        ("min", |s| s.min),
        ("25%", |s| s.q25),
        ("50%", |s| s.median),
        ("75%", |s| s.q75),
        ("max", |s| s.max),
    ];
    for (label, get) in rows {
        out.push_str(&format!("{label:<8}"));
        for s in summaries {
            out.push_str(&format!(" {:>14}", fmt_opt(get(s))));
        }
        out.push('\n');
    }
    out
}

pub fn format_categorical_summary(summaries: &[CategoricalSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<LABEL_WIDTH$} {:>8} {:>8} {:<24} {:>8}\n",
        "column", "count", "unique", "top", "freq"
    ));
    out.push_str(&format!("{:-<LABEL_WIDTH$} {:-<8} {:-<8} {:-<24} {:-<8}\n", "", "", "", "", ""));
    for s in summaries {
        out.push_str(&format!(
            "{:<LABEL_WIDTH$} {:>8} {:>8} {:<24} {:>8}\n",
            truncate(&s.column, LABEL_WIDTH),
            s.count,
            s.unique,
            truncate(s.top.as_deref().unwrap_or("-"), 24),
            s.freq
        ));
    }
    out
}

pub fn format_price_stats(stats: Option<&PriceStats>) -> String {
    match stats {
        Some(p) => format!(
            "Min: {}\nMax: {}\nMean: {}\nMedian: {}\n",
            fmt_num(p.min),
            fmt_num(p.max),
            fmt_num(p.mean),
            fmt_num(p.median)
        ),
        None => "No price values.\n".to_string(),
    }
}

/// Value counts, optionally truncated to the `top` most frequent values.
pub fn format_frequency_table(table: &FrequencyTable, top: Option<usize>) -> String {
    let shown = match top {
        Some(n) => table.top(n),
        None => table.clone(),
    };

    let mut out = String::new();
    for e in &shown.entries {
        out.push_str(&format!("{:<LABEL_WIDTH$} {:>8}\n", truncate(&e.value, LABEL_WIDTH), e.count));
    }
    if shown.nulls > 0 {
        out.push_str(&format!("{:<LABEL_WIDTH$} {:>8}\n", "(null)", shown.nulls));
    }
    if shown.is_truncated() {
        out.push_str(&format!("(+{} more)\n", shown.distinct - shown.entries.len()));
    }
    out
}

pub fn format_crosstab(table: &CrossTab) -> String {
    let mut out = String::new();
    if table.row_labels.is_empty() {
        out.push_str("(no matching rows)\n");
        return out;
    }

    let mut header = format!("{:<LABEL_WIDTH$}", truncate(&table.row_column, LABEL_WIDTH));
    for label in &table.col_labels {
        header.push_str(&format!(" {:>10}", truncate(display_label(label), 10)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for (label, counts) in table.row_labels.iter().zip(&table.counts) {
        let mut line = format!("{:<LABEL_WIDTH$}", truncate(display_label(label), LABEL_WIDTH));
        for c in counts {
            line.push_str(&format!(" {c:>10}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn cell(value: &Value) -> String {
    value.to_string()
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        format!("{v:.6}")
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.6}"),
        _ => "NaN".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
