//! ASCII plotting for terminal output.
//!
//! Fixed-size character grids; the same input and size always give the same text.
//!
//! Chart kinds:
//! - frequency tables: horizontal `#` bars
//! - histograms: vertical `#` columns
//! - cross-tabulations: shaded heatmap cells with counts
//! - scatter series: one glyph per group

use crate::domain::AnalysisConfig;
use crate::report::EdaReport;
use crate::stats::crosstab::display_label;
use crate::stats::{CrossTab, FrequencyTable, Histogram, ScatterSeries};

/// Heatmap shades from empty to the maximum count.
const SHADES: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Scatter glyphs, assigned to groups in first-encountered order.
const GLYPHS: [char; 6] = ['o', 'x', '+', '*', '#', '@'];

const MAX_LABEL_WIDTH: usize = 24;

/// Render every chart of the report, in report order.
pub fn render_report_charts(report: &EdaReport, config: &AnalysisConfig) -> String {
    let width = config.plot_width;
    let height = config.plot_height;
    let mut out = String::new();

    if let Some(h) = &report.price_histogram {
        out.push_str(&render_histogram(h, "Ticket Price Distribution", width, height));
        out.push('\n');
    }

    out.push_str(&render_bar_chart(&report.journey_status, "Journey Status Distribution", width));
    out.push('\n');

    out.push_str(&render_bar_chart(
        &report.departure_stations.top(config.chart_top_n),
        &format!("Top {} Departure Stations", config.chart_top_n),
        width,
    ));
    out.push('\n');
    out.push_str(&render_bar_chart(
        &report.arrival_destinations.top(config.chart_top_n),
        &format!("Top {} Arrival Destinations", config.chart_top_n),
        width,
    ));
    out.push('\n');

    out.push_str(&render_heatmap(&report.delay_refunds, "Delay Reason vs Refund Request"));
    out.push('\n');

    out.push_str(&render_scatter(
        &report.price_over_time,
        "Ticket Price Over Time by Ticket Class",
        width,
        height,
    ));
    out.push('\n');

    for table in &report.purchase_behaviour {
        out.push_str(&render_bar_chart(table, &format!("{} Distribution", table.column), width));
        out.push('\n');
    }

    out
}

/// Horizontal bar per entry, scaled so the largest count spans `width`.
pub fn render_bar_chart(table: &FrequencyTable, title: &str, width: usize) -> String {
    let width = width.max(10);
    let max = table.max_count().max(1);
    let label_width = table
        .entries
        .iter()
        .map(|e| e.value.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);

    let mut out = String::new();
    out.push_str(&format!("{title}\n"));
    for e in &table.entries {
        let len = scale(e.count, max, width);
        let line = format!(
            "{:<label_width$} |{} {}",
            clip(&e.value, label_width),
            "#".repeat(len),
            e.count
        );
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Vertical histogram; each bin gets `width / bins` columns (at least one).
pub fn render_histogram(hist: &Histogram, title: &str, width: usize, height: usize) -> String {
    let height = height.max(3);
    let bins = hist.bins.len().max(1);
    let col_width = (width / bins).max(1);
    let max = hist.max_count().max(1);

    let bars: Vec<usize> = hist.bins.iter().map(|b| scale(b.count, max, height)).collect();
    let lo = hist.bins.first().map(|b| b.lower).unwrap_or(0.0);
    let hi = hist.bins.last().map(|b| b.upper).unwrap_or(0.0);

    let mut out = String::new();
    out.push_str(&format!(
        "{title}: {}=[{lo:.2}, {hi:.2}] | bins={} | max count={}\n",
        hist.column,
        hist.bins.len(),
        hist.max_count()
    ));

    for level in (1..=height).rev() {
        let row: String = bars
            .iter()
            .map(|&bar| (if bar >= level { "#" } else { " " }).repeat(col_width))
            .collect();
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out.push_str(&"-".repeat(col_width * bins));
    out.push('\n');
    out
}

/// Shaded cells (darker = higher count) followed by the count itself.
pub fn render_heatmap(table: &CrossTab, title: &str) -> String {
    let max = table.max_count();
    let label_width = table
        .row_labels
        .iter()
        .map(|l| display_label(l).chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);

    let mut out = String::new();
    out.push_str(&format!("{title}\n"));

    let mut header = format!("{:<label_width$}", "");
    for label in &table.col_labels {
        header.push_str(&format!(" {:>10}", clip(display_label(label), 10)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for (label, counts) in table.row_labels.iter().zip(&table.counts) {
        let mut line = format!("{:<label_width$}", clip(display_label(label), label_width));
        for &count in counts {
            let cell = shade(count, max).to_string().repeat(3);
            line.push_str(&format!(" {cell}{count:>7}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Scatter of `y` against the date axis; later points overwrite earlier ones.
pub fn render_scatter(series: &ScatterSeries, title: &str, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((d_min, d_max)) = series.x_range() else {
        return format!("{title}\n(no points)\n");
    };
    let t_min = 0.0;
    let t_max = (d_max - d_min).num_days() as f64;
    let (t_min, t_max) = if t_max > t_min { (t_min, t_max) } else { (-1.0, 1.0) };

    let (y_min, y_max) = y_range(series).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for p in &series.points {
        let t = (p.x - d_min).num_days() as f64;
        let x = map_x(t, t_min, t_max, width);
        let y = map_y(p.y, y_min, y_max, height);
        grid[y][x] = glyph(series, &p.group);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{title}: {}=[{d_min}, {d_max}] | {}=[{y_min:.2}, {y_max:.2}]\n",
        series.x_column, series.y_column
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    let legend: Vec<String> = series
        .groups
        .iter()
        .map(|g| format!("{}={g}", glyph(series, g)))
        .collect();
    out.push_str(&format!("{}: {}\n", series.group_column, legend.join("  ")));
    out
}

fn glyph(series: &ScatterSeries, group: &str) -> char {
    let idx = series.groups.iter().position(|g| g == group).unwrap_or(0);
    GLYPHS[idx % GLYPHS.len()]
}

fn shade(count: usize, max: usize) -> char {
    if max == 0 || count == 0 {
        return SHADES[0];
    }
    let idx = ((count as f64 / max as f64) * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[idx.clamp(1, SHADES.len() - 1)]
}

/// Scale `count` into `0..=span` relative to `max`; non-zero counts get at least 1.
fn scale(count: usize, max: usize, span: usize) -> usize {
    if count == 0 {
        return 0;
    }
    ((count as f64 / max as f64) * span as f64).round().max(1.0) as usize
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

fn y_range(series: &ScatterSeries) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in &series.points {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        Some((min_y - 1.0, min_y + 1.0))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}
