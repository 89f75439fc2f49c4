//! Assemble the aggregates of one analysis run into an `EdaReport`.
//!
//! The report is plain data: `format` turns it into text, `plot::ascii` into
//! charts and `io::export` into JSON.

use serde::Serialize;
use tracing::info;

use crate::domain::schema::{
    ARRIVAL_DESTINATION, DATE_OF_JOURNEY, DEPARTURE_STATION, JOURNEY_STATUS, PRICE,
    PURCHASE_BEHAVIOUR_COLUMNS, REASON_FOR_DELAY, REFUND_REQUEST, STATUS_DELAYED, TICKET_CLASS,
};
use crate::domain::{AnalysisConfig, Dataset, RowFilter};
use crate::error::AppError;
use crate::io::normalize::{Normalized, SoftParseFailure};
use crate::stats::{
    CategoricalSummary, ColumnType, CrossTab, CrossTabQuery, FrequencyTable, Histogram, NullCount,
    NumericSummary, PriceStats, RowPreview, ScatterSeries, Shape,
};

pub mod format;

pub use format::*;

/// The dataset as loaded, before any type conversion.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub shape: Shape,
    pub columns: Vec<String>,
    pub schema: Vec<ColumnType>,
    pub head: RowPreview,
    pub tail: RowPreview,
    pub nulls: Vec<NullCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertedColumn {
    pub column: String,
    pub format: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizationSummary {
    pub converted: Vec<ConvertedColumn>,
    pub soft_failures: Vec<SoftParseFailure>,
    pub schema: Vec<ColumnType>,
    pub nulls: Vec<NullCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdaReport {
    pub source: String,
    pub overview: Overview,
    pub normalization: NormalizationSummary,
    pub numeric: Vec<NumericSummary>,
    pub categorical: Vec<CategoricalSummary>,

    pub price: Option<PriceStats>,
    pub price_histogram: Option<Histogram>,
    pub journey_status: FrequencyTable,
    pub departure_stations: FrequencyTable,
    pub arrival_destinations: FrequencyTable,
    /// Reason for delay × refund request over delayed journeys.
    pub delay_refunds: CrossTab,
    pub purchase_behaviour: Vec<FrequencyTable>,
    pub price_over_time: ScatterSeries,
}

pub fn overview(raw: &Dataset, head_rows: usize) -> Overview {
    Overview {
        shape: crate::stats::shape(raw),
        columns: raw.column_names(),
        schema: crate::stats::schema_summary(raw),
        head: crate::stats::head(raw, head_rows),
        tail: crate::stats::tail(raw, head_rows),
        nulls: crate::stats::null_audit(raw),
    }
}

/// Compute every aggregate over the normalized dataset.
pub fn analyze(
    overview: Overview,
    normalized: &Normalized,
    config: &AnalysisConfig,
) -> Result<EdaReport, AppError> {
    let ds = &normalized.dataset;

    let price_histogram = crate::stats::histogram(ds.require(PRICE)?, config.histogram_bins);

    let delayed = CrossTabQuery::new(REASON_FOR_DELAY, REFUND_REQUEST)
        .filtered(RowFilter::new(JOURNEY_STATUS, STATUS_DELAYED));
    let delay_refunds = crate::stats::crosstab(ds, &delayed)?;

    let purchase_behaviour = PURCHASE_BEHAVIOUR_COLUMNS
        .iter()
        .map(|name| crate::stats::value_counts(ds, name))
        .collect::<Result<Vec<_>, _>>()?;

    let report = EdaReport {
        source: config.source_path.display().to_string(),
        overview,
        normalization: NormalizationSummary {
            converted: normalized
                .formats
                .iter()
                .map(|(column, format)| ConvertedColumn {
                    column: column.clone(),
                    format: format.clone(),
                })
                .collect(),
            soft_failures: normalized.soft_failures.clone(),
            schema: crate::stats::schema_summary(ds),
            nulls: crate::stats::null_audit(ds),
        },
        numeric: crate::stats::describe_numeric(ds),
        categorical: crate::stats::describe_categorical(ds),
        price: crate::stats::price_stats(ds)?,
        price_histogram,
        journey_status: crate::stats::value_counts(ds, JOURNEY_STATUS)?,
        departure_stations: crate::stats::value_counts(ds, DEPARTURE_STATION)?,
        arrival_destinations: crate::stats::value_counts(ds, ARRIVAL_DESTINATION)?,
        delay_refunds,
        purchase_behaviour,
        price_over_time: crate::stats::scatter_by_group(ds, DATE_OF_JOURNEY, PRICE, TICKET_CLASS)?,
    };

    info!(
        rows = report.overview.shape.rows,
        delayed = report.delay_refunds.filtered_rows,
        "analysis complete"
    );
    Ok(report)
}
