//! Aggregations over a normalized `Dataset`.
//!
//! Every function here is a pure read: it takes `&Dataset` (or a `&Column`)
//! and returns an owned, serializable view.

pub mod counts;
pub mod crosstab;
pub mod describe;
pub mod histogram;
pub mod series;

pub use counts::{FrequencyEntry, FrequencyTable, frequency_table, value_counts};
pub use crosstab::{CrossTab, CrossTabQuery, crosstab};
pub use describe::{
    CategoricalSummary, ColumnType, NullCount, NumericSummary, PriceStats, RowPreview, Shape,
    describe_categorical, describe_numeric, head, null_audit, numeric_summary, price_stats,
    schema_summary, shape, tail,
};
pub use histogram::{Histogram, HistogramBin, histogram};
pub use series::{ScatterPoint, ScatterSeries, scatter_by_group};
