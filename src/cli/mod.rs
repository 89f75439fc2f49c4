//! Command-line parsing for the railway ticket EDA.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! loading and aggregation code. Handlers live in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    DEFAULT_CHART_TOP_N, DEFAULT_HISTOGRAM_BINS, DEFAULT_SOURCE, DEFAULT_TIME_FORMAT, DEFAULT_TOP_N,
    RowFilter,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rail-eda", version, about = "Exploratory analysis of UK train ticket sales")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load, normalize and summarize the dataset, then draw the charts.
    Report(ReportArgs),
    /// Print the value counts of one column.
    Counts(CountsArgs),
    /// Print a cross-tabulation of two columns, optionally over a row filter.
    Crosstab(CrosstabArgs),
}

/// Where the data comes from and how its date/time columns are parsed.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Ticket sales CSV.
    #[arg(short, long, env = "RAIL_EDA_CSV", default_value = DEFAULT_SOURCE)]
    pub source: PathBuf,

    /// Date format for the date columns (detected from the data when omitted).
    #[arg(long)]
    pub date_format: Option<String>,

    /// Time format for the time columns.
    #[arg(long, default_value = DEFAULT_TIME_FORMAT)]
    pub time_format: String,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Rows shown in the station/destination tables.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Bars shown in the station/destination charts.
    #[arg(long, default_value_t = DEFAULT_CHART_TOP_N)]
    pub chart_top: usize,

    /// Price histogram bins.
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Export the computed aggregates to JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CountsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Column to count.
    #[arg(long)]
    pub column: String,

    /// Show only the N most frequent values.
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Debug, Args, Clone)]
pub struct CrosstabArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Column whose values label the rows.
    #[arg(long)]
    pub rows: String,

    /// Column whose values label the columns.
    #[arg(long)]
    pub cols: String,

    /// Only count rows where COL equals VALUE.
    #[arg(long = "where", value_name = "COL=VALUE")]
    pub filter: Option<RowFilter>,

    /// Also draw the table as a shaded heatmap.
    #[arg(long)]
    pub heatmap: bool,

    /// Write the table to CSV.
    #[arg(long = "export-csv", value_name = "PATH")]
    pub export_csv: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults() {
        let cli = Cli::try_parse_from(["rail-eda", "report", "--source", "x.csv"]).unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.source.source, PathBuf::from("x.csv"));
        assert_eq!(args.top, 5);
        assert_eq!(args.bins, 50);
        assert_eq!(args.source.time_format, "%H:%M:%S");
        assert!(!args.no_plot);
        assert!(!cli.verbose);
    }

    #[test]
    fn crosstab_parses_where_filter() {
        let cli = Cli::try_parse_from([
            "rail-eda",
            "crosstab",
            "--rows",
            "Reason for Delay",
            "--cols",
            "Refund Request",
            "--where",
            "Journey Status=Delayed",
            "-v",
        ])
        .unwrap();
        let Command::Crosstab(args) = cli.command else {
            panic!("expected crosstab");
        };
        assert_eq!(args.filter, Some(RowFilter::new("Journey Status", "Delayed")));
        assert!(cli.verbose);
    }

    #[test]
    fn malformed_where_is_rejected() {
        let res = Cli::try_parse_from([
            "rail-eda", "crosstab", "--rows", "a", "--cols", "b", "--where", "novalue",
        ]);
        assert!(res.is_err());
    }
}
