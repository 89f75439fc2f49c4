//! Top-level application orchestration.
//!
//! `src/main.rs` only maps the result to an exit code; this module:
//! - parses CLI arguments (after loading `.env`)
//! - installs logging
//! - runs the load/normalize/aggregate pipeline
//! - prints reports/charts and writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{Command, CountsArgs, CrosstabArgs, ReportArgs, SourceArgs};
use crate::domain::AnalysisConfig;
use crate::error::AppError;
use crate::stats::CrossTabQuery;

pub mod pipeline;

/// Entry point for the `rail-eda` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `rail-eda` and `rail-eda --source x.csv` behave like `rail-eda report ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    crate::logging::init(cli.verbose);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Counts(args) => handle_counts(args),
        Command::Crosstab(args) => handle_crosstab(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = report_config_from_args(&args);
    let run = pipeline::run_report(&config)?;

    println!("{}", crate::report::format_report(&run.report, &config));

    if config.plot {
        println!("{}", crate::plot::render_report_charts(&run.report, &config));
    }

    if let Some(path) = &config.export_json {
        crate::io::export::write_report_json(path, &run.report)?;
    }

    Ok(())
}

fn handle_counts(args: CountsArgs) -> Result<(), AppError> {
    let config = source_config(&args.source);
    let normalized = pipeline::load_normalized(&config)?;

    let table = crate::stats::value_counts(&normalized.dataset, &args.column)?;
    info!(column = %table.column, distinct = table.distinct, "counted values");

    println!("{} Counts ({} rows):", table.column, table.rows);
    print!("{}", crate::report::format_frequency_table(&table, args.top));
    Ok(())
}

fn handle_crosstab(args: CrosstabArgs) -> Result<(), AppError> {
    let config = source_config(&args.source);
    let normalized = pipeline::load_normalized(&config)?;

    let mut query = CrossTabQuery::new(args.rows.as_str(), args.cols.as_str());
    if let Some(filter) = args.filter.clone() {
        query = query.filtered(filter);
    }
    let table = crate::stats::crosstab(&normalized.dataset, &query)?;

    let title = match &table.filter {
        Some(filter) => format!(
            "{} vs {} where {} ({} rows)",
            table.row_column, table.col_column, filter, table.filtered_rows
        ),
        None => format!("{} vs {} ({} rows)", table.row_column, table.col_column, table.filtered_rows),
    };
    println!("{title}:");
    print!("{}", crate::report::format_crosstab(&table));

    if args.heatmap {
        println!();
        print!("{}", crate::plot::render_heatmap(&table, &title));
    }

    if let Some(path) = &args.export_csv {
        crate::io::export::write_crosstab_csv(path, &table)?;
    }
    Ok(())
}

/// Config for commands that only need the source and parse formats.
fn source_config(args: &SourceArgs) -> AnalysisConfig {
    let mut config = AnalysisConfig::new(args.source.clone());
    config.date_format = args.date_format.clone();
    config.time_format = args.time_format.clone();
    config
}

pub fn report_config_from_args(args: &ReportArgs) -> AnalysisConfig {
    AnalysisConfig {
        top_n: args.top,
        chart_top_n: args.chart_top,
        histogram_bins: args.bins,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_json: args.export_json.clone(),
        ..source_config(&args.source)
    }
}

/// Rewrite argv so `rail-eda` defaults to `rail-eda report`.
///
/// Rules:
/// - `rail-eda`                      -> `rail-eda report`
/// - `rail-eda --source x.csv ...`   -> `rail-eda report --source x.csv ...`
/// - `rail-eda -v counts ...`       -> unchanged (global flags before a subcommand)
/// - `rail-eda --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv
        .iter()
        .skip(1)
        .find(|a| !is_global_flag(a))
        .cloned()
    else {
        argv.insert(1, "report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "counts" | "crosstab");
    if is_subcommand {
        return argv;
    }

    // A leading flag is a report flag.
    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    argv
}

/// Flags clap accepts on either side of the subcommand name.
fn is_global_flag(arg: &str) -> bool {
    matches!(arg, "-v" | "--verbose")
}
