//! Shared load -> normalize -> aggregate pipeline used by every command.
//!
//! The stages stay in one place so the commands differ only in which
//! aggregates they compute and how they print them.

use tracing::debug;

use crate::domain::{AnalysisConfig, Dataset};
use crate::error::AppError;
use crate::io::normalize::Normalized;
use crate::report::{EdaReport, Overview};

/// Everything a `report` run computes.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub report: EdaReport,
    pub normalized: Normalized,
}

/// Read the CSV named by the config.
pub fn load_stage(config: &AnalysisConfig) -> Result<Dataset, AppError> {
    crate::io::ingest::load_dataset(&config.source_path)
}

pub fn normalize_stage(raw: Dataset, config: &AnalysisConfig) -> Result<Normalized, AppError> {
    let rows = raw.rows();
    let normalized = crate::io::normalize::normalize(raw, config)?;
    debug!(
        rows,
        soft_failures = normalized.soft_failures.len(),
        "normalize stage done"
    );
    Ok(normalized)
}

/// Load and normalize without computing the report, for the narrower commands.
pub fn load_normalized(config: &AnalysisConfig) -> Result<Normalized, AppError> {
    let raw = load_stage(config)?;
    normalize_stage(raw, config)
}

/// Execute the full pipeline: load, overview of the raw data, normalize, analyze.
pub fn run_report(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let raw = load_stage(config)?;
    let overview: Overview = crate::report::overview(&raw, config.head_rows);

    let normalized = normalize_stage(raw, config)?;
    let report = crate::report::analyze(overview, &normalized, config)?;

    Ok(RunOutput { report, normalized })
}
