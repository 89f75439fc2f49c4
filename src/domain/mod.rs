//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the in-memory table (`Dataset`, `Column`, `Value`, `ColumnKind`)
//! - the expected ticket-purchase schema (`schema`)
//! - run configuration (`AnalysisConfig`) and row predicates (`RowFilter`)

pub mod schema;
pub mod types;

pub use types::*;
