//! `rail-eda` library crate.
//!
//! The binary (`rail-eda`) is a thin wrapper around this library so that:
//!
//! - the load/normalize/aggregate stages are testable without spawning processes
//! - the aggregates can be reused by other front-ends (notebooks, services)
//! - code stays easy to navigate as the analysis grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod stats;
