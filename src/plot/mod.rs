//! Terminal charts for the prepared aggregates.

pub mod ascii;

pub use ascii::*;
