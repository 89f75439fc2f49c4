//! Input/output helpers.
//!
//! - CSV ingest + header validation (`ingest`)
//! - date/time conversion of the loaded columns (`normalize`)
//! - report exports (JSON) (`export`)

pub mod export;
pub mod ingest;
pub mod normalize;

pub use export::*;
pub use ingest::*;
pub use normalize::*;
