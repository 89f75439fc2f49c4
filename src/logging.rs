//! Log subscriber setup.
//!
//! Logs go to stderr so stdout carries only the report and charts.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "rail_eda=info";
const VERBOSE_FILTER: &str = "rail_eda=debug";

/// Install the global subscriber. `RUST_LOG` wins over `verbose` when set.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
