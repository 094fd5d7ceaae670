//! Diagnostic logging
//!
//! `tracing` events go to stderr so they never mix with previews and
//! prompts on stdout. `RUST_LOG` takes precedence over the built-in filter.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "mfbatch=warn";
const VERBOSE_FILTER: &str = "mfbatch=debug";

/// Filter used when `RUST_LOG` is not set
#[must_use]
pub const fn default_filter(verbose: bool) -> &'static str {
    if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
