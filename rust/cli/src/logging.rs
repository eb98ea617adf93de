//! Diagnostic logging for the `botanic` binary.
//!
//! Engine diagnostics are `tracing` events; this installs a formatter writing
//! them to stderr. `RUST_LOG` overrides the default `warn` filter.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

pub const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Returns `false` if one was already set.
pub fn init_logging() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_refused_quietly() {
        let _ = init_logging();
        assert!(!init_logging());
    }
}
