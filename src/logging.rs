//! Tracing setup for host applications.
//!
//! The library only emits `tracing` events. Hosts that have no subscriber of
//! their own can call [`init`] once at startup.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "opstream=info";

/// Install a fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns `false` when a
/// global subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}
