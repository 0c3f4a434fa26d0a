#![forbid(unsafe_code)]

//! Optional JSON log output.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host application's call. Hosts that want structured JSON lines on stderr
//! can use [`try_init_json`] instead of wiring `tracing-subscriber` by hand.
//!
//! The filter is read from `RUST_LOG` and defaults to `info`, e.g.
//! `RUST_LOG=rewind.history=debug` to see every record/undo/redo step.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Failure to install the global subscriber.
#[derive(Debug)]
pub struct LoggingInitError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl fmt::Display for LoggingInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to install JSON subscriber: {}", self.0)
    }
}

impl std::error::Error for LoggingInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// Install a JSON `tracing` subscriber writing to stderr.
///
/// Fails if a global subscriber is already set.
pub fn try_init_json() -> Result<(), LoggingInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(LoggingInitError)
}
