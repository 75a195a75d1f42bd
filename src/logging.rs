#![forbid(unsafe_code)]

//! Tracing subscriber installation shared by the binary and tests.

use crate::types::{ListingError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global `fmt` subscriber filtered by `level`, writing to stderr.
///
/// `level` accepts any `EnvFilter` directive, e.g. `info` or
/// `listing_index::index=debug`.
pub fn init_logging(level: &str) -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_new(level)
                .map_err(|e| ListingError::InvalidArgument(format!("Invalid log level: {e}")))?,
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| ListingError::InvalidArgument("Logging already initialized".into()))
}
