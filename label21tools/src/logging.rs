//!
//! # Logging Setup
//!

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global `tracing` subscriber, writing to stderr.
///
/// Filtering follows the `RUST_LOG` environment variable when set.
/// Otherwise everything at `info` and above is shown, or `debug` and above if `verbose`.
/// Fails if a global subscriber is already installed.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose))
        .try_init()?;
    Ok(())
}
