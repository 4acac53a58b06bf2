use anyhow::Result;
use std::io;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber. `verbose` forces the level to `debug`
/// regardless of `level`; an unparseable level falls back to `info`.
pub fn init_logging(level: &str, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .try_init()?;
    info!(verbose, "logging initialized");
    Ok(())
}
