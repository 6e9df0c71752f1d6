//! Diagnostic tracing for the binaries.
//!
//! Output goes to stderr in compact format. The filter string comes from
//! `Config::log_filter`.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Fails if the filter does not parse or a
/// subscriber is already installed.
pub fn init(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter).map_err(|e| anyhow!("invalid log filter '{}': {}", filter, e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init()
        .map_err(|e| anyhow!("logging already initialized: {}", e))
}
