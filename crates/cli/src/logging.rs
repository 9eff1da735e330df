//! Tracing subscriber setup for the CLI

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tripwire_core::TRIPWIRE_LOG_VAR;

/// Install a stderr fmt layer filtered by `TRIPWIRE_LOG`, falling back to `level`
pub fn init(level: &str) -> eyre::Result<()> {
    let filter = match std::env::var(TRIPWIRE_LOG_VAR) {
        Ok(directives) => EnvFilter::try_new(directives)?,
        Err(_) => EnvFilter::try_new(level)?,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_level(true)
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init()?;

    Ok(())
}
