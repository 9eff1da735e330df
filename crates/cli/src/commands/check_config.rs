//! Validate a breaker configuration file

use std::path::Path;
use tripwire_breaker::CircuitBreakerConfig;
use tripwire_core::{Result, ResultExt};

pub fn load(path: &Path) -> Result<CircuitBreakerConfig> {
    CircuitBreakerConfig::from_file(path)
        .with_context(|| format!("invalid breaker configuration '{}'", path.display()))
}

pub fn execute(path: &Path) -> eyre::Result<()> {
    let config = load(path)?;
    println!("threshold:  {}", config.threshold);
    println!("timeout_ms: {}", config.timeout.as_millis());
    Ok(())
}
