//! Configuration for circuit breaker behavior.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tripwire_core::{
    Error, Result, DEFAULT_THRESHOLD, DEFAULT_TIMEOUT, TRIPWIRE_THRESHOLD_VAR,
    TRIPWIRE_TIMEOUT_MS_VAR,
};

/// Configuration for circuit breaker behavior
///
/// # Example
///
/// ```
/// use tripwire_breaker::CircuitBreakerConfig;
/// use std::time::Duration;
///
/// let config = CircuitBreakerConfig::default()
///     .with_threshold(3)
///     .with_timeout(Duration::from_secs(10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Number of failures tolerated before the circuit opens
    pub threshold: u32,
    /// How long the circuit stays open before letting calls through again
    #[serde(rename = "timeout_ms", with = "duration_millis")]
    pub timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CircuitBreakerConfig {
    /// Create a configuration from explicit values, without validating them
    pub fn new(threshold: u32, timeout: Duration) -> Self {
        Self { threshold, timeout }
    }

    /// Set the failure threshold
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the open-state timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the invariants every breaker relies on
    pub fn validate(&self) -> Result<()> {
        if self.threshold < 1 {
            return Err(Error::configuration("threshold should be greater than 0"));
        }
        if self.timeout.is_zero() {
            return Err(Error::configuration("timeout should be greater than 0"));
        }
        Ok(())
    }

    /// Defaults overridden by `TRIPWIRE_THRESHOLD` / `TRIPWIRE_TIMEOUT_MS`
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env_overrides()
    }

    /// Override fields from the process environment
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Override fields from an arbitrary variable lookup
    pub fn apply_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(TRIPWIRE_THRESHOLD_VAR) {
            self.threshold = raw.trim().parse().map_err(|e| {
                Error::environment(TRIPWIRE_THRESHOLD_VAR, format!("invalid value '{raw}': {e}"))
            })?;
        }
        if let Some(raw) = lookup(TRIPWIRE_TIMEOUT_MS_VAR) {
            let millis: u64 = raw.trim().parse().map_err(|e| {
                Error::environment(
                    TRIPWIRE_TIMEOUT_MS_VAR,
                    format!("invalid value '{raw}': {e}"),
                )
            })?;
            self.timeout = Duration::from_millis(millis);
        }
        Ok(self)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::file_system(path, "read", e))?;
        Self::from_json_str(&contents)
    }
}

/// Serde support for Duration as milliseconds
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
