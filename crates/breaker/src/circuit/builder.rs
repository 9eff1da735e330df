//! Builder for circuit breakers that need a name or early listeners.

use super::config::CircuitBreakerConfig;
use super::listeners::StateChangeListener;
use super::state::CircuitBreaker;
use std::sync::Arc;
use std::time::Duration;
use tripwire_core::{Result, DEFAULT_BREAKER_NAME};

/// Builds a [`CircuitBreaker`]
///
/// Listeners registered here see the initial Closed notification fired
/// during construction.
pub struct CircuitBreakerBuilder {
    name: String,
    config: CircuitBreakerConfig,
    listeners: Vec<Arc<dyn StateChangeListener>>,
}

impl Default for CircuitBreakerBuilder {
    fn default() -> Self {
        Self {
            name: DEFAULT_BREAKER_NAME.to_string(),
            config: CircuitBreakerConfig::default(),
            listeners: Vec::new(),
        }
    }
}

impl CircuitBreakerBuilder {
    /// Name used in log events
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.config.threshold = threshold;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Replace threshold and timeout at once
    #[must_use]
    pub fn config(mut self, config: CircuitBreakerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn listener<L>(mut self, listener: L) -> Self
    where
        L: StateChangeListener + 'static,
    {
        self.listeners.push(Arc::new(listener));
        self
    }

    /// Validate the configuration and start the breaker in Closed
    pub fn build(self) -> Result<CircuitBreaker> {
        CircuitBreaker::from_parts(self.name, self.config, self.listeners)
    }
}
