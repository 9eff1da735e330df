//! Circuit breaker for guarding calls to unreliable dependencies.
//!
//! A [`CircuitBreaker`] wraps an arbitrary unit of work and stops invoking it
//! once it has failed `threshold` times, giving the dependency `timeout` to
//! recover before calls are let through again.
//!
//! ## Key Components
//!
//! - **`circuit`**: The state machine, the breaker context, its configuration
//!   and the state-change listener registry.

pub mod circuit;

pub use circuit::{
    CircuitBreaker, CircuitBreakerBuilder, CircuitBreakerConfig, CircuitBreakerStats, ListenerId,
    StateChangeListener, StateKind,
};
pub use tripwire_core::{Error, Result};
