//! Circuit breaker state machine and its call-interception protocol
//!
//! ## Architecture
//!
//! - [`types`] - `StateKind` and the statistics snapshot
//! - [`config`] - Threshold/timeout configuration, validation and loading
//! - [`transitions`] - State values and the hooks that decide transitions
//! - [`state`] - The `CircuitBreaker` context and `attempt_call`
//! - [`builder`] - Named breakers and listeners registered before construction
//! - [`listeners`] - State-change notification
//! - [`metrics`] - Call and transition counters
//! - [`tests`] - Lifecycle tests
//!
//! ## State Machine
//!
//! ```text
//! ┌─────────┐  failures >= threshold  ┌─────────┐  timeout (observed lazily)  ┌──────────┐
//! │ Closed  │ ──────────────────────► │  Open   │ ──────────────────────────► │ HalfOpen │
//! └─────────┘                         └─────────┘ ◄────── probe fails ──────── └──────────┘
//!      ▲                                                                             │
//!      └─────────────────────────────── probe succeeds ──────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tripwire_breaker::circuit::CircuitBreaker;
//! use std::time::Duration;
//!
//! let cb = CircuitBreaker::new(2, Duration::from_millis(50)).unwrap();
//!
//! let status = cb
//!     .attempt_call(|| std::fs::metadata("/definitely/not/here").map(drop))
//!     .attempt_call(|| std::fs::metadata("/definitely/not/here").map(drop));
//!
//! assert!(status.is_open());
//! assert!(cb.last_failure().is_some());
//! ```

pub mod builder;
pub mod config;
pub mod listeners;
mod metrics;
pub mod state;
#[cfg(test)]
pub mod tests;
pub mod transitions;
pub mod types;

// Re-export public API
pub use builder::CircuitBreakerBuilder;
pub use config::CircuitBreakerConfig;
pub use listeners::{ListenerId, StateChangeListener};
pub use state::CircuitBreaker;
pub use types::{CircuitBreakerStats, StateKind};
