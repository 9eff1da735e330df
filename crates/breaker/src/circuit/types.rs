//! Core types and enums for circuit breaker functionality.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Kind of state a circuit breaker is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    /// Circuit is closed - calls pass through and failures are counted
    Closed,
    /// Circuit is open - calls are skipped until the timeout elapses
    Open,
    /// Circuit is half-open - the next call decides between closing and reopening
    HalfOpen,
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half_open"),
        }
    }
}

/// Statistics about circuit breaker state
#[derive(Debug, Clone, Serialize)]
pub struct CircuitBreakerStats {
    /// State recorded at the time of the snapshot, without refreshing
    pub state: StateKind,
    pub failures: u32,
    pub threshold: u32,
    #[serde(rename = "timeout_ms", serialize_with = "serialize_millis")]
    pub timeout: Duration,
    pub total_calls: u64,
    pub short_circuited: u64,
    pub successes: u64,
    pub failed_calls: u64,
    pub transitions: u64,
    #[serde(skip)]
    pub last_state_change: Instant,
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
