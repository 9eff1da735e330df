//! Metrics and statistics tracking for circuit breaker.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Monotonic call and transition counters
#[derive(Debug)]
pub(crate) struct MetricsState {
    pub total_calls: AtomicU64,
    pub short_circuited: AtomicU64,
    pub successes: AtomicU64,
    pub failed_calls: AtomicU64,
    pub transitions: AtomicU64,
    pub last_state_change: Mutex<Instant>,
}

impl MetricsState {
    pub fn new(now: Instant) -> Self {
        Self {
            total_calls: AtomicU64::new(0),
            short_circuited: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            failed_calls: AtomicU64::new(0),
            transitions: AtomicU64::new(0),
            last_state_change: Mutex::new(now),
        }
    }

    pub fn record_call(&self) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_short_circuit(&self) {
        self.short_circuited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transition(&self, now: Instant) {
        self.transitions.fetch_add(1, Ordering::Relaxed);
        *self.last_state_change.lock() = now;
    }

    pub fn load(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}
