//! Circuit breaker state management and execution logic.

use super::builder::CircuitBreakerBuilder;
use super::config::CircuitBreakerConfig;
use super::listeners::{ListenerId, ListenerRegistry, StateChangeListener};
use super::metrics::MetricsState;
use super::transitions::Machine;
use super::types::{CircuitBreakerStats, StateKind};
use parking_lot::{Mutex, ReentrantMutex};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};
use tripwire_core::{BoxError, Error, Result};

/// Circuit breaker implementation
///
/// One lock guards the state machine. It is taken for the eligibility check
/// before a call, for the outcome-driven transition after it, for status
/// reads and for forced transitions, but never while protected code runs.
/// Concurrent callers may therefore all pass the check while the breaker is
/// Closed or HalfOpen and run their calls side by side; in HalfOpen each of
/// them can close or reopen the circuit independently.
///
/// Transitions and their notifications are serialized by a reentrant dispatch
/// lock, so listeners see transitions in the order they happened and may
/// still call back into the breaker.
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    dispatch: ReentrantMutex<()>,
    machine: Mutex<Machine>,
    last_failure: Mutex<Option<Arc<Error>>>,
    listeners: ListenerRegistry,
    metrics: MetricsState,
}

impl CircuitBreaker {
    /// Create a new circuit breaker, rejecting `threshold < 1` or a zero timeout
    pub fn new(threshold: u32, timeout: Duration) -> Result<Self> {
        Self::builder().threshold(threshold).timeout(timeout).build()
    }

    /// Create a new circuit breaker from a configuration value
    pub fn from_config(config: CircuitBreakerConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> CircuitBreakerBuilder {
        CircuitBreakerBuilder::default()
    }

    pub(crate) fn from_parts(
        name: String,
        config: CircuitBreakerConfig,
        listeners: Vec<Arc<dyn StateChangeListener>>,
    ) -> Result<Self> {
        config.validate()?;

        let now = Instant::now();
        let breaker = Self {
            dispatch: ReentrantMutex::new(()),
            machine: Mutex::new(Machine::new(config.threshold, config.timeout, now)),
            name,
            config,
            last_failure: Mutex::new(None),
            listeners: ListenerRegistry::default(),
            metrics: MetricsState::new(now),
        };
        for listener in listeners {
            breaker.listeners.add(listener);
        }

        debug!(
            breaker = %breaker.name,
            threshold = breaker.config.threshold,
            timeout_ms = breaker.config.timeout.as_millis() as u64,
            "Circuit breaker created"
        );
        breaker.listeners.notify(&breaker, StateKind::Closed);

        Ok(breaker)
    }

    /// Run `protected_code` unless the circuit is open
    ///
    /// Failures are captured, drive the state machine and are exposed through
    /// [`last_failure`](Self::last_failure); they never escape this call.
    /// Returns the breaker so the caller can inspect it fluently:
    ///
    /// ```
    /// use tripwire_breaker::CircuitBreaker;
    /// use std::time::Duration;
    ///
    /// let cb = CircuitBreaker::new(1, Duration::from_secs(60)).unwrap();
    /// let healthy = cb.attempt_call(|| Err::<(), _>("boom")).is_closed();
    /// assert!(!healthy);
    /// ```
    pub fn attempt_call<F, T, E>(&self, protected_code: F) -> &Self
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: Into<BoxError>,
    {
        if self.begin_attempt() {
            let outcome = protected_code();
            self.finish_attempt(outcome.map(drop).map_err(Into::into));
        }
        self
    }

    /// Same protocol as [`attempt_call`](Self::attempt_call) for async code.
    /// The breaker lock is never held across the `.await`.
    pub async fn attempt_call_async<F, Fut, T, E>(&self, protected_code: F) -> &Self
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Into<BoxError>,
    {
        if self.begin_attempt() {
            let outcome = protected_code().await;
            self.finish_attempt(outcome.map(drop).map_err(Into::into));
        }
        self
    }

    /// Clear the last failure and run the about-to-call hook.
    /// Returns false when the call must be skipped.
    fn begin_attempt(&self) -> bool {
        *self.last_failure.lock() = None;
        self.metrics.record_call();

        if self.drive(Machine::about_to_call) == StateKind::Open {
            self.metrics.record_short_circuit();
            debug!(breaker = %self.name, "Circuit breaker open, skipping protected call");
            return false;
        }
        true
    }

    fn finish_attempt(&self, outcome: std::result::Result<(), BoxError>) {
        match outcome {
            Ok(()) => {
                trace!(breaker = %self.name, "Protected call succeeded");
                self.metrics.record_success();
                self.drive(Machine::call_succeeded);
            }
            Err(source) => {
                let failure = Arc::new(Error::protected_call_with_source(source));
                trace!(breaker = %self.name, error = %failure, "Protected call failed");
                *self.last_failure.lock() = Some(failure);
                self.metrics.record_failure();
                self.drive(Machine::call_failed);
            }
        }
    }

    /// Apply `event` under the machine lock and announce any transition
    /// before releasing the dispatch lock. Returns the state kind the event
    /// left behind.
    fn drive<F>(&self, event: F) -> StateKind
    where
        F: FnOnce(&mut Machine, Instant) -> Option<StateKind>,
    {
        // taken before the machine lock; a listener reentering the breaker
        // finds the machine lock free
        let _dispatch = self.dispatch.lock();
        let (changed, current, failures) = {
            let mut machine = self.machine.lock();
            let changed = event(&mut machine, Instant::now());
            (changed, machine.kind(), machine.context().failures)
        };

        if let Some(kind) = changed {
            self.announce(kind, failures);
        }
        current
    }

    fn announce(&self, kind: StateKind, failures: u32) {
        self.metrics.record_transition(Instant::now());

        match kind {
            StateKind::Open => warn!(
                breaker = %self.name,
                failures,
                threshold = self.config.threshold,
                "Circuit breaker opening"
            ),
            StateKind::HalfOpen => {
                info!(breaker = %self.name, "Circuit breaker entering half-open state")
            }
            StateKind::Closed => info!(breaker = %self.name, "Circuit breaker closing"),
        }

        self.listeners.notify(self, kind);
    }

    /// Observe the current state, moving Open to HalfOpen if the timeout
    /// has elapsed. Reading the state is therefore not side-effect free.
    pub fn state(&self) -> StateKind {
        self.drive(Machine::refresh)
    }

    pub fn is_closed(&self) -> bool {
        self.state() == StateKind::Closed
    }

    pub fn is_open(&self) -> bool {
        self.state() == StateKind::Open
    }

    pub fn is_half_open(&self) -> bool {
        self.state() == StateKind::HalfOpen
    }

    /// Force the circuit open, whatever the current state
    pub fn open(&self) {
        self.drive(|machine, now| Some(machine.transition_to(StateKind::Open, now)));
    }

    /// Force the circuit closed, whatever the current state
    pub fn close(&self) {
        self.drive(|machine, now| Some(machine.transition_to(StateKind::Closed, now)));
    }

    pub fn is_threshold_reached(&self) -> bool {
        self.machine.lock().context().is_threshold_reached()
    }

    /// Failures counted since the circuit last closed
    pub fn failures(&self) -> u32 {
        self.machine.lock().context().failures
    }

    pub fn threshold(&self) -> u32 {
        self.config.threshold
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Failure captured by the most recent attempt, `None` if it succeeded,
    /// was skipped, or no attempt has been made yet
    pub fn last_failure(&self) -> Option<Arc<Error>> {
        self.last_failure.lock().clone()
    }

    /// Register a listener for every subsequent transition
    pub fn subscribe<L>(&self, listener: L) -> ListenerId
    where
        L: StateChangeListener + 'static,
    {
        let id = self.listeners.add(Arc::new(listener));
        debug!(breaker = %self.name, listener = ?id, "State change listener added");
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(id);
        if removed {
            debug!(breaker = %self.name, listener = ?id, "State change listener removed");
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Snapshot of counters. Reports the recorded state without refreshing.
    pub fn stats(&self) -> CircuitBreakerStats {
        let (state, failures) = {
            let machine = self.machine.lock();
            (machine.kind(), machine.context().failures)
        };

        CircuitBreakerStats {
            state,
            failures,
            threshold: self.config.threshold,
            timeout: self.config.timeout,
            total_calls: MetricsState::load(&self.metrics.total_calls),
            short_circuited: MetricsState::load(&self.metrics.short_circuited),
            successes: MetricsState::load(&self.metrics.successes),
            failed_calls: MetricsState::load(&self.metrics.failed_calls),
            transitions: MetricsState::load(&self.metrics.transitions),
            last_state_change: *self.metrics.last_state_change.lock(),
        }
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let machine = self.machine.lock();
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("state", &machine.kind())
            .field("failures", &machine.context().failures)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
