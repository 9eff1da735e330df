//! State transition logic for circuit breaker.
//!
//! Each state is a plain value carrying only its own data. The hooks below are
//! functions of `(state, context, event)` that may mutate the failure counter
//! and return the kind of state to move to. [`Machine`] applies those answers,
//! always building a fresh state value on every transition.

use super::types::StateKind;
use std::time::{Duration, Instant};

/// Live breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Closed,
    Open {
        /// Moment the circuit opened; the timeout is measured from here
        opened_at: Instant,
    },
    HalfOpen,
}

/// Breaker data shared by every state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub threshold: u32,
    pub timeout: Duration,
    pub failures: u32,
}

impl Context {
    pub fn new(threshold: u32, timeout: Duration) -> Self {
        Self {
            threshold,
            timeout,
            failures: 0,
        }
    }

    fn increase_failure_count(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    fn reset_failure_count(&mut self) {
        self.failures = 0;
    }

    pub fn is_threshold_reached(&self) -> bool {
        self.failures >= self.threshold
    }
}

impl State {
    /// Build the state for `kind`, running its entry action
    pub fn enter(kind: StateKind, ctx: &mut Context, now: Instant) -> Self {
        match kind {
            StateKind::Closed => {
                ctx.reset_failure_count();
                State::Closed
            }
            StateKind::Open => State::Open { opened_at: now },
            StateKind::HalfOpen => State::HalfOpen,
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            State::Closed => StateKind::Closed,
            State::Open { .. } => StateKind::Open,
            State::HalfOpen => StateKind::HalfOpen,
        }
    }

    /// Re-check time-based validity; only an expired Open state moves on
    pub fn refresh(&self, ctx: &Context, now: Instant) -> Option<StateKind> {
        match self {
            State::Open { opened_at }
                if now.saturating_duration_since(*opened_at) >= ctx.timeout =>
            {
                Some(StateKind::HalfOpen)
            }
            _ => None,
        }
    }

    /// Runs before protected code. Open re-checks its timeout here; the caller
    /// decides whether to skip the call by looking at the resulting state.
    pub fn on_about_to_call(&self, ctx: &Context, now: Instant) -> Option<StateKind> {
        match self {
            State::Open { .. } => self.refresh(ctx, now),
            _ => None,
        }
    }

    pub fn on_call_succeeded(&self) -> Option<StateKind> {
        match self {
            State::HalfOpen => Some(StateKind::Closed),
            _ => None,
        }
    }

    /// Every state counts the failure; Closed opens at the threshold and
    /// HalfOpen reopens unconditionally.
    pub fn on_call_failed(&self, ctx: &mut Context) -> Option<StateKind> {
        ctx.increase_failure_count();
        match self {
            State::Closed if ctx.is_threshold_reached() => Some(StateKind::Open),
            State::HalfOpen => Some(StateKind::Open),
            _ => None,
        }
    }
}

/// Current state plus context, applying hook results as transitions
#[derive(Debug, Clone)]
pub struct Machine {
    state: State,
    ctx: Context,
}

impl Machine {
    /// Start in Closed
    pub fn new(threshold: u32, timeout: Duration, now: Instant) -> Self {
        let mut ctx = Context::new(threshold, timeout);
        let state = State::enter(StateKind::Closed, &mut ctx, now);
        Self { state, ctx }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn kind(&self) -> StateKind {
        self.state.kind()
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Unconditionally replace the current state with a new `kind` state
    pub fn transition_to(&mut self, kind: StateKind, now: Instant) -> StateKind {
        self.state = State::enter(kind, &mut self.ctx, now);
        kind
    }

    fn apply(&mut self, next: Option<StateKind>, now: Instant) -> Option<StateKind> {
        next.map(|kind| self.transition_to(kind, now))
    }

    pub fn refresh(&mut self, now: Instant) -> Option<StateKind> {
        let next = self.state.refresh(&self.ctx, now);
        self.apply(next, now)
    }

    pub fn about_to_call(&mut self, now: Instant) -> Option<StateKind> {
        let next = self.state.on_about_to_call(&self.ctx, now);
        self.apply(next, now)
    }

    pub fn call_succeeded(&mut self, now: Instant) -> Option<StateKind> {
        let next = self.state.on_call_succeeded();
        self.apply(next, now)
    }

    pub fn call_failed(&mut self, now: Instant) -> Option<StateKind> {
        let next = self.state.on_call_failed(&mut self.ctx);
        self.apply(next, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(100);

    #[test]
    fn test_starts_closed_with_no_failures() {
        let machine = Machine::new(3, TIMEOUT, Instant::now());
        assert_eq!(machine.kind(), StateKind::Closed);
        assert_eq!(machine.context().failures, 0);
    }

    #[test]
    fn test_closed_counts_failures_until_threshold() {
        let now = Instant::now();
        let mut machine = Machine::new(3, TIMEOUT, now);

        assert_eq!(machine.call_failed(now), None);
        assert_eq!(machine.call_failed(now), None);
        assert_eq!(machine.context().failures, 2);
        assert_eq!(machine.call_failed(now), Some(StateKind::Open));
        assert_eq!(machine.kind(), StateKind::Open);
        assert_eq!(machine.context().failures, 3);
    }

    #[test]
    fn test_success_in_closed_does_not_clear_count() {
        let now = Instant::now();
        let mut machine = Machine::new(3, TIMEOUT, now);

        machine.call_failed(now);
        assert_eq!(machine.call_succeeded(now), None);
        machine.call_failed(now);

        assert_eq!(machine.context().failures, 2);
        assert_eq!(machine.kind(), StateKind::Closed);
    }

    #[test]
    fn test_open_expires_lazily() {
        let start = Instant::now();
        let mut machine = Machine::new(1, TIMEOUT, start);
        machine.call_failed(start);

        assert_eq!(machine.refresh(start + Duration::from_millis(99)), None);
        assert_eq!(machine.kind(), StateKind::Open);

        assert_eq!(machine.refresh(start + TIMEOUT), Some(StateKind::HalfOpen));
        assert_eq!(machine.kind(), StateKind::HalfOpen);
    }

    #[test]
    fn test_about_to_call_refreshes_open() {
        let start = Instant::now();
        let mut machine = Machine::new(1, TIMEOUT, start);
        machine.call_failed(start);

        assert_eq!(machine.about_to_call(start), None);
        assert_eq!(machine.kind(), StateKind::Open);
        assert_eq!(
            machine.about_to_call(start + TIMEOUT * 2),
            Some(StateKind::HalfOpen)
        );
    }

    #[test]
    fn test_about_to_call_is_noop_when_closed_or_half_open() {
        let now = Instant::now();
        assert_eq!(
            State::Closed.on_about_to_call(&Context::new(1, TIMEOUT), now),
            None
        );
        assert_eq!(
            State::HalfOpen.on_about_to_call(&Context::new(1, TIMEOUT), now),
            None
        );
    }

    #[test]
    fn test_half_open_failure_reopens_regardless_of_threshold() {
        let now = Instant::now();
        let mut machine = Machine::new(10, TIMEOUT, now);
        machine.transition_to(StateKind::HalfOpen, now);

        assert_eq!(machine.call_failed(now), Some(StateKind::Open));
        assert_eq!(machine.context().failures, 1);
    }

    #[test]
    fn test_half_open_success_closes_and_resets() {
        let now = Instant::now();
        let mut machine = Machine::new(2, TIMEOUT, now);
        machine.call_failed(now);
        machine.call_failed(now);
        machine.refresh(now + TIMEOUT);
        assert_eq!(machine.kind(), StateKind::HalfOpen);

        assert_eq!(machine.call_succeeded(now + TIMEOUT), Some(StateKind::Closed));
        assert_eq!(machine.context().failures, 0);
    }

    #[test]
    fn test_open_still_counts_late_failures() {
        let now = Instant::now();
        let mut machine = Machine::new(1, TIMEOUT, now);
        machine.call_failed(now);

        assert_eq!(machine.call_failed(now), None);
        assert_eq!(machine.call_succeeded(now), None);
        assert_eq!(machine.kind(), StateKind::Open);
        assert_eq!(machine.context().failures, 2);
    }

    #[test]
    fn test_reentering_open_restarts_timer() {
        let start = Instant::now();
        let later = start + Duration::from_millis(60);
        let mut machine = Machine::new(1, TIMEOUT, start);
        machine.call_failed(start);
        machine.transition_to(StateKind::Open, later);

        assert_eq!(machine.state(), &State::Open { opened_at: later });
        assert_eq!(machine.refresh(start + TIMEOUT), None);
        assert_eq!(machine.refresh(later + TIMEOUT), Some(StateKind::HalfOpen));
    }
}
