//! Lifecycle tests for circuit breaker functionality.
//!
//! These exercise the breaker end to end: construction, counting, opening,
//! lazy half-open evaluation, probing and notification.

#[cfg(test)]
mod lifecycle_tests {
    use super::super::{state::CircuitBreaker, types::StateKind};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread::sleep;
    use std::time::Duration;
    use tripwire_core::Error;

    fn fail() -> Result<(), Error> {
        Err(Error::protected_call("fail"))
    }

    fn succeed() -> Result<(), Error> {
        Ok(())
    }

    fn call_times(cb: &CircuitBreaker, times: u32, protected_code: fn() -> Result<(), Error>) {
        for _ in 0..times {
            cb.attempt_call(protected_code);
        }
    }

    fn recorder(cb: &CircuitBreaker) -> Arc<Mutex<Vec<StateKind>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        cb.subscribe(move |_: &CircuitBreaker, state: StateKind| sink.lock().push(state));
        seen
    }

    #[test]
    fn test_full_circuit_breaker_lifecycle() {
        let cb = CircuitBreaker::new(2, Duration::from_millis(50)).unwrap();
        let invocations = AtomicUsize::new(0);
        let failing = || {
            invocations.fetch_add(1, Ordering::SeqCst);
            fail()
        };

        // Two failures open the circuit
        cb.attempt_call(failing).attempt_call(failing);
        assert!(cb.is_open());
        assert_eq!(invocations.load(Ordering::SeqCst), 2);

        // Immediate third call is skipped
        cb.attempt_call(failing);
        assert_eq!(invocations.load(Ordering::SeqCst), 2);

        // Past the timeout a status read reports half-open
        sleep(Duration::from_millis(75));
        assert!(cb.is_half_open());

        // A failing probe reopens
        assert!(cb.attempt_call(failing).is_open());
        assert_eq!(invocations.load(Ordering::SeqCst), 3);

        // A succeeding probe closes and resets the count
        sleep(Duration::from_millis(75));
        assert!(cb.is_half_open());
        assert!(cb.attempt_call(succeed).is_closed());
        assert_eq!(cb.failures(), 0);
    }

    #[test]
    fn test_threshold_reached_opens_exactly_once() {
        const THRESHOLD: u32 = 10;
        let cb = CircuitBreaker::new(THRESHOLD, Duration::from_secs(300)).unwrap();
        let seen = recorder(&cb);
        let invocations = AtomicUsize::new(0);
        let failing = || {
            invocations.fetch_add(1, Ordering::SeqCst);
            fail()
        };

        for _ in 0..THRESHOLD {
            cb.attempt_call(failing);
        }
        assert!(cb.is_open());
        assert_eq!(*seen.lock(), vec![StateKind::Open]);

        cb.attempt_call(failing);
        assert_eq!(invocations.load(Ordering::SeqCst), THRESHOLD as usize);
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_failures_count_one_per_call_until_open() {
        let cb = CircuitBreaker::new(4, Duration::from_secs(300)).unwrap();

        for expected in 1..4 {
            cb.attempt_call(fail);
            assert_eq!(cb.failures(), expected);
            assert!(cb.is_closed());
            assert!(!cb.is_threshold_reached());
        }

        cb.attempt_call(fail);
        assert_eq!(cb.failures(), 4);
        assert!(cb.is_threshold_reached());
        assert!(cb.is_open());
    }

    #[test]
    fn test_repeated_open_attempts_notify_once() {
        let cb = CircuitBreaker::new(2, Duration::from_secs(300)).unwrap();
        let seen = recorder(&cb);

        call_times(&cb, 2, fail);
        call_times(&cb, 2, fail);

        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_recovery_notifies_each_transition() {
        let cb = CircuitBreaker::new(2, Duration::from_millis(10)).unwrap();
        let seen = recorder(&cb);

        call_times(&cb, 2, fail);
        sleep(Duration::from_millis(25));
        cb.attempt_call(succeed);

        assert_eq!(
            *seen.lock(),
            vec![StateKind::Open, StateKind::HalfOpen, StateKind::Closed]
        );
    }

    #[test]
    fn test_manual_close_from_open() {
        let cb = CircuitBreaker::new(2, Duration::from_secs(300)).unwrap();
        call_times(&cb, 2, fail);
        assert!(cb.is_open());

        cb.close();

        assert!(cb.is_closed());
        assert_eq!(cb.failures(), 0);
    }

    #[test]
    fn test_manual_open_from_half_open() {
        let cb = CircuitBreaker::new(1, Duration::from_millis(5)).unwrap();
        cb.attempt_call(fail);
        sleep(Duration::from_millis(15));
        assert!(cb.is_half_open());

        let seen = recorder(&cb);
        cb.open();

        assert!(cb.is_open());
        assert_eq!(*seen.lock(), vec![StateKind::Open]);
    }

    #[test]
    fn test_last_failure_tracks_most_recent_call() {
        let cb = CircuitBreaker::new(10, Duration::from_secs(300)).unwrap();
        assert!(cb.last_failure().is_none());

        cb.attempt_call(|| Err::<(), _>("first"));
        cb.attempt_call(|| Err::<(), _>("second"));
        assert_eq!(
            cb.last_failure().unwrap().failure_message(),
            Some("second")
        );

        cb.attempt_call(succeed);
        assert!(cb.last_failure().is_none());
    }

    #[test]
    fn test_returned_value_is_discarded() {
        let cb = CircuitBreaker::new(1, Duration::from_secs(300)).unwrap();
        assert!(cb.attempt_call(|| Ok::<_, Error>(42)).is_closed());
    }

    #[tokio::test]
    async fn test_async_lifecycle() {
        let cb = CircuitBreaker::new(2, Duration::from_millis(50)).unwrap();
        let invocations = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let invocations = Arc::clone(&invocations);
            cb.attempt_call_async(|| async move {
                invocations.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(1)).await;
                Err::<(), _>(Error::protected_call("remote unavailable"))
            })
            .await;
        }

        assert!(cb.is_open());
        assert_eq!(invocations.load(Ordering::SeqCst), 2);
        assert!(cb.last_failure().is_none());

        tokio::time::sleep(Duration::from_millis(80)).await;

        let closed = cb
            .attempt_call_async(|| async { Ok::<_, Error>("pong") })
            .await
            .is_closed();
        assert!(closed);
        assert_eq!(cb.failures(), 0);
    }

    #[tokio::test]
    async fn test_async_failure_is_captured() {
        let cb = CircuitBreaker::new(3, Duration::from_secs(300)).unwrap();

        cb.attempt_call_async(|| async {
            Err::<(), _>(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "upstream timed out",
            ))
        })
        .await;

        let failure = cb.last_failure().unwrap();
        assert!(failure.is_protected_call());
        assert_eq!(failure.failure_message(), Some("upstream timed out"));
        assert_eq!(cb.failures(), 1);
    }
}
