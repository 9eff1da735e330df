//! State-change notification for circuit breakers.

use super::state::CircuitBreaker;
use super::types::StateKind;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Observer invoked on every breaker transition
///
/// Closures of the form `Fn(&CircuitBreaker, StateKind)` implement this
/// trait, so most callers never name it.
pub trait StateChangeListener: Send + Sync {
    fn on_state_change(&self, source: &CircuitBreaker, state: StateKind);
}

impl<F> StateChangeListener for F
where
    F: Fn(&CircuitBreaker, StateKind) + Send + Sync,
{
    fn on_state_change(&self, source: &CircuitBreaker, state: StateKind) {
        self(source, state)
    }
}

/// Handle returned by [`CircuitBreaker::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Entry = (ListenerId, Arc<dyn StateChangeListener>);

/// Registered listeners, notified in registration order
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: RwLock<Vec<Entry>>,
}

impl ListenerRegistry {
    pub fn add(&self, listener: Arc<dyn StateChangeListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let initial_len = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != initial_len
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Invoke every listener on the calling thread. The registry lock is not
    /// held while listeners run, so they may subscribe or unsubscribe.
    pub fn notify(&self, source: &CircuitBreaker, state: StateKind) {
        let snapshot: Vec<Arc<dyn StateChangeListener>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener.on_state_change(source, state);
        }
    }
}
