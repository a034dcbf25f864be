//! Thread-safe signals shared between the console and host workers.
//!
//! The console only ever sets signals and checks whether they are set. Host
//! workers (recorders, graph renderers) own clones of the same handles and
//! block on them with [`Signal::wait`] or [`Signal::wait_timeout`]. Setting a
//! signal that is already set is a no-op.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Minimal capability the console needs from an event primitive.
///
/// Hosts may bring their own primitive; [`Signal`] is the default
/// implementation.
pub trait EventSignal: Send + Sync {
    /// Marks the signal as set and wakes any observers.
    fn set(&self);

    /// Returns `true` once the signal has been set.
    fn is_set(&self) -> bool;
}

impl<T> EventSignal for Arc<T>
where
    T: EventSignal + ?Sized,
{
    fn set(&self) {
        (**self).set();
    }

    fn is_set(&self) -> bool {
        (**self).is_set()
    }
}

#[derive(Default)]
struct SignalState {
    flag: Mutex<bool>,
    changed: Condvar,
}

impl SignalState {
    fn flag(&self) -> MutexGuard<'_, bool> {
        // A panicking observer cannot leave the flag half-written.
        self.flag.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cloneable, level-triggered event flag.
///
/// All clones observe the same state.
///
/// # Example
///
/// ```
/// use clyo::{EventSignal, Signal};
///
/// let stop = Signal::new();
/// let observer = stop.clone();
/// assert!(!observer.is_set());
/// stop.set();
/// stop.set();
/// assert!(observer.is_set());
/// ```
#[derive(Clone, Default)]
pub struct Signal {
    state: Arc<SignalState>,
}

impl Signal {
    /// Creates an unset signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the signal so observers can wait for the next occurrence.
    pub fn clear(&self) {
        *self.state.flag() = false;
    }

    /// Blocks until the signal is set.
    pub fn wait(&self) {
        let guard = self.state.flag();
        let _set = self
            .state
            .changed
            .wait_while(guard, |set| !*set)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Blocks until the signal is set or `timeout` elapses.
    ///
    /// Returns `true` when the signal is set on return.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.state.flag();
        let (set, _timeout) = self
            .state
            .changed
            .wait_timeout_while(guard, timeout, |set| !*set)
            .unwrap_or_else(PoisonError::into_inner);
        *set
    }
}

impl EventSignal for Signal {
    fn set(&self) {
        let mut flag = self.state.flag();
        if !*flag {
            *flag = true;
            self.state.changed.notify_all();
        }
    }

    fn is_set(&self) -> bool {
        *self.state.flag()
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("is_set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn new_signal_is_unset() {
        assert!(!Signal::new().is_set());
    }

    #[test]
    fn setting_twice_is_idempotent() {
        let signal = Signal::new();
        signal.set();
        signal.set();
        assert!(signal.is_set());
    }

    #[test]
    fn clones_share_state() {
        let signal = Signal::new();
        let observer = signal.clone();
        signal.set();
        assert!(observer.is_set());
        observer.clear();
        assert!(!signal.is_set());
    }

    #[test]
    fn wait_timeout_expires_when_unset() {
        let signal = Signal::new();
        assert!(!signal.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn wait_returns_after_set_from_another_thread() {
        let signal = Signal::new();
        let setter = signal.clone();
        let handle = thread::spawn(move || setter.set());
        signal.wait();
        handle.join().expect("setter thread");
        assert!(signal.is_set());
    }

    #[test]
    fn arc_wrapped_signal_forwards_calls() {
        let signal: Arc<dyn EventSignal> = Arc::new(Signal::new());
        signal.set();
        assert!(signal.is_set());
    }
}
