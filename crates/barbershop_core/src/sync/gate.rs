//! # Rendezvous Gate
//!
//! A single-slot, one-shot signal. One side calls [`RendezvousGate::signal`],
//! the other blocks in [`RendezvousGate::await_and_consume`] until the flag is
//! up and then takes it down again.
//!
//! ```text
//!   signal()                      await_and_consume()
//!   ────────                      ───────────────────
//!   lock                          lock
//!   signaled = true               while !signaled: wait (lock released)
//!   notify_one                    signaled = false
//!   unlock                        unlock
//! ```
//!
//! The gate is not a semaphore: two signals before a consume collapse into
//! one. It is not a broadcast either: each signal is consumed by exactly one
//! waiter, and every other waiter goes back to sleep untouched.

use parking_lot::{Condvar, Mutex};

/// One-shot signal/wait rendezvous.
#[derive(Debug, Default)]
pub struct RendezvousGate {
    /// Whether a signal is waiting to be consumed.
    signaled: Mutex<bool>,
    /// Wakes tasks blocked in `await_and_consume`.
    raised: Condvar,
}

impl RendezvousGate {
    /// Creates a lowered gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the gate and wakes one waiter. Never blocks on the waiter.
    ///
    /// Signaling an already raised gate changes nothing.
    pub fn signal(&self) {
        let mut signaled = self.signaled.lock();
        *signaled = true;
        self.raised.notify_one();
    }

    /// Blocks until the gate is raised, then lowers it.
    ///
    /// The predicate is re-checked after every wake: a waiter that loses the
    /// race for a signal goes back to sleep without side effects.
    pub fn await_and_consume(&self) {
        let mut signaled = self.signaled.lock();
        while !*signaled {
            self.raised.wait(&mut signaled);
        }
        *signaled = false;
    }

    /// Lowers the gate if raised, without blocking.
    ///
    /// Returns `true` if a signal was consumed.
    pub fn try_consume(&self) -> bool {
        let mut signaled = self.signaled.lock();
        std::mem::replace(&mut *signaled, false)
    }

    /// Snapshot of the flag.
    #[must_use]
    pub fn is_signaled(&self) -> bool {
        *self.signaled.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_signal_then_consume_does_not_block() {
        let gate = RendezvousGate::new();
        gate.signal();
        gate.await_and_consume();
        assert!(!gate.is_signaled());
    }

    #[test]
    fn test_double_signal_collapses() {
        let gate = RendezvousGate::new();
        gate.signal();
        gate.signal();

        assert!(gate.try_consume());
        assert!(!gate.try_consume());
    }

    #[test]
    fn test_waiter_wakes_on_signal() {
        let gate = Arc::new(RendezvousGate::new());
        let woke = Arc::new(AtomicUsize::new(0));

        let waiter = {
            let gate = Arc::clone(&gate);
            let woke = Arc::clone(&woke);
            thread::spawn(move || {
                gate.await_and_consume();
                woke.fetch_add(1, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(20));
        assert_eq!(woke.load(Ordering::SeqCst), 0);

        gate.signal();
        waiter.join().unwrap();
        assert_eq!(woke.load(Ordering::SeqCst), 1);
        assert!(!gate.is_signaled());
    }

    #[test]
    fn test_one_signal_one_consumer() {
        let gate = Arc::new(RendezvousGate::new());
        let passed = Arc::new(AtomicUsize::new(0));

        let waiters: Vec<_> = (0..2)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let passed = Arc::clone(&passed);
                thread::spawn(move || {
                    gate.await_and_consume();
                    passed.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        gate.signal();
        while passed.load(Ordering::SeqCst) == 0 {
            thread::yield_now();
        }
        thread::sleep(Duration::from_millis(30));
        assert_eq!(passed.load(Ordering::SeqCst), 1);

        gate.signal();
        for waiter in waiters {
            waiter.join().unwrap();
        }
        assert_eq!(passed.load(Ordering::SeqCst), 2);
    }
}
