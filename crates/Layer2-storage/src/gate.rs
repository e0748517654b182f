//! One-shot init gate
//!
//! Opens exactly once, when a store completes its first successful update.
//! Any number of threads may wait; waiters arriving after the gate opened
//! return immediately. Opening happens under the gate mutex with release
//! ordering, so a reader that sees the gate open also sees every cache write
//! made before [`InitGate::open`].

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct InitGate {
    open: AtomicBool,
    lock: Mutex<()>,
    cond: Condvar,
}

impl InitGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking check
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Open the gate, waking every waiter.
    ///
    /// Returns `true` only for the call that actually opened it.
    pub fn open(&self) -> bool {
        let _guard = self.lock.lock();
        if self.open.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.cond.notify_all();
        true
    }

    /// Block until the gate opens. No timeout.
    pub fn wait(&self) {
        if self.is_open() {
            return;
        }
        let mut guard = self.lock.lock();
        while !self.is_open() {
            self.cond.wait(&mut guard);
        }
    }

    /// Block until the gate opens or `timeout` elapses.
    ///
    /// Returns whether the gate is open.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_open() {
            return true;
        }
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock.lock();
        while !self.is_open() {
            if self.cond.wait_until(&mut guard, deadline).timed_out() {
                return self.is_open();
            }
        }
        true
    }
}
