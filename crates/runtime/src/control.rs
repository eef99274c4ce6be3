// SPDX-License-Identifier: MIT

//! Cooperative and forceful shutdown signals a [`crate::worker::Worker`]
//! observes (spec §4.7, §9 "Non-local escape from interrupt").
//!
//! The original installs a `setjmp` recovery point inside `OneEvent` and
//! triggers it from a signal handler. Safe Rust has no non-local escape
//! across arbitrary user code, so the cooperative half becomes a token
//! checked at `OneEvent`'s processor boundary and the pause loop; the
//! forceful half becomes "stop joining the thread" rather than an actual
//! interrupt, since nothing short of `unsafe` can abort another OS thread
//! mid-instruction. This is the one place the redesign changes the
//! original's guarantee: a worker wedged in a runaway user factory cannot
//! actually be killed, only abandoned at process exit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flags a [`crate::worker::Worker`] polls at its loop and
/// processor boundaries, and a [`crate::worker::WorkerHandle`] sets from
/// outside the thread.
#[derive(Clone, Default)]
pub struct WorkerControl {
    inner: Arc<Flags>,
}

#[derive(Default)]
struct Flags {
    quit: AtomicBool,
    pause: AtomicBool,
    cancel_current_event: AtomicBool,
}

impl WorkerControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cooperative shutdown: the Loop exits after its current event (spec
    /// §4.7). Idempotent.
    pub fn quit(&self) {
        self.inner.quit.store(true, Ordering::SeqCst);
    }

    pub fn is_quitting(&self) -> bool {
        self.inner.quit.load(Ordering::SeqCst)
    }

    pub fn pause(&self) {
        self.inner.pause.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.inner.pause.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.inner.pause.load(Ordering::SeqCst)
    }

    /// Request that the in-progress event be abandoned at the next
    /// `Get` call or processor boundary, converting it into a clean
    /// `NoMoreSources` exit (spec §4.7, §9).
    pub fn cancel_current_event(&self) {
        self.inner.cancel_current_event.store(true, Ordering::SeqCst);
    }

    pub fn is_event_cancelled(&self) -> bool {
        self.inner.cancel_current_event.load(Ordering::SeqCst)
    }

    /// Consume the per-event cancellation request, readying it for the
    /// next event.
    pub fn clear_event_cancellation(&self) {
        self.inner.cancel_current_event.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
