// SPDX-License-Identifier: MIT

//! A per-worker liveness slot, written by the worker thread and polled by
//! the supervisor (spec §5: "a shared double slot per Worker, written
//! only by that Worker, polled by the Supervisor. No fence required
//! beyond natural word-store atomicity").
//!
//! The original stores a `double` (seconds since epoch); this stores
//! epoch milliseconds in an `AtomicU64`, which gives the same
//! single-writer/many-reader liveness check without needing an atomic
//! float type.

use crate::clock::Clock;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Heartbeat(AtomicU64);

impl Heartbeat {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Called only by the owning worker thread.
    pub fn ping(&self, clock: &impl Clock) {
        self.0.store(clock.epoch_ms(), Ordering::Relaxed);
    }

    /// Called by the supervisor to check liveness.
    pub fn last_beat_ms(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Milliseconds since the last heartbeat, as observed by the supervisor.
    pub fn age_ms(&self, clock: &impl Clock) -> u64 {
        clock.epoch_ms().saturating_sub(self.last_beat_ms())
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
