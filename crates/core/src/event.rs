// SPDX-License-Identifier: MIT

//! The current record a [`crate::processor::Processor`] sees (spec §3, §4.3).
//! Overwritten in place by each `OneEvent` iteration; never escapes the
//! worker that owns it.

use std::any::Any;
use std::fmt;

/// Monotonic run identifier; a contiguous range of events sharing
/// configuration (spec glossary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunNumber(pub i64);

impl fmt::Display for RunNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one event within its source's sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventNumber(pub i64);

impl fmt::Display for EventNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The currently-loaded record. Holds an opaque, source-owned payload that
/// only the source implementation interprets; the core never looks inside
/// it, it only forwards it back to `Supervisor::next_event`/source calls.
pub struct Event {
    run_number: RunNumber,
    event_number: EventNumber,
    payload: Option<Box<dyn Any + Send>>,
    auto_free: bool,
}

impl Event {
    pub fn new(run_number: RunNumber, event_number: EventNumber) -> Self {
        Self { run_number, event_number, payload: None, auto_free: true }
    }

    pub fn with_payload(
        run_number: RunNumber,
        event_number: EventNumber,
        payload: Box<dyn Any + Send>,
    ) -> Self {
        Self { run_number, event_number, payload: Some(payload), auto_free: true }
    }

    pub fn run_number(&self) -> RunNumber {
        self.run_number
    }

    pub fn event_number(&self) -> EventNumber {
        self.event_number
    }

    pub fn auto_free(&self) -> bool {
        self.auto_free
    }

    pub fn set_auto_free(&mut self, value: bool) {
        self.auto_free = value;
    }

    pub fn payload(&self) -> Option<&(dyn Any + Send)> {
        self.payload.as_deref()
    }

    /// Release the source-owned payload. Idempotent.
    pub fn free_event(&mut self) {
        self.payload = None;
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("run_number", &self.run_number)
            .field("event_number", &self.event_number)
            .field("has_payload", &self.payload.is_some())
            .field("auto_free", &self.auto_free)
            .finish()
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
