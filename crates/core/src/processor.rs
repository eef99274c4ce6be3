// SPDX-License-Identifier: MIT

//! The [`Processor`] trait: user-supplied per-event analysis logic, shared
//! across all workers (spec §4.5).
//!
//! A `Processor` is invoked concurrently by multiple worker threads (one
//! event each); only the run-boundary bookkeeping around `brun`/`erun`
//! needs synchronization, and that lives in `nucleus-runtime`'s
//! coordinator rather than on the trait itself (spec §9's recommended
//! redesign — see DESIGN.md).

use crate::error::ProcessorError;
use crate::event::{EventNumber, RunNumber};

/// Per-event analysis logic. Implementations must make `evnt` internally
/// thread-safe: it is called concurrently, once per event, across every
/// worker processing events for this processor (spec §5).
///
/// Generic over `R`, the resolver handle passed to `evnt` — concretely
/// `nucleus_runtime::Worker<C>` — for the same reason
/// [`crate::factory::FactoryBase`] is generic over its resolver context:
/// a non-generic method is required for `Arc<dyn Processor<R>>` to stay
/// object-safe, so `R` is fixed at the trait rather than the method.
pub trait Processor<R>: Send + Sync {
    /// Human-readable name, used in diagnostics and logs.
    fn name(&self) -> &str;

    /// Called once, before any worker starts (spec §3 Processor lifecycle).
    fn init(&self) -> Result<(), ProcessorError> {
        Ok(())
    }

    /// Called once per run, the first time a worker observes a new run
    /// number for this processor. `resolver` is the calling worker's
    /// handle, exactly as `evnt` receives it (spec §4.5 `brun(worker,
    /// run)`, original `proc->brun(this, run_number)`), so a processor can
    /// resolve run-scoped objects (e.g. calibration-derived factories)
    /// while setting up for the run.
    fn brun(&self, run_number: RunNumber, resolver: &mut R) -> Result<(), ProcessorError> {
        let _ = (run_number, resolver);
        Ok(())
    }

    /// Called once per event, with `resolver` scoped to the calling
    /// worker's current event — the same handle that worker uses
    /// internally for `Get` (spec §4.5).
    fn evnt(&self, event_number: EventNumber, resolver: &mut R) -> Result<(), ProcessorError>;

    /// Called when a run ends (either a new run number appears, or the
    /// worker shuts down — the latter is a Supervisor concern, not this
    /// trait's, per spec §8 scenario 2).
    fn erun(&self) -> Result<(), ProcessorError> {
        Ok(())
    }

    /// Called once at shutdown. Failures are logged, never re-raised
    /// (spec §4.1/§7: shutdown must complete).
    fn fini(&self) -> Result<(), ProcessorError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
