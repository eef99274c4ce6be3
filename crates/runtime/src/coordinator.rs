// SPDX-License-Identifier: MIT

//! The run-transition coordinator: framework-owned, per-[`Processor`]
//! mutex state, keyed by registration order rather than embedded in the
//! user type (spec §9 "Shared mutable Processor state").

use nucleus_core::{Processor, ProcessorError, ProcessorId, RunNumber};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct RunState {
    brun_called: bool,
    erun_called: bool,
    brun_runnumber: Option<RunNumber>,
}

/// Owns the shared [`Processor`] list and the per-processor mutex guarding
/// `brun_called`/`erun_called`/`brun_runnumber`, keyed by [`ProcessorId`]
/// (spec §3, §5, §9 "keyed by Processor identity"). A single instance is
/// shared, by `Arc`, across every worker.
///
/// Generic over `R`, the resolver handle type `Processor::evnt`/`brun`
/// receive — concretely `nucleus_runtime::Worker<C>` for whichever `Clock`
/// the owning workers use.
pub struct ProcessorCoordinator<R> {
    processors: Vec<Arc<dyn Processor<R>>>,
    run_state: Vec<Mutex<RunState>>,
}

impl<R> ProcessorCoordinator<R> {
    pub fn new(processors: Vec<Arc<dyn Processor<R>>>) -> Self {
        let run_state = processors.iter().map(|_| Mutex::new(RunState::default())).collect();
        Self { processors, run_state }
    }

    pub fn processors(&self) -> &[Arc<dyn Processor<R>>] {
        &self.processors
    }

    pub fn init_all(&self) -> Result<(), ProcessorError> {
        for p in &self.processors {
            p.init()?;
        }
        Ok(())
    }

    /// Run every processor's `fini`, logging but never propagating
    /// failures (spec §4.1, §7: shutdown must complete).
    pub fn fini_all(&self) {
        for p in &self.processors {
            if let Err(err) = p.fini() {
                tracing::warn!(processor = p.name(), error = %err, "fini failed");
            }
        }
    }

    /// The run-transition critical section for one processor, acquiring
    /// and releasing its mutex before the caller invokes `evnt` (spec
    /// §4.6 step 4, §5). Returns once `brun_called=true ∧
    /// erun_called=false` holds for `run_number`. `resolver` is forwarded
    /// to `brun` untouched (spec §4.5 `brun(worker, run)`).
    pub fn ensure_run_transition(
        &self,
        id: ProcessorId,
        run_number: RunNumber,
        resolver: &mut R,
    ) -> Result<(), ProcessorError> {
        let processor = &self.processors[id.0];
        let mut state = self.run_state[id.0].lock();

        if state.brun_runnumber != Some(run_number) {
            if state.brun_called && !state.erun_called {
                processor.erun()?;
                state.erun_called = true;
            }
            state.brun_called = false;
        }

        if !state.brun_called {
            processor.brun(run_number, resolver)?;
            state.brun_called = true;
            state.erun_called = false;
            state.brun_runnumber = Some(run_number);
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
