// SPDX-License-Identifier: MIT

//! Starting and stopping worker threads (spec §5 "one Worker ≡ one
//! thread", §4.7 shutdown channels).

use crate::control::WorkerControl;
use crate::error::SpawnError;
use crate::worker::Worker;
use nucleus_core::Clock;
use std::thread::JoinHandle;

/// Spawn `worker` on its own OS thread, returning a handle the caller uses
/// to request shutdown and wait for (or abandon) completion.
pub fn spawn_worker<C>(mut worker: Worker<C>) -> Result<WorkerHandle, SpawnError>
where
    C: Clock + Send + 'static,
{
    let control = worker.control().clone();
    let id = worker.id().clone();
    let join_handle = std::thread::Builder::new()
        .name(id.as_str().to_string())
        .spawn(move || worker.run())?;
    Ok(WorkerHandle { join_handle: Some(join_handle), control })
}

/// A running worker thread. Dropping this handle without calling
/// [`WorkerHandle::join`] or [`WorkerHandle::abandon`] detaches the
/// thread, which then runs to completion (or forever, if wedged)
/// independently.
pub struct WorkerHandle {
    join_handle: Option<JoinHandle<()>>,
    control: WorkerControl,
}

impl WorkerHandle {
    pub fn control(&self) -> &WorkerControl {
        &self.control
    }

    /// Cooperative shutdown: request quit, then block until the worker's
    /// current event finishes and its `Loop` returns (spec §4.7).
    pub fn join(mut self) {
        self.control.quit();
        if let Some(handle) = self.join_handle.take() {
            if handle.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }
    }

    /// Last-resort shutdown: request cancellation of the in-progress
    /// event and stop waiting for the thread (spec §4.7 "last-resort" —
    /// safe Rust cannot terminate another OS thread outright, so this is
    /// an abandonment rather than a true kill; see `control` module docs).
    pub fn abandon(mut self) {
        self.control.quit();
        self.control.cancel_current_event();
        self.join_handle = None;
    }
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
