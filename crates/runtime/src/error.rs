// SPDX-License-Identifier: MIT

//! Errors raised by the threaded runtime itself, as opposed to the
//! dispatch-algorithm errors defined in `nucleus-core` (re-exported here
//! for convenience).

use thiserror::Error;

pub use nucleus_core::{ProcessorError, ResolveError, WorkerLoopError};

/// Failure starting a worker thread.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to spawn worker thread: {0}")]
    Io(#[from] std::io::Error),
}
