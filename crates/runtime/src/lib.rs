// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nucleus-runtime: the threaded worker loop built on top of
//! `nucleus-core`'s data model and resolver dispatch algorithm.
//!
//! One [`Worker`] per OS thread; a shared [`ProcessorCoordinator`] keyed
//! by registration order guards run-transition state across workers
//! (spec §5, §9); [`WorkerControl`] carries cooperative shutdown and the
//! per-event cancellation flag every `Get` call site and processor
//! boundary observes.

pub mod control;
pub mod coordinator;
pub mod error;
pub mod spawn;
pub mod worker;

pub use control::WorkerControl;
pub use coordinator::ProcessorCoordinator;
pub use error::SpawnError;
pub use spawn::{spawn_worker, WorkerHandle};
pub use worker::Worker;
