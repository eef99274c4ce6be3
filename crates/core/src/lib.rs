// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nucleus-core: data model for the per-worker event loop and on-demand
//! factory resolver at the heart of the event-processing framework.
//!
//! This crate owns the pieces that need no threads: the typed [`Object`]
//! and [`Factory`] model, the [`FactoryRegistry`], the [`Event`] container,
//! the [`resolver`] dispatch algorithm, the [`Processor`] trait, the call
//! stack, the error taxonomy, and the external-interface traits
//! ([`Supervisor`], [`ParameterManager`], [`Calibration`]) that the
//! `nucleus-runtime` crate drives.

pub mod macros;

pub mod callstack;
pub mod clock;
pub mod error;
pub mod event;
pub mod factory;
pub mod heartbeat;
pub mod id;
pub mod object;
pub mod processor;
pub mod registry;
pub mod resolver;
pub mod supervisor;
pub mod version;

pub use callstack::{CallStack, Frame};
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{
    CalibrationError, FactoryError, NextEventError, ProcessorError, ResolveError, SourceIoError,
    WorkerLoopError,
};
pub use event::{Event, EventNumber, RunNumber};
pub use factory::{Factory, FactoryBase};
pub use heartbeat::Heartbeat;
pub use id::{ObjectId, ObjectIdGen, ProcessorId, Tag, TypeKey, WorkerId};
pub use object::{AnyObject, DataType, Object};
pub use processor::Processor;
pub use registry::FactoryRegistry;
pub use resolver::{DefaultTags, Resolve, ResolverHost};
pub use supervisor::{Calibration, ParameterManager, Supervisor};
pub use version::version_string;
