// SPDX-License-Identifier: MIT

//! Error taxonomy (spec §7). Each kind from the spec's prose taxonomy maps
//! to a concrete `thiserror` type owned by the module that raises it.

use crate::event::Event;
use crate::id::Tag;
use thiserror::Error;

/// Outcome of [`crate::supervisor::Supervisor::next_event`].
///
/// `ObjectNotAvailable` is deliberately absent here: it is a per-type
/// control-flow signal from [`SourceIoError`], not a next-event outcome.
#[derive(Debug, Error)]
pub enum NextEventError {
    /// Terminal for the Worker Loop.
    #[error("no more event sources")]
    NoMoreSources,
    /// Recoverable: logged at `OneEvent` and not raised further (spec §7).
    /// Carries whatever the source could populate — spec §4.6 step 2 ("only
    /// *ok* and *event-not-in-memory* proceed") and the original
    /// (`JEventLoop.cc`'s `GetEvent` out-parameter, still assigned on this
    /// code) both have the worker fall through to the processor loop with
    /// this event rather than skip it outright.
    #[error("event not in memory")]
    EventNotInMemory(Event),
    #[error("{0}")]
    Other(String),
}

/// Outcome of a source's attempt to materialize objects of one
/// (class name, tag) into a factory (spec §4.3).
#[derive(Debug, Error)]
pub enum SourceIoError {
    #[error("event not in memory")]
    EventNotInMemory,
    #[error("{0}")]
    Other(String),
}

/// A failure raised by user factory or processor code (spec's
/// "unrecoverable-user-error" kind). Always propagates to the caller;
/// never silently swallowed except in `fini`/destruction paths.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl FactoryError {
    pub fn msg(s: impl Into<String>) -> Self {
        Self::Message(s.into())
    }
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ProcessorError {
    pub fn msg(s: impl Into<String>) -> Self {
        Self::Message(s.into())
    }
}

/// Failure raised by the resolver's dispatch algorithm (spec §4.4).
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No factory for (class name, tag) and auto-factory-create is off.
    /// The resolver has already printed the prescriptive diagnostic and
    /// requested program quit by the time this is returned (spec §4.4 step 1).
    #[error(
        "no factory of type \"{class_name}\" with tag \"{tag}\" exists \
         (set JANA:AUTOFACTORYCREATE to auto-create one)"
    )]
    FactoryNotFound { class_name: &'static str, tag: Tag },

    /// The registry slot for this (class name, tag) is already being
    /// resolved higher up the call stack — a direct self-dependency.
    /// The spec leaves general cycle detection as an open question; this
    /// is the one case this implementation catches for free.
    #[error("cyclic factory dependency on \"{class_name}\" with tag \"{tag}\"")]
    CyclicDependency { class_name: &'static str, tag: Tag },

    /// The registry located a factory by (class name, tag) but its
    /// concrete type did not match `T` — two data types registered the
    /// same class name, which is a user bug (spec §9: class-name strings
    /// are trusted, not runtime-checked).
    #[error("factory \"{class_name}\" with tag \"{tag}\" is not of the requested type")]
    TypeMismatch { class_name: &'static str, tag: Tag },

    #[error("source error: {0}")]
    Source(#[from] SourceIoError),

    /// `GetFromSource<T>` (spec §6): the source reports the object is not
    /// available and, unlike the main `Get` dispatch, this lower-level
    /// variant never falls through to compute.
    #[error("factory \"{class_name}\" with tag \"{tag}\" is not available from the source")]
    NotAvailableFromSource { class_name: &'static str, tag: Tag },

    #[error("factory computation failed: {0}")]
    Compute(#[from] FactoryError),

    /// The worker observed its cancellation token before dispatch
    /// completed (spec §9: cancellation token in place of the original's
    /// non-local escape from an interrupt handler).
    #[error("worker cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("no calibration available for run {0}")]
    Unavailable(i64),
    #[error("{0}")]
    Other(String),
}

/// Top-level error surfaced from `OneEvent` (spec §4.6 step 4).
#[derive(Debug, Error)]
pub enum WorkerLoopError {
    #[error(transparent)]
    NextEvent(#[from] NextEventError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}
