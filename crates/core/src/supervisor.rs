// SPDX-License-Identifier: MIT

//! External-interface traits (spec §6): the collaborators the core consults
//! but does not implement. Concrete parameter parsing, plugin loading,
//! calibration database clients, and file I/O codecs are out of scope
//! (spec §1) — only the contracts are modeled here.

use crate::error::{CalibrationError, NextEventError, SourceIoError};
use crate::event::{Event, RunNumber};
use crate::id::Tag;
use std::any::Any;

/// Result of a source's attempt to materialize objects of one (class name,
/// tag). Type-erased: the resolver downcasts each boxed value against the
/// concrete `T` it asked for, keeping this trait object-safe so a
/// [`Supervisor`] can be shared across workers as `Arc<dyn Supervisor>`.
#[derive(Debug)]
pub enum FetchOutcome {
    Objects(Vec<Box<dyn Any + Send>>),
    NotAvailable,
}

/// The process-level owner of workers, event sources, processors, and
/// global services (spec §6). One instance is shared, read-mostly, by
/// every worker.
pub trait Supervisor: Send + Sync {
    /// Pull the next record from the source. Must serialize internally:
    /// called concurrently by every worker (spec §5).
    fn next_event(&self) -> Result<Event, NextEventError>;

    /// Request global shutdown. Idempotent.
    fn quit(&self);

    fn is_quitting(&self) -> bool;

    /// Ask the source to materialize objects of `class_name`/`tag` for
    /// `event` (spec §4.3 `Event.GetObjects`). `NotAvailable` is an
    /// expected outcome, not an error.
    fn fetch_objects(
        &self,
        event: &Event,
        class_name: &'static str,
        tag: &Tag,
    ) -> Result<FetchOutcome, SourceIoError>;

    fn parameter_manager(&self) -> &dyn ParameterManager;

    fn calibration(&self, run_number: RunNumber) -> Result<Box<dyn Calibration>, CalibrationError>;
}

/// Process-wide configuration service (spec §6, §9 "Global parameter
/// singleton" — modeled as an explicit handle, not process-global state).
pub trait ParameterManager: Send + Sync {
    fn get_parameter(&self, name: &str) -> Option<String>;

    /// All parameters whose name starts with `prefix`, with the prefix
    /// stripped from the returned key (spec §6 `DEFTAG:<ClassName>`).
    fn get_parameters_with_prefix(&self, prefix: &str) -> Vec<(String, String)>;

    /// `JANA:AUTOFACTORYCREATE`: presence (any non-empty value) enables
    /// silent placeholder-factory creation on resolver miss.
    fn auto_factory_create(&self) -> bool {
        self.get_parameter("JANA:AUTOFACTORYCREATE").is_some()
    }
}

/// Calibration constants for one run, keyed by a namepath string (spec §6
/// `Calibration::Get`). Object-safe: exposes raw JSON, with [`get_calib`]
/// layering typed access on top, since a generic `Get<T>` method would not
/// be object-safe.
pub trait Calibration: Send + Sync {
    fn get_raw(&self, namepath: &str) -> Result<serde_json::Value, CalibrationError>;
}

/// Typed convenience wrapper over [`Calibration::get_raw`] (spec's
/// supplemented `GetCalib<T>`, original `JEventLoop::GetCalib`).
pub fn get_calib<T: serde::de::DeserializeOwned>(
    calib: &dyn Calibration,
    namepath: &str,
) -> Result<T, CalibrationError> {
    let raw = calib.get_raw(namepath)?;
    serde_json::from_value(raw).map_err(|e| CalibrationError::Other(e.to_string()))
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
