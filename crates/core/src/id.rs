// SPDX-License-Identifier: MIT

//! Identifiers used throughout the event loop: object identity, the
//! type/tag lookup key used by the [`crate::registry::FactoryRegistry`],
//! and the opaque identifiers for workers and processors.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// 64-bit identifier unique within one event, carried by every [`crate::object::Object`].
///
/// Never reused once assigned; lifetime ends at the next event boundary
/// when the owning factory resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic generator of [`ObjectId`] values, scoped to one [`crate::event::Event`].
///
/// A factory's compute callback pulls from its worker's generator so that
/// every object produced during one event gets a distinct id, regardless
/// of which factory produced it.
#[derive(Debug, Default)]
pub struct ObjectIdGen(u64);

impl ObjectIdGen {
    pub fn next(&mut self) -> ObjectId {
        let id = self.0;
        self.0 += 1;
        ObjectId(id)
    }

    /// Reset the counter at an event boundary.
    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

/// Stable, module-independent key identifying a data type, used in place of
/// Rust's `TypeId` so factory lookup does not depend on runtime type
/// identification (spec §9 — DSO/plugin boundaries can make `TypeId`
/// comparisons unreliable; a registered string is stable everywhere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey(pub &'static str);

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A factory tag: the discriminator that lets multiple factories of the
/// same data type coexist. Empty string is the default/untagged factory.
///
/// Comparison is byte-exact and case-sensitive, matching the original
/// `strcmp` semantics (spec §4.4).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(pub smol_str::SmolStr);

impl Tag {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(smol_str::SmolStr::new(s.as_ref()))
    }

    pub fn empty() -> Self {
        Self(smol_str::SmolStr::new(""))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self(smol_str::SmolStr::new(s))
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

/// Identifier for a single worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generate an opaque, process-unique worker id (`wrk-<nanoid>`).
    pub fn generate() -> Self {
        Self(format!("wrk-{}", nanoid::nanoid!(12)))
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Borrow<str> for WorkerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier for a registered [`crate::processor::Processor`], stable for
/// the lifetime of the program (assigned in registration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessorId(pub usize);

impl fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "processor#{}", self.0)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
