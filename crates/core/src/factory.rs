// SPDX-License-Identifier: MIT

//! A [`Factory`] is a stateful, per-event producer/cache of objects of one
//! (data type, tag) pair (spec §3, §4.1). `R` is the resolver context a
//! compute callback receives to recursively resolve its own dependencies —
//! concretely, the worker type in `nucleus-runtime`.

use crate::error::FactoryError;
use crate::id::{ObjectId, Tag, TypeKey};
use crate::object::{AnyObject, DataType, Object};
use crate::resolver::Resolve;
use std::any::Any;

/// Object-safe facet of [`Factory`], used by [`crate::registry::FactoryRegistry`]
/// to hold factories of heterogeneous `T` behind one lookup table. Every
/// method here is type-erased in `T`; typed access (`get`, `get_by_id`,
/// `copy_from`) lives on [`Factory`] itself, reached via
/// [`FactoryBase::as_any_mut`] once the caller already knows `T` (spec §9:
/// string-keyed lookup, typed accessors layered on top).
pub trait FactoryBase<R>: Send {
    fn class_name(&self) -> &'static str;
    fn tag(&self) -> &Tag;
    fn check_source_first(&self) -> bool;
    fn persistent(&self) -> bool;
    fn evnt_called(&self) -> bool;
    fn brun_called(&self) -> bool;
    fn set_brun_called(&mut self, value: bool);
    fn erun_called(&self) -> bool;
    fn set_erun_called(&mut self, value: bool);

    /// Drop produced objects and clear `evnt_called`. Run flags
    /// (`brun_called`/`erun_called`) are untouched. No-op on a persistent
    /// factory (spec §4.1 Reset).
    fn reset(&mut self);

    /// Count of produced objects; `0` if unrealized.
    fn nrows(&self) -> usize;

    fn find_by_id(&self, id: ObjectId) -> Option<&dyn AnyObject>;

    fn to_string_dump(&self) -> String;

    /// End-of-job hook. Failures are caught and logged by the caller, never
    /// re-raised (spec §4.1, §7).
    fn fini(&mut self) -> Result<(), FactoryError>;

    /// Ensure realized: if already `evnt_called`, a no-op; otherwise invoke
    /// the compute callback (spec §4.1 `Get`, compute branch only — the
    /// source-first branch is the resolver's concern).
    fn realize(&mut self, ctx: &mut R) -> Result<(), FactoryError>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

type ComputeFn<T, R> = Box<dyn FnMut(&mut R) -> Result<Vec<T>, FactoryError> + Send>;

/// Typed factory for data type `T`, tagged with a (possibly empty) string
/// discriminator.
pub struct Factory<T: DataType, R> {
    tag: Tag,
    check_source_first: bool,
    persistent: bool,
    evnt_called: bool,
    brun_called: bool,
    erun_called: bool,
    objects: Vec<Object<T>>,
    compute: Option<ComputeFn<T, R>>,
}

impl<T: DataType, R> Factory<T, R> {
    /// A bare factory with no compute callback, as created by the
    /// resolver's auto-create path (spec §4.4 step 1). `Get` on such a
    /// factory always realizes to zero objects.
    pub fn placeholder(tag: Tag) -> Self {
        Self {
            tag,
            check_source_first: false,
            persistent: false,
            evnt_called: false,
            brun_called: false,
            erun_called: false,
            objects: Vec::new(),
            compute: None,
        }
    }

    pub fn with_compute<F>(tag: Tag, check_source_first: bool, persistent: bool, compute: F) -> Self
    where
        F: FnMut(&mut R) -> Result<Vec<T>, FactoryError> + Send + 'static,
    {
        Self {
            tag,
            check_source_first,
            persistent,
            evnt_called: false,
            brun_called: false,
            erun_called: false,
            objects: Vec::new(),
            compute: Some(Box::new(compute)),
        }
    }

    /// Install a source-provided result as this event's realization (spec
    /// §4.1 `CopyTo`). Called only by the resolver's source-first branch.
    pub fn copy_to(&mut self, objects: Vec<Object<T>>) {
        self.objects = objects;
        self.evnt_called = true;
    }

    /// Append the current objects to the caller's output. Precondition:
    /// `evnt_called`. Idempotent (spec §4.1 `CopyFrom`).
    pub fn copy_from(&self) -> Vec<Object<T>> {
        self.objects.clone()
    }

    pub fn get_by_id(&self, id: ObjectId) -> Option<&Object<T>> {
        self.objects.iter().find(|o| o.id() == id)
    }
}

impl<T, R> FactoryBase<R> for Factory<T, R>
where
    T: DataType,
    R: Resolve + 'static,
{
    fn class_name(&self) -> &'static str {
        T::type_key().0
    }

    fn tag(&self) -> &Tag {
        &self.tag
    }

    fn check_source_first(&self) -> bool {
        self.check_source_first
    }

    fn persistent(&self) -> bool {
        self.persistent
    }

    fn evnt_called(&self) -> bool {
        self.evnt_called
    }

    fn brun_called(&self) -> bool {
        self.brun_called
    }

    fn set_brun_called(&mut self, value: bool) {
        self.brun_called = value;
    }

    fn erun_called(&self) -> bool {
        self.erun_called
    }

    fn set_erun_called(&mut self, value: bool) {
        self.erun_called = value;
    }

    fn reset(&mut self) {
        if self.persistent {
            return;
        }
        self.objects.clear();
        self.evnt_called = false;
    }

    fn nrows(&self) -> usize {
        self.objects.len()
    }

    fn find_by_id(&self, id: ObjectId) -> Option<&dyn AnyObject> {
        self.objects.iter().find(|o| o.id() == id).map(|o| o as &dyn AnyObject)
    }

    fn to_string_dump(&self) -> String {
        format!(
            "{:<24} tag:{:<12} evnt_called:{:<5} nrows:{}",
            self.class_name(),
            self.tag.as_str(),
            self.evnt_called,
            self.objects.len(),
        )
    }

    fn fini(&mut self) -> Result<(), FactoryError> {
        Ok(())
    }

    fn realize(&mut self, ctx: &mut R) -> Result<(), FactoryError> {
        if self.evnt_called {
            return Ok(());
        }
        let produced = match &mut self.compute {
            Some(f) => f(ctx)?,
            None => Vec::new(),
        };
        self.objects = produced.into_iter().map(|data| Object::new(ctx.next_object_id(), data)).collect();
        self.evnt_called = true;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
