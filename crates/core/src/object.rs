// SPDX-License-Identifier: MIT

//! The [`Object`] type: an immutable, identity-bearing datum produced by a
//! factory for the current event (spec §3).

use crate::id::{ObjectId, TypeKey};
use std::any::Any;
use std::sync::Arc;

/// Marker trait for data types that can be produced by a factory.
///
/// `type_key` returns a stable class-name string, used by the
/// [`crate::registry::FactoryRegistry`] for lookup instead of Rust's
/// `TypeId` (spec §9). Implement via the [`crate::data_type!`] macro.
pub trait DataType: Send + Sync + 'static {
    fn type_key() -> TypeKey
    where
        Self: Sized;
}

/// An immutable per-event datum, owned by the factory that produced it.
///
/// Cloning an `Object` clones the [`Arc`], not the underlying data: repeat
/// resolutions within the same event return objects that compare equal by
/// identity (`Arc::ptr_eq`), matching the "single realization per event"
/// invariant (spec §8).
#[derive(Debug)]
pub struct Object<T> {
    pub id: ObjectId,
    data: Arc<T>,
}

impl<T> Object<T> {
    pub fn new(id: ObjectId, data: T) -> Self {
        Self { id, data: Arc::new(data) }
    }

    pub fn from_arc(id: ObjectId, data: Arc<T>) -> Self {
        Self { id, data }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// True if both handles point at the same underlying allocation.
    pub fn is_same_instance(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.data, &other.data)
    }
}

impl<T> Clone for Object<T> {
    fn clone(&self) -> Self {
        Self { id: self.id, data: Arc::clone(&self.data) }
    }
}

impl<T> std::ops::Deref for Object<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

/// Type-erased view of an [`Object`], used by the untyped `FindByID` path
/// (spec §4.6 `FindByID(id)` — untyped).
pub trait AnyObject: Send + Sync {
    fn object_id(&self) -> ObjectId;
    fn as_any(&self) -> &dyn Any;
}

impl<T: DataType> AnyObject for Object<T> {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "object_tests.rs"]
mod tests;
