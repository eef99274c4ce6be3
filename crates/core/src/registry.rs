// SPDX-License-Identifier: MIT

//! [`FactoryRegistry`]: a worker-local, insertion-ordered collection of
//! factories, keyed by (class name, tag) (spec §3, §4.2).

use crate::factory::FactoryBase;
use crate::id::{ObjectId, Tag, TypeKey};
use crate::object::AnyObject;

/// Slots are `Option`-wrapped so the resolver can take a factory out for
/// the duration of a (possibly recursive) realize call and put it back
/// afterwards, without holding a live borrow of the registry across that
/// call (spec §4.4 reentrancy; see `resolver::resolve`).
pub struct FactoryRegistry<R> {
    slots: Vec<Option<Box<dyn FactoryBase<R>>>>,
}

impl<R> Default for FactoryRegistry<R> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<R> FactoryRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a factory. No uniqueness enforcement: a duplicate (class
    /// name, tag) is tolerated, and the earlier registration wins on
    /// lookup (spec §4.2, §9 open question — this implementation's
    /// policy decision is documented in the design ledger). Returns the
    /// slot index.
    pub fn add(&mut self, factory: Box<dyn FactoryBase<R>>) -> usize {
        if self.find_index(TypeKey(factory.class_name()), factory.tag()).is_some() {
            tracing::warn!(
                class = factory.class_name(),
                tag = %factory.tag(),
                "duplicate factory registration; first registration remains authoritative"
            );
        }
        self.slots.push(Some(factory));
        self.slots.len() - 1
    }

    /// Remove the factory at a previously-resolved slot index, if any.
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn FactoryBase<R>>> {
        self.slots.get_mut(index).and_then(|slot| slot.take())
    }

    /// Ordered scan by (class name, tag); first match wins (spec §4.2,
    /// §4.4 "Numeric/ordering semantics").
    pub fn find_index(&self, class: TypeKey, tag: &Tag) -> Option<usize> {
        self.slots.iter().position(|slot| match slot {
            Some(f) => f.class_name() == class.0 && f.tag() == tag,
            None => false,
        })
    }

    pub fn find(&self, class: TypeKey, tag: &Tag) -> Option<&dyn FactoryBase<R>> {
        self.find_index(class, tag).and_then(|idx| self.slots[idx].as_deref())
    }

    /// Every registered factory sharing `class`, across all tags — the
    /// scan `FindByID<T>` (spec §6) uses to check only same-typed
    /// factories rather than downcasting every factory in the registry.
    pub fn find_by_class(&self, class: TypeKey) -> impl Iterator<Item = &dyn FactoryBase<R>> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_deref())
            .filter(move |f| f.class_name() == class.0)
    }

    /// Take the factory out of its slot, leaving `None` behind. A second
    /// `take` on the same index before a matching `put_back` returns
    /// `None` — the signal the resolver reads as a cyclic dependency.
    pub fn take(&mut self, index: usize) -> Option<Box<dyn FactoryBase<R>>> {
        self.slots.get_mut(index).and_then(|slot| slot.take())
    }

    pub fn put_back(&mut self, index: usize, factory: Box<dyn FactoryBase<R>>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(factory);
        }
    }

    /// `"Class"` or `"Class:tag"` for each registered factory, in
    /// insertion order (spec §4.2 `Names`).
    pub fn names(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref())
            .map(|f| {
                if f.tag().is_empty() {
                    f.class_name().to_string()
                } else {
                    format!("{}:{}", f.class_name(), f.tag())
                }
            })
            .collect()
    }

    /// Reset every factory — the new-event barrier invoked at the start
    /// of each `OneEvent` (spec §4.2, §5).
    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.reset();
        }
    }

    /// Tabular diagnostic dump; `sparsify` skips factories with zero
    /// produced objects (spec §4.2 `Print`, original `PrintFactories`).
    pub fn print(&self, sparsify: bool) -> String {
        let mut out = String::new();
        for slot in self.slots.iter().flatten() {
            if sparsify && slot.nrows() == 0 {
                continue;
            }
            out.push_str(&slot.to_string_dump());
            out.push('\n');
        }
        out
    }

    /// Single-factory diagnostic dump (spec's supplemented `Print(data_name, tag)`).
    pub fn print_one(&self, class: TypeKey, tag: &Tag) -> Option<String> {
        self.find(class, tag).map(|f| f.to_string_dump())
    }

    /// Scan every factory for the owner of an object by id (spec §4.2
    /// `FindOwner`).
    pub fn find_owner_by_id(&self, id: ObjectId) -> Option<&dyn FactoryBase<R>> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref())
            .find(|f| f.find_by_id(id).is_some())
            .map(|f| f.as_ref())
    }

    /// Type-erased object lookup across every factory (spec §4.6
    /// `FindByID(id)` untyped form).
    pub fn find_object_by_id(&self, id: ObjectId) -> Option<&dyn AnyObject> {
        self.slots.iter().filter_map(|slot| slot.as_ref()).find_map(|f| f.find_by_id(id))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
