// SPDX-License-Identifier: MIT

//! The resolver: lazy, memoized dispatch from `(T, tag)` to a realized
//! [`crate::factory::Factory`] (spec §4.4 — "the heart"). Generic over a
//! host type `R` that owns the worker-local state (registry, event,
//! call stack, id generator) and the connection to the shared
//! [`crate::supervisor::Supervisor`] — concretely, `nucleus_runtime::Worker`.

use crate::callstack::Frame;
use crate::error::ResolveError;
use crate::event::{Event, EventNumber, RunNumber};
use crate::factory::Factory;
use crate::id::{ObjectId, Tag};
use crate::object::{DataType, Object};
use crate::supervisor::{FetchOutcome, Supervisor};
use std::collections::HashMap;
use std::panic::Location;

/// What a factory's compute callback, and recursive resolver calls from
/// within it, see. Implemented by any [`ResolverHost`] via the blanket
/// impl below — never implemented directly.
pub trait Resolve {
    #[track_caller]
    fn get<T: DataType>(&mut self, tag: &str) -> Result<Vec<Object<T>>, ResolveError>;

    /// Lower-level variant of [`Resolve::get`]: compute only, ignoring
    /// `CheckSourceFirst`, and with neither auto-creation nor the outer
    /// prescriptive diagnostic on a registry miss (spec §6
    /// `GetFromFactory<T>`).
    #[track_caller]
    fn get_from_factory<T: DataType>(&mut self, tag: &str) -> Result<Vec<Object<T>>, ResolveError>;

    /// Lower-level variant of [`Resolve::get`]: source only, never falls
    /// through to compute (spec §6 `GetFromSource<T>`).
    #[track_caller]
    fn get_from_source<T: DataType>(&mut self, tag: &str) -> Result<Vec<Object<T>>, ResolveError>;

    /// Typed `FindByID` (spec §6 `FindByID<T>(id)`): scans only factories
    /// registered under `T`'s class name, faster than the untyped,
    /// every-factory scan.
    fn find_by_id<T: DataType>(&self, id: ObjectId) -> Option<Object<T>>;

    /// `FindOwner` (spec §6): the (class name, tag) of the factory that
    /// produced the object with this id, if any realized factory has it.
    fn find_owner(&self, id: ObjectId) -> Option<(&'static str, Tag)>;

    fn next_object_id(&mut self) -> ObjectId;
    fn run_number(&self) -> RunNumber;
    fn event_number(&self) -> EventNumber;
}

/// Worker-local state the dispatch algorithm needs direct access to. A
/// type implementing this trait gets [`Resolve`] for free.
pub trait ResolverHost: Sized + 'static {
    fn registry(&self) -> &crate::registry::FactoryRegistry<Self>;
    fn registry_mut(&mut self) -> &mut crate::registry::FactoryRegistry<Self>;
    fn event(&self) -> &Event;
    fn default_tags(&self) -> &DefaultTags;
    fn call_stack_mut(&mut self) -> &mut crate::callstack::CallStack;
    fn supervisor(&self) -> &dyn Supervisor;
    fn next_object_id(&mut self) -> ObjectId;
}

impl<H: ResolverHost> Resolve for H {
    #[track_caller]
    fn get<T: DataType>(&mut self, tag: &str) -> Result<Vec<Object<T>>, ResolveError> {
        let caller = Location::caller();
        resolve::<T, H>(self, tag).map_err(|err| {
            // A missing factory is already the terminal diagnostic (spec §8
            // scenario 6: "returns nil without pushing a call-stack
            // frame"); only failures that happened *while* a factory was
            // being realized get a frame.
            if !matches!(err, ResolveError::FactoryNotFound { .. }) {
                self.call_stack_mut().push(Frame {
                    class_name: T::type_key().0,
                    tag: effective_tag::<T, H>(self, tag),
                    file: caller.file(),
                    line: caller.line(),
                });
            }
            err
        })
    }

    #[track_caller]
    fn get_from_factory<T: DataType>(&mut self, tag: &str) -> Result<Vec<Object<T>>, ResolveError> {
        let caller = Location::caller();
        resolve_from_factory::<T, H>(self, tag).map_err(|err| {
            if !matches!(err, ResolveError::FactoryNotFound { .. }) {
                self.call_stack_mut().push(Frame {
                    class_name: T::type_key().0,
                    tag: effective_tag::<T, H>(self, tag),
                    file: caller.file(),
                    line: caller.line(),
                });
            }
            err
        })
    }

    #[track_caller]
    fn get_from_source<T: DataType>(&mut self, tag: &str) -> Result<Vec<Object<T>>, ResolveError> {
        let caller = Location::caller();
        resolve_from_source::<T, H>(self, tag).map_err(|err| {
            if !matches!(err, ResolveError::FactoryNotFound { .. }) {
                self.call_stack_mut().push(Frame {
                    class_name: T::type_key().0,
                    tag: effective_tag::<T, H>(self, tag),
                    file: caller.file(),
                    line: caller.line(),
                });
            }
            err
        })
    }

    fn find_by_id<T: DataType>(&self, id: ObjectId) -> Option<Object<T>> {
        self.registry()
            .find_by_class(T::type_key())
            .find_map(|f| f.as_any().downcast_ref::<Factory<T, H>>()?.get_by_id(id).cloned())
    }

    fn find_owner(&self, id: ObjectId) -> Option<(&'static str, Tag)> {
        self.registry().find_owner_by_id(id).map(|f| (f.class_name(), f.tag().clone()))
    }

    fn next_object_id(&mut self) -> ObjectId {
        ResolverHost::next_object_id(self)
    }

    fn run_number(&self) -> RunNumber {
        self.event().run_number()
    }

    fn event_number(&self) -> EventNumber {
        self.event().event_number()
    }
}

/// A static leaked string is never produced at runtime by this map; it
/// only stores the class-name keys factories themselves expose, which are
/// always `&'static str` (spec §9).
#[derive(Debug, Default, Clone)]
pub struct DefaultTags(HashMap<&'static str, Tag>);

impl DefaultTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class_name: &'static str, tag: Tag) {
        self.0.insert(class_name, tag);
    }

    pub fn get(&self, class_name: &'static str) -> Option<&Tag> {
        self.0.get(class_name)
    }

    /// Build from `DEFTAG:<ClassName>` parameters, the prefix already
    /// stripped (spec §6).
    pub fn from_parameters(pairs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        let mut map = HashMap::new();
        for (class_name, tag) in pairs {
            map.insert(class_name, Tag::new(tag));
        }
        Self(map)
    }
}

/// If `tag` is empty, substitute the worker's default tag for `T`, if any
/// (spec §4.4 "Tag defaulting"). Callers passing a non-empty tag always
/// bypass defaulting.
fn effective_tag<T: DataType, H: ResolverHost>(host: &H, tag: &str) -> Tag {
    if !tag.is_empty() {
        return Tag::new(tag);
    }
    host.default_tags().get(T::type_key().0).cloned().unwrap_or_else(Tag::empty)
}

/// The dispatch algorithm itself (spec §4.4, steps 1-4). Reentrant: called
/// recursively when a factory's compute callback asks for its own
/// dependencies through the same `host`.
fn resolve<T, H>(host: &mut H, tag: &str) -> Result<Vec<Object<T>>, ResolveError>
where
    T: DataType,
    H: ResolverHost,
{
    let class_name = T::type_key().0;
    let tag = effective_tag::<T, H>(host, tag);

    let idx = match host.registry_mut().find_index(T::type_key(), &tag) {
        Some(idx) => idx,
        None if host.supervisor().parameter_manager().auto_factory_create() => {
            tracing::debug!(class = class_name, %tag, "auto-creating placeholder factory");
            host.registry_mut().add(Box::new(Factory::<T, H>::placeholder(tag.clone())))
        }
        None => {
            tracing::error!(
                class = class_name,
                %tag,
                "no factory found; set JANA:AUTOFACTORYCREATE to auto-create one"
            );
            host.supervisor().quit();
            return Err(ResolveError::FactoryNotFound { class_name, tag });
        }
    };

    // Option-slot take/put-back: lets a factory's compute callback
    // recursively call back into `resolve` (possibly for a different
    // factory, possibly re-entering this one) without a live borrow of
    // the registry slot this call already holds. A `None` here means some
    // enclosing frame on this same call stack is already resolving this
    // exact slot: a direct self-dependency.
    let mut boxed = host
        .registry_mut()
        .take(idx)
        .ok_or_else(|| ResolveError::CyclicDependency { class_name, tag: tag.clone() })?;

    let outcome = resolve_taken::<T, H>(host, &mut boxed, class_name, &tag);
    host.registry_mut().put_back(idx, boxed);
    outcome
}

fn resolve_taken<T, H>(
    host: &mut H,
    boxed: &mut Box<dyn crate::factory::FactoryBase<H>>,
    class_name: &'static str,
    tag: &Tag,
) -> Result<Vec<Object<T>>, ResolveError>
where
    T: DataType,
    H: ResolverHost,
{
    let factory = boxed
        .as_any_mut()
        .downcast_mut::<Factory<T, H>>()
        .ok_or(ResolveError::TypeMismatch { class_name, tag: tag.clone() })?;

    if factory.evnt_called() {
        return Ok(factory.copy_from());
    }

    if factory.check_source_first() {
        match host.supervisor().fetch_objects(host.event(), class_name, tag) {
            Ok(FetchOutcome::Objects(raw)) => {
                let mut objects = Vec::with_capacity(raw.len());
                for item in raw {
                    let data = *item
                        .downcast::<T>()
                        .map_err(|_| ResolveError::TypeMismatch { class_name, tag: tag.clone() })?;
                    objects.push(Object::new(host.next_object_id(), data));
                }
                factory.copy_to(objects);
                return Ok(factory.copy_from());
            }
            Ok(FetchOutcome::NotAvailable) => {}
            Err(e) => return Err(ResolveError::Source(e)),
        }
    }

    factory.realize(host).map_err(ResolveError::Compute)?;
    Ok(factory.copy_from())
}

/// Take a registry slot by (class, tag), downcast it to `Factory<T, H>`,
/// and hand the result to `body`, always putting the slot back regardless
/// of outcome. Shared by [`resolve_from_factory`] and
/// [`resolve_from_source`], the two lower-level variants of [`resolve`]
/// that skip auto-create and the missing-factory diagnostic (spec §6).
fn with_taken_factory<T, H, F>(host: &mut H, tag: &str, body: F) -> Result<Vec<Object<T>>, ResolveError>
where
    T: DataType,
    H: ResolverHost,
    F: FnOnce(&mut H, &mut Factory<T, H>) -> Result<Vec<Object<T>>, ResolveError>,
{
    let class_name = T::type_key().0;
    let tag = effective_tag::<T, H>(host, tag);

    let idx = host
        .registry_mut()
        .find_index(T::type_key(), &tag)
        .ok_or_else(|| ResolveError::FactoryNotFound { class_name, tag: tag.clone() })?;

    let mut boxed = host
        .registry_mut()
        .take(idx)
        .ok_or_else(|| ResolveError::CyclicDependency { class_name, tag: tag.clone() })?;

    let outcome = match boxed.as_any_mut().downcast_mut::<Factory<T, H>>() {
        Some(factory) => body(host, factory),
        None => Err(ResolveError::TypeMismatch { class_name, tag: tag.clone() }),
    };
    host.registry_mut().put_back(idx, boxed);
    outcome
}

/// `GetFromFactory<T>` (spec §6): compute only, ignoring
/// `CheckSourceFirst` entirely.
fn resolve_from_factory<T, H>(host: &mut H, tag: &str) -> Result<Vec<Object<T>>, ResolveError>
where
    T: DataType,
    H: ResolverHost,
{
    with_taken_factory::<T, H, _>(host, tag, |host, factory| {
        if !factory.evnt_called() {
            factory.realize(host).map_err(ResolveError::Compute)?;
        }
        Ok(factory.copy_from())
    })
}

/// `GetFromSource<T>` (spec §6): source only, never falls through to
/// compute. A source answer of *object-not-available* is a terminal
/// miss here, unlike in [`resolve`] where it triggers the compute branch.
fn resolve_from_source<T, H>(host: &mut H, tag: &str) -> Result<Vec<Object<T>>, ResolveError>
where
    T: DataType,
    H: ResolverHost,
{
    let class_name = T::type_key().0;
    with_taken_factory::<T, H, _>(host, tag, |host, factory| {
        if factory.evnt_called() {
            return Ok(factory.copy_from());
        }
        let tag = factory.tag().clone();
        match host.supervisor().fetch_objects(host.event(), class_name, &tag) {
            Ok(FetchOutcome::Objects(raw)) => {
                let mut objects = Vec::with_capacity(raw.len());
                for item in raw {
                    let data = *item
                        .downcast::<T>()
                        .map_err(|_| ResolveError::TypeMismatch { class_name, tag: tag.clone() })?;
                    objects.push(Object::new(host.next_object_id(), data));
                }
                factory.copy_to(objects);
                Ok(factory.copy_from())
            }
            Ok(FetchOutcome::NotAvailable) => Err(ResolveError::NotAvailableFromSource { class_name, tag }),
            Err(e) => Err(ResolveError::Source(e)),
        }
    })
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
