// SPDX-License-Identifier: MIT

use super::*;
use crate::error::ResolveError;
use crate::event::{EventNumber, RunNumber};

#[derive(Debug, Clone, PartialEq)]
struct Hit {
    channel: u32,
}
crate::data_type!(Hit, "Hit");

/// A minimal resolver context for exercising `Factory` in isolation,
/// without pulling in the full worker machinery.
struct FakeCtx {
    next_id: u64,
}

impl Resolve for FakeCtx {
    fn get<T: DataType>(&mut self, _tag: &str) -> Result<Vec<Object<T>>, ResolveError> {
        unimplemented!("factory unit tests never recurse through the resolver")
    }

    fn next_object_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        ObjectId(id)
    }

    fn run_number(&self) -> RunNumber {
        RunNumber(1)
    }

    fn event_number(&self) -> EventNumber {
        EventNumber(1)
    }
}

#[test]
fn placeholder_realizes_to_empty() {
    let mut factory: Factory<Hit, FakeCtx> = Factory::placeholder(Tag::empty());
    let mut ctx = FakeCtx { next_id: 0 };
    factory.realize(&mut ctx).expect("realize ok");
    assert!(factory.evnt_called());
    assert_eq!(factory.nrows(), 0);
}

#[test]
fn realize_invokes_compute_exactly_once() {
    let calls = std::cell::Cell::new(0);
    let mut factory = Factory::with_compute(Tag::empty(), false, false, move |_ctx: &mut FakeCtx| {
        calls.set(calls.get() + 1);
        Ok(vec![Hit { channel: 1 }, Hit { channel: 2 }])
    });
    let mut ctx = FakeCtx { next_id: 0 };
    factory.realize(&mut ctx).expect("first realize ok");
    factory.realize(&mut ctx).expect("second realize is a no-op");
    assert_eq!(factory.nrows(), 2);
}

#[test]
fn copy_from_returns_same_instances_across_calls() {
    let mut factory = Factory::with_compute(Tag::empty(), false, false, |_ctx: &mut FakeCtx| {
        Ok(vec![Hit { channel: 7 }])
    });
    let mut ctx = FakeCtx { next_id: 0 };
    factory.realize(&mut ctx).expect("realize ok");
    let first = factory.copy_from();
    let second = factory.copy_from();
    assert_eq!(first.len(), 1);
    assert!(first[0].is_same_instance(&second[0]));
}

#[test]
fn reset_clears_objects_and_evnt_called() {
    let mut factory = Factory::with_compute(Tag::empty(), false, false, |_ctx: &mut FakeCtx| {
        Ok(vec![Hit { channel: 1 }])
    });
    let mut ctx = FakeCtx { next_id: 0 };
    factory.realize(&mut ctx).expect("realize ok");
    factory.set_brun_called(true);
    factory.reset();
    assert!(!factory.evnt_called());
    assert_eq!(factory.nrows(), 0);
    assert!(factory.brun_called(), "run flags survive Reset");
}

#[test]
fn persistent_factory_ignores_reset() {
    let mut factory = Factory::with_compute(Tag::empty(), false, true, |_ctx: &mut FakeCtx| {
        Ok(vec![Hit { channel: 3 }])
    });
    let mut ctx = FakeCtx { next_id: 0 };
    factory.realize(&mut ctx).expect("realize ok");
    factory.reset();
    assert!(factory.evnt_called(), "persistent factories retain realization across Reset");
    assert_eq!(factory.nrows(), 1);
}

#[test]
fn get_by_id_finds_produced_object() {
    let mut factory = Factory::with_compute(Tag::empty(), false, false, |_ctx: &mut FakeCtx| {
        Ok(vec![Hit { channel: 1 }, Hit { channel: 2 }])
    });
    let mut ctx = FakeCtx { next_id: 0 };
    factory.realize(&mut ctx).expect("realize ok");
    let second_id = factory.copy_from()[1].id();
    let found = factory.get_by_id(second_id).expect("object present");
    assert_eq!(found.data().channel, 2);
    assert!(factory.get_by_id(ObjectId(999)).is_none());
}
