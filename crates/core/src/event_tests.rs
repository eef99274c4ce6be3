// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn new_event_has_no_payload() {
    let ev = Event::new(RunNumber(5), EventNumber(1));
    assert!(ev.payload().is_none());
    assert!(ev.auto_free());
}

#[test]
fn with_payload_exposes_downcastable_any() {
    let ev = Event::with_payload(RunNumber(5), EventNumber(1), Box::new(42_u32));
    let payload = ev.payload().expect("payload set");
    assert_eq!(payload.downcast_ref::<u32>(), Some(&42));
}

#[test]
fn free_event_clears_payload_and_is_idempotent() {
    let mut ev = Event::with_payload(RunNumber(5), EventNumber(1), Box::new(42_u32));
    ev.free_event();
    assert!(ev.payload().is_none());
    ev.free_event();
    assert!(ev.payload().is_none());
}

#[test]
fn accessors_report_run_and_event_number() {
    let ev = Event::new(RunNumber(7), EventNumber(12));
    assert_eq!(ev.run_number(), RunNumber(7));
    assert_eq!(ev.event_number(), EventNumber(12));
}
