// SPDX-License-Identifier: MIT

use super::*;
use crate::clock::FakeClock;

#[test]
fn ping_records_current_epoch_ms() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_000);
    let hb = Heartbeat::new();
    hb.ping(&clock);
    assert_eq!(hb.last_beat_ms(), 1_000);
}

#[test]
fn age_ms_grows_as_clock_advances_without_a_ping() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_000);
    let hb = Heartbeat::new();
    hb.ping(&clock);
    clock.advance(std::time::Duration::from_millis(750));
    assert_eq!(hb.age_ms(&clock), 750);
}

#[test]
fn fresh_heartbeat_defaults_to_zero() {
    let hb = Heartbeat::default();
    assert_eq!(hb.last_beat_ms(), 0);
}
