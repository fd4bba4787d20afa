//! Manual clock for host tests.
//!
//! While the clock reads zero it follows system time. Once set, it only moves when a timer is
//! scheduled: the clock jumps straight to the deadline and the waiting task is woken, so timed
//! loops run to completion without sleeping.

extern crate std;

use core::{cell::Cell, task::Waker};
use embassy_time_driver::Driver;
use std::time::SystemTime;

struct ManualClock;

impl Driver for ManualClock {
    fn now(&self) -> u64 {
        match CLOCK.get() {
            0 => SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map_or(0, |d| d.as_micros() as u64),
            now => now,
        }
    }

    fn schedule_wake(&self, at: u64, waker: &Waker) {
        let now = CLOCK.get();
        if now != 0 && at > now {
            CLOCK.set(at);
        }

        waker.wake_by_ref();
    }
}

std::thread_local! {
    static CLOCK: Cell<u64> = const { Cell::new(0) };
}

embassy_time_driver::time_driver_impl!(static TIME_DRIVER: ManualClock = ManualClock);

/// Switch to manual time starting at `t` ticks.
pub fn set_time(t: u64) {
    CLOCK.set(t);
}

pub fn now() -> u64 {
    ManualClock.now()
}

/// Back to following system time.
pub fn reset() {
    CLOCK.set(0);
}
