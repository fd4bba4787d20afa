//! Suspend and resume, and the per-row masks that pick which keys may wake the system.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Timer;
use kbc_common::{
    keycodes::KEY_RESERVED,
    matrix::{MatrixPosition, MAX_ROW},
    registers::{control, int, row_mask, CONTROL, INT, TO_CNT},
};

use crate::{
    debug, info,
    key_reporter::{EventSink, KeyEvent},
    key_scanner::{Kbc, PowerState, ScanMode},
    mmio::{Hardware, Mmio},
};

/// Time for the controller to settle once the scan timeout is cleared.
pub const WAKE_SETTLE_MS: u64 = 30;

/// Program the row masks. With `filter` set only `keys` can raise a key-press interrupt;
/// otherwise every key can. An empty `keys` list leaves every key able to wake.
pub fn setup_wake_keys(mmio: &mut impl Mmio, keys: &[MatrixPosition], filter: bool) {
    let fill = if filter && !keys.is_empty() {
        u32::MAX
    } else {
        0
    };
    for row in 0..MAX_ROW {
        mmio.write(row_mask(row), fill);
    }

    if fill != 0 {
        for pos in keys {
            mmio.clear_bits(row_mask(pos.row()), 1 << pos.column());
        }
    }
}

impl<M: RawMutex, H: Hardware, S: EventSink> Kbc<M, H, S> {
    /// Prepare for system suspend. With wake enabled the controller keeps scanning with only the
    /// wake keys able to interrupt; otherwise it is stopped.
    pub async fn suspend(&self) {
        let mut power = self.power.lock().await;
        if *power != PowerState::Open {
            return;
        }

        if !self.config.wake.enabled {
            self.stop();
            *power = PowerState::SuspendedStopped;
            return;
        }

        self.inner.lock(|inner| {
            let inner = &mut *inner.borrow_mut();
            let hw = &mut inner.hw;
            hw.set_irq(false);
            hw.clear_bits(CONTROL, control::FIFO_CNT_INT_EN);
            hw.write(INT, int::CLEAR_ALL);

            // No scan timeout so the controller keeps watching for the wake keys.
            inner.cp_to_wkup_dly = hw.read(TO_CNT);
            hw.write(TO_CNT, 0);

            setup_wake_keys(hw, &self.config.wake.keys, true);
            inner.mode = ScanMode::IdleInterrupt;
        });
        self.cancel_poll();

        Timer::after_millis(WAKE_SETTLE_MS).await;

        self.inner.lock(|inner| {
            let inner = &mut *inner.borrow_mut();
            inner.keypress_caused_wake = false;
            inner.hw.set_bits(CONTROL, control::KEYPRESS_INT_EN);
            inner.hw.set_irq(true);
            inner.hw.set_irq_wake(true);
        });
        *power = PowerState::SuspendedWake;
        info!("kbc suspended, wake armed");
    }

    /// Undo [`Kbc::suspend`]. Reports a tap of the wakeup key when a key press woke the system.
    pub async fn resume(&self) {
        let mut power = self.power.lock().await;
        match *power {
            PowerState::SuspendedStopped => self.start(),
            PowerState::SuspendedWake => self.inner.lock(|inner| {
                let inner = &mut *inner.borrow_mut();
                let hw = &mut inner.hw;
                hw.set_irq_wake(false);
                setup_wake_keys(hw, &self.config.wake.keys, false);
                hw.clear_bits(CONTROL, control::KEYPRESS_INT_EN);
                hw.write(TO_CNT, inner.cp_to_wkup_dly);
                hw.set_bits(CONTROL, control::FIFO_CNT_INT_EN);

                let wakeup_key = self.config.wake.wakeup_key;
                if inner.keypress_caused_wake && wakeup_key != KEY_RESERVED {
                    debug!("woken by key press, reporting {}", wakeup_key);
                    inner.sink.report(KeyEvent::Key(wakeup_key, true));
                    inner.sink.report(KeyEvent::Key(wakeup_key, false));
                    inner.sink.report(KeyEvent::Sync);
                }
                inner.keypress_caused_wake = false;
            }),
            PowerState::Open | PowerState::Closed => return,
        }
        *power = PowerState::Open;
        info!("kbc resumed");
    }

    /// Whether a key-press interrupt arrived since suspend armed the wake keys.
    pub fn keypress_caused_wake(&self) -> bool {
        self.inner.lock(|inner| inner.borrow().keypress_caused_wake)
    }
}

#[cfg(test)]
#[path = "wake_test.rs"]
mod test;
