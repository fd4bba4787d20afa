//! The scan mode controller.
//!
//! While no key is down the controller sits in [`ScanMode::IdleInterrupt`]: the FIFO threshold
//! interrupt is enabled and nothing polls. The first key entry raises the interrupt, which masks
//! the threshold interrupt and hands the FIFO to the poll task ([`Kbc::run`]). The poll task
//! reads a sample on every timer tick until it sees an empty FIFO, then releases whatever is
//! still down and re-enables the interrupt.

use core::cell::RefCell;

use embassy_futures::select::{select, Either};
use embassy_sync::{
    blocking_mutex::{raw::RawMutex, Mutex as BlockingMutex},
    mutex::Mutex,
    signal::Signal,
};
use embassy_time::{Duration, Timer};
use heapless::Vec;
use kbc_common::{
    config::{ConfigError, KbcConfig, PinConfig, PinRole},
    matrix::{MAX_GPIO, MAX_KPENT},
    registers::{
        col_cfg_field, control, int, pin_cfg_value, row_cfg_field, COL_CFG_FIELD_MASK, CONTROL,
        INIT_DLY, INT, KP_ENT0, KP_ENT1, ROW_CFG_FIELD_MASK, RPT_DLY, TO_CNT,
    },
    timing::{Timing, DEFAULT_INIT_DLY},
};

use crate::{
    debug,
    fifo::Sample,
    ghost::GhostFilter,
    info,
    key_reporter::{EventSink, KeyTracker},
    mmio::{Hardware, Mmio},
    wake,
};

/// Re-poll delay while more than one key is down.
const CHORD_REPOLL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanMode {
    IdleInterrupt,
    ContinuousPoll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum PowerState {
    Closed,
    Open,
    /// Suspended with the key-press interrupt armed as a wake source.
    SuspendedWake,
    /// Stopped by suspend; resume starts it again.
    SuspendedStopped,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum PollCommand {
    After(Duration),
    Stop,
}

/// State shared between the interrupt handler, the poll task and the power management calls.
pub(crate) struct Inner<H, S> {
    pub(crate) hw: H,
    pub(crate) sink: S,
    pub(crate) tracker: KeyTracker,
    pub(crate) mode: ScanMode,
    /// Time from the threshold interrupt until the FIFO holds a stable sample.
    pub(crate) cp_delay: Duration,
    pub(crate) keypress_caused_wake: bool,
    /// Scan timeout saved while suspended.
    pub(crate) cp_to_wkup_dly: u32,
}

pub struct Kbc<M: RawMutex, H: Hardware, S: EventSink> {
    pub(crate) config: KbcConfig,
    pub(crate) timing: Timing,
    pub(crate) inner: BlockingMutex<M, RefCell<Inner<H, S>>>,
    pub(crate) poll_signal: Signal<M, PollCommand>,
    pub(crate) power: Mutex<M, PowerState>,
}

impl<M: RawMutex, H: Hardware, S: EventSink> Kbc<M, H, S> {
    /// Validate `config` and derive the controller timing. No register is touched.
    pub fn new(config: KbcConfig, hw: H, sink: S) -> Result<Self, ConfigError> {
        let timing = Timing::from_config(&config)?;
        Ok(Self {
            config,
            timing,
            inner: BlockingMutex::new(RefCell::new(Inner {
                hw,
                sink,
                tracker: KeyTracker::default(),
                mode: ScanMode::IdleInterrupt,
                cp_delay: Duration::from_ticks(0),
                keypress_caused_wake: false,
                cp_to_wkup_dly: 0,
            })),
            poll_signal: Signal::new(),
            power: Mutex::new(PowerState::Closed),
        })
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn config(&self) -> &KbcConfig {
        &self.config
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.inner.lock(|inner| inner.borrow().mode)
    }

    /// Output codes currently reported as down.
    pub fn current_keys(&self) -> Vec<u16, MAX_KPENT> {
        self.inner
            .lock(|inner| Vec::from_slice(inner.borrow().tracker.current()).unwrap_or_default())
    }

    /// Start scanning. Does nothing if already open.
    pub async fn open(&self) {
        let mut power = self.power.lock().await;
        if *power == PowerState::Closed {
            self.start();
            *power = PowerState::Open;
        }
    }

    /// Stop scanning. Safe to call in any state.
    pub async fn close(&self) {
        let mut power = self.power.lock().await;
        if *power != PowerState::Closed {
            self.stop();
            *power = PowerState::Closed;
        }
    }

    /// Interrupt handler body. Only reads and acknowledges the status, so it never waits on
    /// anything but the device lock.
    pub fn on_interrupt(&self) {
        let arm = self.inner.lock(|inner| inner.borrow_mut().handle_interrupt());
        if let Some(delay) = arm {
            self.poll_signal.signal(PollCommand::After(delay));
        }
    }

    /// One poll cycle. Returns the delay until the next cycle, or `None` once the controller is
    /// back in interrupt mode.
    pub fn poll(&self) -> Option<Duration> {
        self.inner.lock(|inner| {
            let inner = &mut *inner.borrow_mut();
            if inner.mode != ScanMode::ContinuousPoll {
                return None;
            }

            let count = int::fifo_count(inner.hw.read(INT));
            if count > 0 {
                inner.report_keys(&self.config);
                Some(if count == 1 {
                    Duration::from_millis(self.timing.repoll_ms as u64)
                } else {
                    CHORD_REPOLL
                })
            } else {
                inner.tracker.release_all(&mut inner.sink);
                inner.hw.set_bits(CONTROL, control::FIFO_CNT_INT_EN);
                inner.mode = ScanMode::IdleInterrupt;
                None
            }
        })
    }

    /// The poll task. Waits for the interrupt handler to arm it, then polls until the FIFO
    /// drains. Only one poll cycle is ever in flight.
    pub async fn run(&self) -> ! {
        loop {
            let mut next = self.poll_signal.wait().await;
            while let PollCommand::After(delay) = next {
                next = match select(Timer::after(delay), self.poll_signal.wait()).await {
                    Either::First(()) => self.poll().map_or(PollCommand::Stop, PollCommand::After),
                    Either::Second(cmd) => cmd,
                };
            }
        }
    }

    pub(crate) fn cancel_poll(&self) {
        self.poll_signal.signal(PollCommand::Stop);
    }

    pub(crate) fn start(&self) {
        self.inner.lock(|inner| {
            let inner = &mut *inner.borrow_mut();
            let hw = &mut inner.hw;

            hw.set_clock(true);
            hw.reset();

            configure_pins(hw, &self.config.pins);
            wake::setup_wake_keys(hw, &self.config.wake.keys, false);

            hw.write(RPT_DLY, self.config.repeat_cnt);
            hw.write(
                CONTROL,
                control::debounce_cnt(self.timing.debounce_cnt)
                    | control::fifo_threshold(1)
                    | control::FIFO_CNT_INT_EN
                    | control::KBC_EN
                    | control::KEYPRESS_INT_EN,
            );
            hw.write(INIT_DLY, DEFAULT_INIT_DLY);
            hw.write(TO_CNT, self.timing.scan_timeout);

            inner.cp_delay = Duration::from_micros(Timing::interrupt_to_poll_us(hw.read(INIT_DLY)));

            // Clear out stale entries before enabling the interrupt.
            while int::fifo_count(hw.read(INT)) != 0 {
                hw.read(KP_ENT0);
                hw.read(KP_ENT1);
            }
            hw.write(INT, int::CLEAR_ALL);

            inner.tracker.clear();
            inner.mode = ScanMode::IdleInterrupt;
            inner.hw.set_irq(true);
        });
        info!("kbc started");
    }

    pub(crate) fn stop(&self) {
        self.inner.lock(|inner| {
            let inner = &mut *inner.borrow_mut();
            if !inner.tracker.current().is_empty() {
                inner.tracker.release_all(&mut inner.sink);
            }
            inner.hw.clear_bits(CONTROL, control::KBC_EN);
            inner.hw.set_irq(false);
            inner.hw.set_irq_wake(false);
            inner.mode = ScanMode::IdleInterrupt;
            inner.hw.set_clock(false);
        });
        self.cancel_poll();
        info!("kbc stopped");
    }
}

impl<H: Hardware, S: EventSink> Inner<H, S> {
    fn handle_interrupt(&mut self) -> Option<Duration> {
        let status = self.hw.read(INT);
        self.hw.write(INT, status);

        if status & int::FIFO_CNT_STATUS != 0 {
            // The poll task owns the FIFO until every key is released.
            self.hw.clear_bits(CONTROL, control::FIFO_CNT_INT_EN);
            self.mode = ScanMode::ContinuousPoll;
            Some(self.cp_delay)
        } else {
            if status & int::KEYPRESS_STATUS != 0 {
                // only reachable through the resume path
                self.keypress_caused_wake = true;
            }
            None
        }
    }

    fn report_keys(&mut self, config: &KbcConfig) {
        let sample = Sample::read(&mut self.hw, &config.keymap, config.fn_keymap);
        let Some(sample) = GhostFilter::new(config.ghost_filter).filter(sample) else {
            debug!("ghosted sample ignored");
            return;
        };
        let pressed = sample.translate(&config.keymap);
        self.tracker.report(&mut self.sink, &pressed);
    }
}

/// Program every pin's row and column assignment.
pub fn configure_pins(mmio: &mut impl Mmio, pins: &[PinConfig; MAX_GPIO]) {
    for (i, pin) in pins.iter().enumerate() {
        let (row_offset, row_shift) = row_cfg_field(i);
        let (col_offset, col_shift) = col_cfg_field(i);
        let mut row_cfg = mmio.read(row_offset) & !(ROW_CFG_FIELD_MASK << row_shift);
        let mut col_cfg = mmio.read(col_offset) & !(COL_CFG_FIELD_MASK << col_shift);

        match pin.role {
            PinRole::Row => row_cfg |= pin_cfg_value(pin.num) << row_shift,
            PinRole::Column => col_cfg |= pin_cfg_value(pin.num) << col_shift,
            PinRole::Ignore => {}
        }

        mmio.write(row_offset, row_cfg);
        mmio.write(col_offset, col_cfg);
    }
}

#[cfg(test)]
#[path = "key_scanner_test.rs"]
mod test;
