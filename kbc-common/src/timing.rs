//! Fixed delays derived from the controller's internal scan cycle. The controller runs from a
//! 32KHz clock; counts below are in clock cycles unless noted.

use crate::{
    config::{ConfigError, KbcConfig},
    registers::{INIT_DLY_MASK, TO_CNT_MASK},
};

pub const MAX_DEBOUNCE_CNT: u32 = 0x3ff;
/// Cycles to scan one row, excluding debounce.
pub const ROW_SCAN_TIME: u32 = 16;
/// Cycles before the row scan begins.
pub const ROW_SCAN_DLY: u32 = 5;
/// Clock cycles per millisecond.
pub const CYCLE_MS: u32 = 32;
/// Microseconds per clock cycle used when converting register counts to time.
pub const CYCLE_US: u64 = 32;
pub const DEFAULT_SCAN_COUNT: u32 = 2;
pub const DEFAULT_INIT_DLY: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Debounce count as programmed into the control register.
    pub debounce_cnt: u32,
    /// Milliseconds between FIFO reads while a single key is held.
    pub repoll_ms: u32,
    /// Value for the scan timeout register.
    pub scan_timeout: u32,
    /// Cycles one full matrix scan takes.
    pub one_scan_time: u32,
}

impl Timing {
    /// The time between two FIFO reads is the repeat time plus the row scan time, plus the delay
    /// before row scanning starts.
    pub fn new(config: &KbcConfig, num_rows: usize) -> Self {
        let debounce_cnt = config.debounce_cnt.min(MAX_DEBOUNCE_CNT);
        // Counts are register sized; overflow wraps like the hardware counters do.
        let scan_time_rows = (ROW_SCAN_TIME + debounce_cnt).wrapping_mul(num_rows as u32);
        let repoll_ms = ROW_SCAN_DLY
            .wrapping_add(scan_time_rows)
            .wrapping_add(config.repeat_cnt)
            .div_ceil(CYCLE_MS);

        let scan_count = if config.scan_count == 0 {
            DEFAULT_SCAN_COUNT
        } else {
            config.scan_count
        };
        let one_scan_time = scan_time_rows.wrapping_add(config.repeat_cnt);
        let scan_timeout =
            DEFAULT_INIT_DLY.wrapping_add(one_scan_time.wrapping_mul(scan_count)) & TO_CNT_MASK;

        Self {
            debounce_cnt,
            repoll_ms,
            scan_timeout,
            one_scan_time,
        }
    }

    pub fn from_config(config: &KbcConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config, config.validate()?))
    }

    /// Microseconds from the threshold interrupt until FIFO data is stable, given the value read
    /// back from the init delay register.
    pub const fn interrupt_to_poll_us(init_dly: u32) -> u64 {
        (init_dly & INIT_DLY_MASK) as u64 * CYCLE_US
    }
}

#[cfg(test)]
#[path = "timing_test.rs"]
mod test;
