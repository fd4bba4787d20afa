//! What a description programs into the controller.

use std::fmt;

use kbc_common::{
    config::{KbcConfig, PinRole},
    keymap::{KeymapIndex, Layer},
    matrix::{MatrixPosition, MAX_COL, MAX_GPIO, MAX_ROW},
    registers::{
        col_cfg_field, control, pin_cfg_value, row_cfg_field, COL_CFG0, CONTROL,
        INIT_DLY, ROW_CFG0, RPT_DLY, TO_CNT,
    },
    timing::{Timing, DEFAULT_INIT_DLY},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterValue {
    pub name: &'static str,
    pub offset: usize,
    pub value: u32,
}

const ROW_CFG_WORDS: usize = MAX_GPIO.div_ceil(6);
const COL_CFG_WORDS: usize = MAX_GPIO.div_ceil(8);
const ROW_CFG_NAMES: [&str; ROW_CFG_WORDS] = ["ROW_CFG0", "ROW_CFG1", "ROW_CFG2", "ROW_CFG3"];
const COL_CFG_NAMES: [&str; COL_CFG_WORDS] = ["COL_CFG0", "COL_CFG1", "COL_CFG2"];

/// Register values written when scanning starts, in programming order.
pub fn register_values(config: &KbcConfig, timing: &Timing) -> Vec<RegisterValue> {
    let mut row_cfg = [0u32; ROW_CFG_WORDS];
    let mut col_cfg = [0u32; COL_CFG_WORDS];
    for (i, pin) in config.pins.iter().enumerate() {
        match pin.role {
            PinRole::Row => {
                let (offset, shift) = row_cfg_field(i);
                row_cfg[(offset - ROW_CFG0) / 4] |= pin_cfg_value(pin.num) << shift;
            }
            PinRole::Column => {
                let (offset, shift) = col_cfg_field(i);
                col_cfg[(offset - COL_CFG0) / 4] |= pin_cfg_value(pin.num) << shift;
            }
            PinRole::Ignore => {}
        }
    }

    let mut values: Vec<RegisterValue> = row_cfg
        .iter()
        .zip(ROW_CFG_NAMES)
        .enumerate()
        .map(|(i, (value, name))| RegisterValue {
            name,
            offset: ROW_CFG0 + i * 4,
            value: *value,
        })
        .chain(
            col_cfg
                .iter()
                .zip(COL_CFG_NAMES)
                .enumerate()
                .map(|(i, (value, name))| RegisterValue {
                    name,
                    offset: COL_CFG0 + i * 4,
                    value: *value,
                }),
        )
        .collect();

    let reg = |name, offset, value| RegisterValue {
        name,
        offset,
        value,
    };
    values.extend([
        reg("RPT_DLY", RPT_DLY, config.repeat_cnt),
        reg(
            "CONTROL",
            CONTROL,
            control::debounce_cnt(timing.debounce_cnt)
                | control::fifo_threshold(1)
                | control::FIFO_CNT_INT_EN
                | control::KBC_EN
                | control::KEYPRESS_INT_EN,
        ),
        reg("INIT_DLY", INIT_DLY, DEFAULT_INIT_DLY),
        reg("TO_CNT", TO_CNT, timing.scan_timeout),
    ]);
    values
}

/// Row masks armed while suspended with wake enabled.
pub fn wake_masks(config: &KbcConfig) -> [u32; MAX_ROW] {
    let mut masks = [0; MAX_ROW];
    if !config.wake.keys.is_empty() {
        masks = [u32::MAX; MAX_ROW];
        for pos in &config.wake.keys {
            masks[pos.row()] &= !(1 << pos.column());
        }
    }
    masks
}

/// Overview of a validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub rows: usize,
    pub cols: usize,
    pub keys: usize,
    pub fn_keys: usize,
    pub wake_keys: usize,
    pub timing: Timing,
}

impl Summary {
    pub fn new(config: &KbcConfig, timing: Timing) -> Self {
        let count = |role: PinRole| config.pins.iter().filter(|p| p.role == role).count();
        let mapped = |layer: Layer| {
            (0..MAX_ROW as u8)
                .flat_map(|r| (0..MAX_COL as u8).filter_map(move |c| MatrixPosition::new(r, c)))
                .filter(|pos| config.keymap.get(KeymapIndex::new(pos.scan_code(), layer)) != 0)
                .count()
        };
        Self {
            rows: count(PinRole::Row),
            cols: count(PinRole::Column),
            keys: mapped(Layer::Primary),
            fn_keys: mapped(Layer::Alternate),
            wake_keys: config.wake.keys.len(),
            timing,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "matrix:      {} rows x {} columns", self.rows, self.cols)?;
        writeln!(f, "keys:        {}", self.keys)?;
        writeln!(f, "fn keys:     {}", self.fn_keys)?;
        writeln!(f, "wake keys:   {}", self.wake_keys)?;
        write!(f, "repoll:      {} ms", self.timing.repoll_ms)
    }
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod test;
