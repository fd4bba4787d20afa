//! Register map of the keyboard controller. Offsets are in bytes from the start of the MMIO
//! region; every register is 32 bits wide.

use crate::matrix::MAX_ROW;

pub const CONTROL: usize = 0x00;
pub const INT: usize = 0x04;
pub const ROW_CFG0: usize = 0x08;
pub const COL_CFG0: usize = 0x18;
pub const TO_CNT: usize = 0x24;
pub const INIT_DLY: usize = 0x28;
pub const RPT_DLY: usize = 0x2c;
pub const KP_ENT0: usize = 0x30;
pub const KP_ENT1: usize = 0x34;
pub const ROW0_MASK: usize = 0x38;

/// One past the last register.
pub const REGISTER_SPAN: usize = ROW0_MASK + MAX_ROW * 4;

/// Scan timeout count lives in bits 19:0 of [`TO_CNT`].
pub const TO_CNT_MASK: u32 = 0xf_ffff;
pub const INIT_DLY_MASK: u32 = 0xf_ffff;

pub mod control {
    pub const KBC_EN: u32 = 1 << 0;
    pub const KEYPRESS_INT_EN: u32 = 1 << 1;
    pub const FIFO_CNT_INT_EN: u32 = 1 << 3;

    pub const DEBOUNCE_CNT_SHIFT: u32 = 4;
    pub const DEBOUNCE_CNT_MASK: u32 = 0x3ff;
    pub const FIFO_TH_CNT_SHIFT: u32 = 14;

    pub const fn debounce_cnt(cnt: u32) -> u32 {
        (cnt & DEBOUNCE_CNT_MASK) << DEBOUNCE_CNT_SHIFT
    }

    pub const fn fifo_threshold(cnt: u32) -> u32 {
        cnt << FIFO_TH_CNT_SHIFT
    }
}

pub mod int {
    pub const KEYPRESS_STATUS: u32 = 1 << 0;
    pub const FIFO_CNT_STATUS: u32 = 1 << 2;
    /// Writing this clears every status bit.
    pub const CLEAR_ALL: u32 = 0x7;

    /// Key entries waiting in the FIFO.
    pub const fn fifo_count(int: u32) -> u32 {
        (int >> 4) & 0xf
    }
}

/// Register and field location of a pin's row assignment. Each row config word holds six 5-bit
/// fields.
pub const fn row_cfg_field(pin: usize) -> (usize, u32) {
    (ROW_CFG0 + (pin / 6) * 4, 5 * (pin % 6) as u32)
}

pub const ROW_CFG_FIELD_MASK: u32 = 0x1f;

/// Register and field location of a pin's column assignment. Each column config word holds eight
/// 4-bit fields.
pub const fn col_cfg_field(pin: usize) -> (usize, u32) {
    (COL_CFG0 + (pin / 8) * 4, 4 * (pin % 8) as u32)
}

pub const COL_CFG_FIELD_MASK: u32 = 0x0f;

/// Field value enabling a pin as row or column `num`.
pub const fn pin_cfg_value(num: u8) -> u32 {
    ((num as u32) << 1) | 1
}

/// Wake mask register for `row`. Bit `n` set blocks column `n` from raising a key-press interrupt.
pub const fn row_mask(row: usize) -> usize {
    ROW0_MASK + row * 4
}

#[cfg(test)]
#[path = "registers_test.rs"]
mod test;
