//! Output codes with a meaning to the scan engine. Values follow the Linux input event codes so
//! a keymap can be handed straight to an input subsystem.

pub const KEY_RESERVED: u16 = 0;
pub const KEY_POWER: u16 = 116;
pub const KEY_WAKEUP: u16 = 143;
/// Selects the alternate keymap layer while held.
pub const KEY_FN: u16 = 0x1d0;
pub const KEY_MAX: u16 = 0x2ff;

pub mod key_range {
    pub fn is_valid(code: u16) -> bool {
        code <= super::KEY_MAX
    }
}
