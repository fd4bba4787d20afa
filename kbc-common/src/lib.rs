#![no_std]
pub mod config;
pub mod keycodes;
pub mod keymap;
pub mod matrix;
pub mod registers;
pub mod timing;

pub use config::{ConfigError, KbcConfig, PinConfig, PinRole, WakeConfig};
pub use keymap::{Keymap, KeymapIndex, Layer};
pub use matrix::{MatrixPosition, ScanCode};
pub use timing::Timing;
