#![no_std]
pub mod fifo;
pub mod ghost;
pub mod key_reporter;
pub mod key_scanner;
pub mod mmio;
pub mod wake;

#[cfg(any(test, feature = "test-utils"))]
pub mod kbc_test_stub;
#[cfg(any(test, feature = "test-utils"))]
pub mod time_driver_test_stub;

#[macro_use]
mod macros;

pub use kbc_common::{self as common, KbcConfig};
pub use key_reporter::{EventSink, KeyEvent, KeyEventChannel};
pub use key_scanner::{Kbc, ScanMode};
pub use mmio::{Hardware, Mmio, MmioRegion, Platform};
