//! Seams between the scan engine and the hardware it drives.

/// Register block of the keyboard controller. Offsets are in bytes. Reads take `&mut self`
/// because reading the FIFO entry registers consumes entries.
pub trait Mmio {
    fn read(&mut self, offset: usize) -> u32;
    fn write(&mut self, offset: usize, value: u32);

    fn modify(&mut self, offset: usize, f: impl FnOnce(u32) -> u32) {
        let value = self.read(offset);
        self.write(offset, f(value));
    }

    fn set_bits(&mut self, offset: usize, bits: u32) {
        self.modify(offset, |v| v | bits);
    }

    fn clear_bits(&mut self, offset: usize, bits: u32) {
        self.modify(offset, |v| v & !bits);
    }
}

/// Clock, reset line and interrupt line of the controller. Acquiring these is the platform's
/// business; the engine only switches them.
pub trait Platform {
    fn set_clock(&mut self, on: bool);
    /// Pulse the controller reset, clearing all previous status.
    fn reset(&mut self);
    fn set_irq(&mut self, enabled: bool);
    /// Allow the interrupt line to wake the system from suspend.
    fn set_irq_wake(&mut self, enabled: bool);
}

pub trait Hardware: Mmio + Platform {}
impl<T: Mmio + Platform> Hardware for T {}

/// Memory mapped register block.
pub struct MmioRegion {
    base: usize,
}

impl MmioRegion {
    /// # Safety
    ///
    /// `base` must be the mapped address of the controller's register block, valid for the
    /// lifetime of the returned value and not accessed through any other path.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }
}

impl Mmio for MmioRegion {
    fn read(&mut self, offset: usize) -> u32 {
        unsafe { core::ptr::read_volatile((self.base + offset) as *const u32) }
    }

    fn write(&mut self, offset: usize, value: u32) {
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }
}

#[cfg(test)]
#[path = "mmio_test.rs"]
mod test;
