//! Simulated keyboard controller for host tests.
//!
//! The FIFO is a queue of samples. Reading [`KP_ENT1`] consumes the front sample, which is how
//! both the start up drain and the poll loop walk through it. The interrupt status register is
//! write-one-to-clear and reports the front sample's entry count in its occupancy field.

extern crate alloc;

use alloc::{collections::VecDeque, rc::Rc, vec::Vec};
use core::cell::RefCell;

use kbc_common::registers::{int, INT, KP_ENT0, KP_ENT1, REGISTER_SPAN};

use crate::{
    fifo::{KeyEntry, FIFO_WORDS},
    mmio::{Mmio, Platform},
};

pub fn entry(row: u8, col: u8) -> u8 {
    KeyEntry::VALID | (row << 3) | col
}

/// Pack entries into FIFO words, lane 0 first.
pub fn pack(entries: &[u8]) -> [u32; FIFO_WORDS] {
    let mut words = [0; FIFO_WORDS];
    for (i, e) in entries.iter().enumerate() {
        words[i / 4] |= (*e as u32) << ((i % 4) * 8);
    }
    words
}

pub fn pack_keys(keys: &[(u8, u8)]) -> [u32; FIFO_WORDS] {
    let entries: Vec<u8> = keys.iter().map(|(r, c)| entry(*r, *c)).collect();
    pack(&entries)
}

#[derive(Debug, Default)]
struct KbcInner {
    regs: Vec<u32>,
    int_status: u32,
    fifo: VecDeque<[u32; FIFO_WORDS]>,
    clock: bool,
    irq: bool,
    irq_wake: bool,
    resets: usize,
    fifo_reads: usize,
}

#[derive(Clone, Debug)]
pub struct KbcStub {
    inner: Rc<RefCell<KbcInner>>,
}

impl Default for KbcStub {
    fn default() -> Self {
        Self::new()
    }
}

impl KbcStub {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(KbcInner {
                regs: alloc::vec![0; REGISTER_SPAN / 4],
                ..Default::default()
            })),
        }
    }

    /// Queue a sample of held keys.
    pub fn push_keys(&self, keys: &[(u8, u8)]) {
        self.push_words(pack_keys(keys));
    }

    pub fn push_words(&self, words: [u32; FIFO_WORDS]) {
        self.inner.borrow_mut().fifo.push_back(words);
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().fifo.len()
    }

    /// Latch interrupt status bits, as the hardware does before asserting the line.
    pub fn raise(&self, status: u32) {
        self.inner.borrow_mut().int_status |= status;
    }

    pub fn status(&self) -> u32 {
        self.inner.borrow().int_status
    }

    pub fn reg(&self, offset: usize) -> u32 {
        self.inner.borrow().regs[offset / 4]
    }

    pub fn set_reg(&self, offset: usize, value: u32) {
        self.inner.borrow_mut().regs[offset / 4] = value;
    }

    pub fn clock(&self) -> bool {
        self.inner.borrow().clock
    }

    pub fn irq(&self) -> bool {
        self.inner.borrow().irq
    }

    pub fn irq_wake(&self) -> bool {
        self.inner.borrow().irq_wake
    }

    pub fn resets(&self) -> usize {
        self.inner.borrow().resets
    }

    /// Number of samples consumed from the FIFO.
    pub fn fifo_reads(&self) -> usize {
        self.inner.borrow().fifo_reads
    }
}

fn occupancy(words: Option<&[u32; FIFO_WORDS]>) -> u32 {
    words.map_or(0, |w| {
        w.iter()
            .flat_map(|w| w.to_le_bytes())
            .filter(|b| KeyEntry::new(*b).is_valid())
            .count() as u32
    })
}

impl Mmio for KbcStub {
    fn read(&mut self, offset: usize) -> u32 {
        let mut inner = self.inner.borrow_mut();
        match offset {
            INT => inner.int_status | (occupancy(inner.fifo.front()) << 4),
            KP_ENT0 => inner.fifo.front().map_or(0, |w| w[0]),
            KP_ENT1 => {
                let word = inner.fifo.front().map_or(0, |w| w[1]);
                if inner.fifo.pop_front().is_some() {
                    inner.fifo_reads += 1;
                }
                word
            }
            _ => inner.regs[offset / 4],
        }
    }

    fn write(&mut self, offset: usize, value: u32) {
        let mut inner = self.inner.borrow_mut();
        match offset {
            INT => inner.int_status &= !(value & int::CLEAR_ALL),
            KP_ENT0 | KP_ENT1 => {}
            _ => inner.regs[offset / 4] = value,
        }
    }
}

impl Platform for KbcStub {
    fn set_clock(&mut self, on: bool) {
        self.inner.borrow_mut().clock = on;
    }

    fn reset(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.resets += 1;
        inner.int_status = 0;
        inner.regs.iter_mut().for_each(|r| *r = 0);
    }

    fn set_irq(&mut self, enabled: bool) {
        self.inner.borrow_mut().irq = enabled;
    }

    fn set_irq_wake(&mut self, enabled: bool) {
        self.inner.borrow_mut().irq_wake = enabled;
    }
}
