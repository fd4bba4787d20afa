//! Decoding of the key entry FIFO.
//!
//! Each FIFO word carries four one byte entries, lane 0 in the low byte:
//! bit 7 is the valid flag, bits 6-3 the row and bits 2-0 the column.

use heapless::Vec;
use kbc_common::{
    keycodes::KEY_FN,
    keymap::{Keymap, KeymapIndex, Layer},
    matrix::{MatrixPosition, ScanCode, MAX_KPENT},
    registers::KP_ENT0,
};

use crate::{key_reporter::PressedKey, mmio::Mmio};

pub const ENTRIES_PER_WORD: usize = 4;
pub const FIFO_WORDS: usize = MAX_KPENT / ENTRIES_PER_WORD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEntry(u8);

impl KeyEntry {
    pub const VALID: u8 = 0x80;

    pub fn new(raw: u8) -> Self {
        Self(raw)
    }

    pub fn is_valid(&self) -> bool {
        self.0 & Self::VALID != 0
    }

    pub fn row(&self) -> u8 {
        (self.0 >> 3) & 0x0f
    }

    pub fn column(&self) -> u8 {
        self.0 & 0x07
    }

    pub fn scan_code(&self) -> ScanCode {
        ScanCode::from_fields(self.row(), self.column())
    }
}

/// Split a FIFO word into its entries, lane 0 first.
pub fn word_entries(word: u32) -> [KeyEntry; ENTRIES_PER_WORD] {
    core::array::from_fn(|lane| KeyEntry((word >> (lane * 8)) as u8))
}

/// One FIFO read: the asserted scan codes in FIFO order and the keymap layer they select.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub keys: Vec<ScanCode, MAX_KPENT>,
    pub layer: Layer,
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            layer: Layer::Primary,
        }
    }
}

impl Sample {
    /// Decode FIFO words. When `fn_keymap` is set an entry mapped to `KEY_FN` is consumed and
    /// switches the whole sample to the alternate layer.
    pub fn decode(words: &[u32; FIFO_WORDS], keymap: &Keymap, fn_keymap: bool) -> Self {
        let mut sample = Sample::default();
        for entry in words.iter().flat_map(|w| word_entries(*w)) {
            if !entry.is_valid() {
                continue;
            }
            let scan = entry.scan_code();
            if fn_keymap && keymap.get(KeymapIndex::new(scan, Layer::Primary)) == KEY_FN {
                sample.layer = Layer::Alternate;
            } else {
                // At most MAX_KPENT entries fit in FIFO_WORDS words.
                let _ = sample.keys.push(scan);
            }
        }
        sample
    }

    pub fn read(mmio: &mut impl Mmio, keymap: &Keymap, fn_keymap: bool) -> Self {
        let words = core::array::from_fn(|i| mmio.read(KP_ENT0 + i * 4));
        Self::decode(&words, keymap, fn_keymap)
    }

    pub fn positions(&self) -> impl Iterator<Item = MatrixPosition> + '_ {
        self.keys.iter().map(|sc| sc.position())
    }

    /// Look every key up in the sample's layer.
    pub fn translate(&self, keymap: &Keymap) -> Vec<PressedKey, MAX_KPENT> {
        self.keys
            .iter()
            .map(|scan| {
                let index = KeymapIndex::new(*scan, self.layer);
                PressedKey {
                    scan: index.value(),
                    code: keymap.get(index),
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "fifo_test.rs"]
mod test;
