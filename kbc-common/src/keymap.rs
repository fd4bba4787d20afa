use crate::{
    config::ConfigError,
    keycodes::{key_range, KEY_RESERVED},
    matrix::{MatrixPosition, ScanCode, MAX_KEY},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layer {
    Primary,
    /// Used for the whole sample while the alternate-layer key is held.
    Alternate,
}

impl Layer {
    const fn offset(self) -> usize {
        match self {
            Layer::Primary => 0,
            Layer::Alternate => MAX_KEY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeymapIndex {
    pub scan: ScanCode,
    pub layer: Layer,
}

impl KeymapIndex {
    pub fn new(scan: ScanCode, layer: Layer) -> Self {
        Self { scan, layer }
    }

    /// Flat index into a two layer table. Alternate layer codes sit `MAX_KEY` above their primary
    /// counterparts; this is also the value reported as the raw scan code.
    pub fn value(&self) -> u16 {
        (self.scan.value() as usize + self.layer.offset()) as u16
    }
}

/// Lookup table from scan code to output code for up to two layers.
#[derive(Clone)]
pub struct Keymap {
    codes: [u16; MAX_KEY * 2],
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Keymap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Keymap")
            .field("mapped", &self.codes.iter().filter(|c| **c != KEY_RESERVED).count())
            .finish()
    }
}

impl Keymap {
    pub const fn new() -> Self {
        Self {
            codes: [KEY_RESERVED; MAX_KEY * 2],
        }
    }

    pub fn get(&self, index: KeymapIndex) -> u16 {
        self.codes[index.value() as usize]
    }

    pub fn set(&mut self, index: KeymapIndex, code: u16) -> Result<(), ConfigError> {
        if !key_range::is_valid(code) {
            return Err(ConfigError::InvalidKeyCode(code));
        }
        self.codes[index.value() as usize] = code;
        Ok(())
    }

    pub fn insert(
        &mut self,
        layer: Layer,
        row: u8,
        col: u8,
        code: u16,
    ) -> Result<(), ConfigError> {
        let pos = MatrixPosition::new(row, col).ok_or(ConfigError::InvalidKeymapEntry { row, col })?;
        self.set(KeymapIndex::new(pos.scan_code(), layer), code)
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = (Layer, u8, u8, u16)>,
    ) -> Result<Self, ConfigError> {
        let mut keymap = Self::new();
        for (layer, row, col, code) in entries {
            keymap.insert(layer, row, col, code)?;
        }
        Ok(keymap)
    }

    /// True if any alternate layer entry is mapped.
    pub fn has_alternate(&self) -> bool {
        self.codes[MAX_KEY..].iter().any(|c| *c != KEY_RESERVED)
    }
}

#[cfg(test)]
#[path = "keymap_test.rs"]
mod test;
