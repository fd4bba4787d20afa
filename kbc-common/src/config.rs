//! Normalized controller configuration. An external parser fills it in; the scan engine only
//! reads it and refuses to start unless [`KbcConfig::validate`] passes.

use heapless::Vec;

use crate::{
    keymap::Keymap,
    matrix::{MatrixPosition, MAX_COL, MAX_GPIO, MAX_KEY, MAX_ROW},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    InvalidRow { pin: u8, num: u8 },
    InvalidColumn { pin: u8, num: u8 },
    InvalidPinRole { pin: u8, role: u8 },
    InvalidPin(u8),
    PinAssignedTwice(u8),
    MissingRowsOrColumns,
    TooManyPins { rows: usize, cols: usize },
    InvalidKeymapEntry { row: u8, col: u8 },
    InvalidKeyCode(u16),
    InvalidWakeKey { row: u8, col: u8 },
    TooManyWakeKeys,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidRow { pin, num } => write!(f, "pin {pin}: row {num} out of range"),
            Self::InvalidColumn { pin, num } => write!(f, "pin {pin}: column {num} out of range"),
            Self::InvalidPinRole { pin, role } => write!(f, "pin {pin}: unknown role {role}"),
            Self::InvalidPin(pin) => write!(f, "no such pin {pin}"),
            Self::PinAssignedTwice(pin) => write!(f, "pin {pin} assigned twice"),
            Self::MissingRowsOrColumns => f.write_str("at least one row and one column required"),
            Self::TooManyPins { rows, cols } => {
                write!(f, "{rows} rows and {cols} columns exceed {MAX_GPIO} pins")
            }
            Self::InvalidKeymapEntry { row, col } => {
                write!(f, "keymap entry {row}:{col} outside the matrix")
            }
            Self::InvalidKeyCode(code) => write!(f, "invalid key code {code:#x}"),
            Self::InvalidWakeKey { row, col } => {
                write!(f, "wake key {row}:{col} outside the matrix")
            }
            Self::TooManyWakeKeys => f.write_str("too many wake keys"),
        }
    }
}

/// What a pin is wired to. The raw values match the platform data encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    #[default]
    Ignore,
    Column,
    Row,
}

impl TryFrom<u8> for PinRole {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PinRole::Ignore),
            1 => Ok(PinRole::Column),
            2 => Ok(PinRole::Row),
            n => Err(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub role: PinRole,
    /// Row or column number the pin drives.
    pub num: u8,
}

impl PinConfig {
    pub const IGNORE: PinConfig = PinConfig {
        role: PinRole::Ignore,
        num: 0,
    };

    pub const fn row(num: u8) -> Self {
        Self {
            role: PinRole::Row,
            num,
        }
    }

    pub const fn column(num: u8) -> Self {
        Self {
            role: PinRole::Column,
            num,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WakeConfig {
    /// The device may wake the system from suspend.
    pub enabled: bool,
    /// Positions allowed to raise the wake interrupt. Empty means every position may.
    pub keys: Vec<MatrixPosition, MAX_KEY>,
    /// Output code tapped on resume when a key press caused the wake. `KEY_RESERVED` disables it.
    pub wakeup_key: u16,
}

impl WakeConfig {
    pub fn add_key(&mut self, row: u8, col: u8) -> Result<(), ConfigError> {
        let pos = MatrixPosition::new(row, col).ok_or(ConfigError::InvalidWakeKey { row, col })?;
        self.keys
            .push(pos)
            .map_err(|_| ConfigError::TooManyWakeKeys)
    }
}

#[derive(Debug, Clone)]
pub struct KbcConfig {
    pub pins: [PinConfig; MAX_GPIO],
    /// Debounce time in controller clock cycles. Clamped to 0x3ff when programmed.
    pub debounce_cnt: u32,
    /// Delay between repeated scans in controller clock cycles.
    pub repeat_cnt: u32,
    /// Scans in continuous mode before the controller drops back to interrupt mode. Zero selects
    /// the default.
    pub scan_count: u32,
    pub ghost_filter: bool,
    /// Use the alternate keymap layer while the `KEY_FN` key is held.
    pub fn_keymap: bool,
    pub wake: WakeConfig,
    pub keymap: Keymap,
}

impl Default for KbcConfig {
    fn default() -> Self {
        Self {
            pins: [PinConfig::IGNORE; MAX_GPIO],
            debounce_cnt: 0,
            repeat_cnt: 0,
            scan_count: 0,
            ghost_filter: false,
            fn_keymap: false,
            wake: WakeConfig::default(),
            keymap: Keymap::new(),
        }
    }
}

impl KbcConfig {
    /// Assign roles from ordered pin lists: the n-th entry of `rows` becomes row n and the n-th
    /// entry of `cols` becomes column n. Every other pin is ignored.
    pub fn set_pins(&mut self, rows: &[u8], cols: &[u8]) -> Result<(), ConfigError> {
        if rows.is_empty() || cols.is_empty() {
            return Err(ConfigError::MissingRowsOrColumns);
        }
        if rows.len() + cols.len() > MAX_GPIO {
            return Err(ConfigError::TooManyPins {
                rows: rows.len(),
                cols: cols.len(),
            });
        }

        let mut pins = [PinConfig::IGNORE; MAX_GPIO];
        let roles = rows
            .iter()
            .enumerate()
            .map(|(i, p)| (*p, PinConfig::row(i as u8)))
            .chain(
                cols.iter()
                    .enumerate()
                    .map(|(i, p)| (*p, PinConfig::column(i as u8))),
            );
        for (pin, cfg) in roles {
            let slot = pins.get_mut(pin as usize).ok_or(ConfigError::InvalidPin(pin))?;
            if slot.role != PinRole::Ignore {
                return Err(ConfigError::PinAssignedTwice(pin));
            }
            *slot = cfg;
        }
        self.pins = pins;
        Ok(())
    }

    /// Assign a pin from its raw platform encoding.
    pub fn set_pin_raw(&mut self, pin: u8, role: u8, num: u8) -> Result<(), ConfigError> {
        let role = PinRole::try_from(role).map_err(|role| ConfigError::InvalidPinRole { pin, role })?;
        let slot = self
            .pins
            .get_mut(pin as usize)
            .ok_or(ConfigError::InvalidPin(pin))?;
        *slot = PinConfig { role, num };
        Ok(())
    }

    /// Check the pin assignment and return the number of row pins.
    pub fn validate(&self) -> Result<usize, ConfigError> {
        let mut rows = 0;
        let mut cols = 0;
        for (i, cfg) in self.pins.iter().enumerate() {
            let pin = i as u8;
            match cfg.role {
                PinRole::Row => {
                    if cfg.num as usize >= MAX_ROW {
                        return Err(ConfigError::InvalidRow { pin, num: cfg.num });
                    }
                    rows += 1;
                }
                PinRole::Column => {
                    if cfg.num as usize >= MAX_COL {
                        return Err(ConfigError::InvalidColumn { pin, num: cfg.num });
                    }
                    cols += 1;
                }
                PinRole::Ignore => {}
            }
        }

        if rows == 0 || cols == 0 {
            return Err(ConfigError::MissingRowsOrColumns);
        }

        Ok(rows)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod test;
