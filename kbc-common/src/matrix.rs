//! Key matrix geometry and scan code encoding.

/// Rows the controller can scan.
pub const MAX_ROW: usize = 16;
/// Columns the controller can scan.
pub const MAX_COL: usize = 8;
/// Bits the row is shifted by in a [`ScanCode`].
pub const ROW_SHIFT: u8 = 3;
/// Scan codes in one keymap layer.
pub const MAX_KEY: usize = MAX_ROW * MAX_COL;
/// Key entries the FIFO reports per sample.
pub const MAX_KPENT: usize = 8;
/// Pins that can be assigned a row or column role.
pub const MAX_GPIO: usize = 24;

const COL_MASK: u8 = (1 << ROW_SHIFT) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixPosition {
    row: u8,
    col: u8,
}

impl MatrixPosition {
    /// Returns `None` if `row` or `col` is outside the matrix.
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < MAX_ROW && (col as usize) < MAX_COL {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn column(&self) -> usize {
        self.col as usize
    }

    pub fn scan_code(&self) -> ScanCode {
        ScanCode((self.row << ROW_SHIFT) | self.col)
    }

    pub fn same_row(&self, other: &MatrixPosition) -> bool {
        self.row == other.row
    }

    pub fn same_column(&self, other: &MatrixPosition) -> bool {
        self.col == other.col
    }
}

/// A [`MatrixPosition`] encoded as `(row << ROW_SHIFT) | column`.
///
/// ```
/// use kbc_common::matrix::{MatrixPosition, ScanCode};
///
/// let sc = MatrixPosition::new(2, 5).unwrap().scan_code();
/// assert_eq!(sc.value(), 21);
/// assert_eq!(ScanCode::new(21).unwrap().position(), MatrixPosition::new(2, 5).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanCode(u8);

impl ScanCode {
    pub const fn new(code: u8) -> Option<Self> {
        if (code as usize) < MAX_KEY {
            Some(Self(code))
        } else {
            None
        }
    }

    /// Build from the raw row and column fields of a FIFO entry. The fields are masked to their
    /// hardware widths so the result is always inside the matrix.
    pub const fn from_fields(row: u8, col: u8) -> Self {
        Self(((row & 0x0f) << ROW_SHIFT) | (col & COL_MASK))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn position(self) -> MatrixPosition {
        MatrixPosition {
            row: self.0 >> ROW_SHIFT,
            col: self.0 & COL_MASK,
        }
    }
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod test;
