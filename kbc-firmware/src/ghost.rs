//! Ghost key rejection.
//!
//! A matrix keyboard cannot tell three keys forming an "L" (two sharing a row, two sharing a
//! column) apart from four keys forming the full rectangle. Samples with that pattern are
//! dropped whole.

use kbc_common::matrix::ScanCode;

use crate::fifo::Sample;

/// True if some pair of keys shares a row and some pair shares a column. The two pairs need not
/// be the same.
pub fn is_ghosted(keys: &[ScanCode]) -> bool {
    if keys.len() < 3 {
        return false;
    }

    let mut same_row = false;
    let mut same_col = false;
    for (i, a) in keys.iter().enumerate() {
        let a = a.position();
        for b in keys[i + 1..].iter().map(|b| b.position()) {
            same_row |= a.same_row(&b);
            same_col |= a.same_column(&b);
        }
    }
    same_row && same_col
}

#[derive(Debug, Clone, Copy)]
pub struct GhostFilter {
    enabled: bool,
}

impl GhostFilter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Pass `sample` through unchanged, or `None` if it is ambiguous.
    pub fn filter(&self, sample: Sample) -> Option<Sample> {
        if self.enabled && is_ghosted(&sample.keys) {
            None
        } else {
            Some(sample)
        }
    }
}

#[cfg(test)]
#[path = "ghost_test.rs"]
mod test;
