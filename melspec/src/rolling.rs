//! Shift-and-append spectrogram history.

use crate::error::{try_filled, MelSpecError};

/// A fixed `width × bins` matrix of time columns, oldest first.
///
/// New columns are always appended at the newest end. Appending `k` columns
/// moves the remaining `width - k` columns toward the front and evicts the
/// `k` oldest. Storage is contiguous so the whole history can be read in
/// time order without wrapping.
pub(crate) struct Rolling {
    data: Vec<f32>,
    width: usize,
    bins: usize,
}

impl Rolling {
    /// Allocates a zeroed history.
    pub(crate) fn new(width: usize, bins: usize) -> Result<Self, MelSpecError> {
        let len = width.checked_mul(bins).ok_or(MelSpecError::Allocation {
            what: "spectrogram",
            len: usize::MAX,
        })?;
        Ok(Self {
            data: try_filled("spectrogram", len, 0.0)?,
            width,
            bins,
        })
    }

    /// Evicts the `columns` oldest columns and returns the vacated space at
    /// the newest end, `min(columns, width) * bins` cells long.
    ///
    /// Vacated cells keep stale values until the caller overwrites them.
    pub(crate) fn shift(&mut self, columns: usize) -> &mut [f32] {
        let k = columns.min(self.width);
        let start = k * self.bins;
        self.data.copy_within(start.., 0);
        let keep = self.data.len() - start;
        &mut self.data[keep..]
    }

    /// All cells, oldest column first.
    pub(crate) fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Largest cell value.
    pub(crate) fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Zeroes every cell.
    pub(crate) fn clear(&mut self) {
        self.data.fill(0.0);
    }
}
