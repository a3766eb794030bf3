//! Engine geometry.

use serde::{Deserialize, Serialize};

use crate::error::MelSpecError;

/// Fixed shape of a spectrogram engine.
///
/// Default values describe a 20-column, 10-bin spectrogram over 30ms frames
/// with a 10ms step at 16kHz:
/// - Width: 20
/// - NumMelBins: 10
/// - FrameLength: 480
/// - FrameStep: 160
/// - FftSize: 512
/// - TopDb: 80
/// - MaxChunk: 1024
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Number of time columns retained (W).
    pub width: usize,
    /// Number of mel bins per column (M).
    pub num_mel_bins: usize,
    /// Samples per analysis frame (L).
    pub frame_length: usize,
    /// Samples advanced between frames (S, at most L).
    pub frame_step: usize,
    /// Transform size (N), a power of two no smaller than L.
    pub fft_size: usize,
    /// Dynamic range kept below the loudest cell, in decibels (D).
    pub top_db: f32,
    /// Largest write handled in one pass. The working buffer holds
    /// `frame_length + max_chunk` samples; longer writes are split.
    pub max_chunk: usize,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            width: 20,
            num_mel_bins: 10,
            frame_length: 480,
            frame_step: 160,
            fft_size: 512,
            top_db: 80.0,
            max_chunk: 1024,
        }
    }
}

impl Geometry {
    /// Number of non-redundant transform bins, `fft_size / 2 + 1`.
    pub fn fft_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Samples shared by consecutive frames, `frame_length - frame_step`.
    pub fn overlap(&self) -> usize {
        self.frame_length.saturating_sub(self.frame_step)
    }

    /// Number of cells in the rolling buffer, `width * num_mel_bins`.
    ///
    /// Saturates on overflow; [`validate`](Self::validate) rejects such
    /// geometries.
    pub fn len(&self) -> usize {
        self.width.saturating_mul(self.num_mel_bins)
    }

    /// Returns true if the rolling buffer has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of weights the mel filterbank matrix must hold.
    pub fn filterbank_len(&self) -> usize {
        self.num_mel_bins.saturating_mul(self.fft_bins())
    }

    /// Capacity of the per-write working sample buffer.
    pub fn working_len(&self) -> usize {
        self.frame_length.saturating_add(self.max_chunk)
    }

    /// Number of columns a write of `total` buffered samples produces.
    ///
    /// Inputs shorter than one overlap produce nothing and are carried.
    pub fn columns_for(&self, total: usize) -> usize {
        match total.checked_sub(self.overlap()) {
            Some(n) if self.frame_step > 0 => n / self.frame_step,
            _ => 0,
        }
    }

    /// Checks the time and mel dimensions and that every buffer size is
    /// addressable. The transform size is checked when the transform is
    /// planned.
    pub fn validate(&self) -> Result<(), MelSpecError> {
        if self.width == 0 {
            return Err(MelSpecError::InvalidGeometry(
                "width must be positive".into(),
            ));
        }
        if self.num_mel_bins == 0 {
            return Err(MelSpecError::InvalidGeometry(
                "num_mel_bins must be positive".into(),
            ));
        }
        if self.frame_length == 0 {
            return Err(MelSpecError::InvalidGeometry(
                "frame_length must be positive".into(),
            ));
        }
        if self.frame_step == 0 || self.frame_step > self.frame_length {
            return Err(MelSpecError::InvalidGeometry(format!(
                "frame_step {} must be in 1..={}",
                self.frame_step, self.frame_length
            )));
        }
        if !(self.top_db.is_finite() && self.top_db >= 0.0) {
            return Err(MelSpecError::InvalidGeometry(format!(
                "top_db {} must be finite and non-negative",
                self.top_db
            )));
        }
        if self.max_chunk == 0 {
            return Err(MelSpecError::InvalidGeometry(
                "max_chunk must be positive".into(),
            ));
        }

        let sizes = [
            ("spectrogram", self.width.checked_mul(self.num_mel_bins)),
            ("filterbank", self.num_mel_bins.checked_mul(self.fft_bins())),
            (
                "working samples",
                self.frame_length.checked_add(self.max_chunk),
            ),
        ];
        for (what, len) in sizes {
            if len.is_none() {
                return Err(MelSpecError::Allocation {
                    what,
                    len: usize::MAX,
                });
            }
        }
        Ok(())
    }
}
