//! Affine 8-bit quantization.
//!
//! A real value `v` maps to `clamp(round(v / scale) + zero_point, -128, 127)`
//! and back to `(q - zero_point) * scale`. Parameters come from the tensor
//! metadata of the model consuming the spectrogram.

use serde::{Deserialize, Serialize};

/// Scale and zero point of an int8 tensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantization {
    pub scale: f32,
    pub zero_point: i32,
}

impl Default for Quantization {
    fn default() -> Self {
        Self {
            scale: 1.0,
            zero_point: 0,
        }
    }
}

impl Quantization {
    pub fn new(scale: f32, zero_point: i32) -> Self {
        Self { scale, zero_point }
    }

    /// Quantizes `v`, saturating to the int8 range.
    #[inline]
    pub fn quantize(&self, v: f32) -> i8 {
        let q = (v / self.scale).round() as i32;
        q.saturating_add(self.zero_point)
            .clamp(i8::MIN as i32, i8::MAX as i32) as i8
    }

    #[inline]
    pub fn dequantize(&self, q: i8) -> f32 {
        (q as i32 - self.zero_point) as f32 * self.scale
    }
}
