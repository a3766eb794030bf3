//! Real-to-complex transform of one analysis frame.

use std::sync::Arc;

use realfft::num_complex::Complex32;
use realfft::{RealFftPlanner, RealToComplex};

use crate::error::{try_filled, MelSpecError};

/// Planned forward transform with preallocated buffers.
///
/// [`magnitudes`](Self::magnitudes) performs no heap allocation.
pub(crate) struct Spectrum {
    fft: Arc<dyn RealToComplex<f32>>,
    frame_length: usize,
    /// Windowed, zero-padded frame (fft_size samples).
    input: Vec<f32>,
    /// fft_size / 2 + 1 complex bins.
    output: Vec<Complex32>,
    scratch: Vec<Complex32>,
    magnitude: Vec<f32>,
}

impl Spectrum {
    /// Plans a transform of `fft_size` points for frames of `frame_length`
    /// samples.
    pub(crate) fn new(fft_size: usize, frame_length: usize) -> Result<Self, MelSpecError> {
        if fft_size < 2 || !fft_size.is_power_of_two() {
            return Err(MelSpecError::TransformInit {
                fft_size,
                reason: "size must be a power of two of at least 2".into(),
            });
        }
        if fft_size < frame_length {
            return Err(MelSpecError::TransformInit {
                fft_size,
                reason: format!("size is smaller than the frame length {frame_length}"),
            });
        }

        // Frame buffers first, so an unaddressable size fails here rather
        // than inside the planner.
        let bins = fft_size / 2 + 1;
        let input = try_filled("transform input", fft_size, 0.0)?;
        let output = try_filled("transform output", bins, Complex32::default())?;
        let magnitude = try_filled("magnitude", bins, 0.0)?;

        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = try_filled(
            "transform scratch",
            fft.get_scratch_len(),
            Complex32::default(),
        )?;

        Ok(Self {
            fft,
            frame_length,
            input,
            output,
            scratch,
            magnitude,
        })
    }

    /// Windows `frame`, transforms it and returns the magnitude of each
    /// non-redundant bin.
    ///
    /// `frame` and `window` must both hold `frame_length` samples.
    pub(crate) fn magnitudes(&mut self, frame: &[f32], window: &[f32]) -> &[f32] {
        debug_assert_eq!(frame.len(), self.frame_length);
        debug_assert_eq!(window.len(), self.frame_length);

        let (head, pad) = self.input.split_at_mut(self.frame_length);
        for ((x, &s), &w) in head.iter_mut().zip(frame).zip(window) {
            *x = s * w;
        }
        // The transform uses its input as scratch, so padding is rewritten
        // for every frame.
        pad.fill(0.0);

        // Only buffer lengths are checked, and those are fixed by the plan.
        let res = self
            .fft
            .process_with_scratch(&mut self.input, &mut self.output, &mut self.scratch);
        debug_assert!(res.is_ok(), "transform buffers sized by the plan");

        let last = self.output.len() - 1;
        for (m, c) in self.magnitude.iter_mut().zip(&self.output) {
            *m = c.norm();
        }
        // DC and Nyquist are purely real.
        self.magnitude[0] = self.output[0].re.abs();
        self.magnitude[last] = self.output[last].re.abs();

        &self.magnitude
    }
}
