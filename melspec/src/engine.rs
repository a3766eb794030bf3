//! Streaming quantized mel-power spectrogram.

use tracing::{debug, trace, warn};

use crate::config::Geometry;
use crate::error::{try_filled, MelSpecError};
use crate::mel::project_db;
use crate::quant::Quantization;
use crate::rolling::Rolling;
use crate::transform::Spectrum;
use crate::window::fill_hann;

/// Full positive range of a 16-bit sample.
const SAMPLE_RANGE: f32 = 32768.0;

/// Converts a stream of PCM16 chunks into a rolling, int8-quantized
/// mel-power spectrogram.
///
/// The engine borrows its mel filterbank (`num_mel_bins` rows of
/// `fft_size / 2 + 1` weights) for `'w` and never frees it. All owned
/// buffers are allocated by [`open`](Self::open) and released by
/// [`close`](Self::close) or drop; [`write`](Self::write) and
/// [`read`](Self::read) never allocate.
///
/// # Pipeline
///
/// 1. PCM16 -> `sample / 32768 * input_scale`, prefixed by carried samples
/// 2. Every complete frame: Hann window -> FFT magnitude -> mel projection
/// 3. `10 * log10(max(mel², 1e-6))` appended as the newest column
/// 4. Read-out clips to `max - top_db` and quantizes to int8
///
/// # Thread Safety
///
/// Not synchronized. Writes and reads mutate and observe the same history,
/// so callers must serialize them.
pub struct MelSpectrogram<'w> {
    geometry: Geometry,
    weights: &'w [f32],
    input_scale: f32,
    output: Quantization,
    state: Option<State>,
}

struct State {
    window: Vec<f32>,
    /// Unconsumed samples from the previous write (frame_length capacity).
    carry: Vec<f32>,
    carry_len: usize,
    /// Carry plus one chunk of converted input.
    work: Vec<f32>,
    spectrum: Spectrum,
    columns: Rolling,
}

impl<'w> MelSpectrogram<'w> {
    /// Creates a closed engine. Nothing is allocated until [`open`](Self::open).
    pub fn new(geometry: Geometry, weights: &'w [f32]) -> Self {
        Self {
            geometry,
            weights,
            input_scale: 1.0,
            output: Quantization::default(),
            state: None,
        }
    }

    /// Creates and opens an engine in one step.
    pub fn open_with(geometry: Geometry, weights: &'w [f32]) -> Result<Self, MelSpecError> {
        let mut engine = Self::new(geometry, weights);
        engine.open()?;
        Ok(engine)
    }

    /// Allocates and zeroes all buffers, computes the window and plans the
    /// transform.
    ///
    /// Opening an open engine starts over with fresh buffers. On error the
    /// engine stays closed.
    pub fn open(&mut self) -> Result<(), MelSpecError> {
        self.state = None;

        let g = &self.geometry;
        g.validate()?;
        if self.weights.len() != g.filterbank_len() {
            return Err(MelSpecError::FilterbankShape {
                expected: g.filterbank_len(),
                got: self.weights.len(),
            });
        }

        let spectrum = Spectrum::new(g.fft_size, g.frame_length)?;
        let mut window = try_filled("window", g.frame_length, 0.0)?;
        fill_hann(&mut window);

        self.state = Some(State {
            window,
            carry: try_filled("carry", g.frame_length, 0.0)?,
            carry_len: 0,
            work: try_filled("working samples", g.working_len(), 0.0)?,
            spectrum,
            columns: Rolling::new(g.width, g.num_mel_bins)?,
        });

        debug!(
            width = g.width,
            mel_bins = g.num_mel_bins,
            frame_length = g.frame_length,
            frame_step = g.frame_step,
            fft_size = g.fft_size,
            working_len = g.working_len(),
            "melspec: opened"
        );
        Ok(())
    }

    /// Releases all owned buffers. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.state.take().is_some() {
            debug!("melspec: closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of cells in the output tensor, `width * num_mel_bins`.
    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// Number of samples carried into the next write (0 when closed).
    pub fn carry_len(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.carry_len)
    }

    pub fn input_scale(&self) -> f32 {
        self.input_scale
    }

    /// Sets the factor applied to normalized samples before analysis.
    pub fn set_input_scale(&mut self, scale: f32) {
        self.input_scale = scale;
    }

    pub fn output_quantization(&self) -> Quantization {
        self.output
    }

    pub fn set_output_scale(&mut self, scale: f32) {
        self.output.scale = scale;
    }

    pub fn set_output_zero_point(&mut self, zero_point: i32) {
        self.output.zero_point = zero_point;
    }

    /// Sets both output parameters, typically from the model input tensor.
    pub fn set_output_quantization(&mut self, q: Quantization) {
        self.output = q;
    }

    /// The unquantized decibel history, oldest column first.
    pub fn columns(&self) -> Option<&[f32]> {
        self.state.as_ref().map(|s| s.columns.as_slice())
    }

    /// Appends PCM16 samples and returns the number of columns produced.
    ///
    /// Any count is accepted. Samples that do not complete a frame are
    /// carried into the next call. Writes longer than `max_chunk` are
    /// processed chunk by chunk with the same result.
    pub fn write(&mut self, samples: &[i16]) -> Result<usize, MelSpecError> {
        let state = self.state.as_mut().ok_or(MelSpecError::Closed)?;
        let g = &self.geometry;

        if samples.len() > g.max_chunk {
            warn!(
                samples = samples.len(),
                max_chunk = g.max_chunk,
                "melspec: write exceeds working capacity, splitting"
            );
        }

        let mut produced = 0;
        for chunk in samples.chunks(g.max_chunk) {
            produced += state.write_chunk(g, self.weights, self.input_scale, chunk);
        }

        trace!(
            samples = samples.len(),
            columns = produced,
            carry = state.carry_len,
            "melspec: write"
        );
        Ok(produced)
    }

    /// Quantizes the history into `out` and returns the number of cells
    /// written, `min(out.len(), width * num_mel_bins)`.
    ///
    /// Cells are emitted oldest column first. Every value is first raised
    /// to at least `max - top_db`, where `max` is the largest cell of the
    /// whole history, then mapped through the output quantization.
    pub fn read(&self, out: &mut [i8]) -> Result<usize, MelSpecError> {
        let state = self.state.as_ref().ok_or(MelSpecError::Closed)?;
        let data = state.columns.as_slice();

        let floor = state.columns.max() - self.geometry.top_db;
        let n = out.len().min(data.len());
        for (o, &v) in out[..n].iter_mut().zip(data) {
            *o = self.output.quantize(v.max(floor));
        }
        Ok(n)
    }

    /// Zeroes the history and drops carried samples without releasing memory.
    pub fn reset(&mut self) -> Result<(), MelSpecError> {
        let state = self.state.as_mut().ok_or(MelSpecError::Closed)?;
        state.columns.clear();
        state.carry_len = 0;
        debug!("melspec: reset");
        Ok(())
    }
}

impl State {
    /// Processes at most `max_chunk` samples.
    fn write_chunk(
        &mut self,
        g: &Geometry,
        weights: &[f32],
        input_scale: f32,
        chunk: &[i16],
    ) -> usize {
        let carried = self.carry_len;
        let total = carried + chunk.len();
        let work = &mut self.work[..total];

        work[..carried].copy_from_slice(&self.carry[..carried]);
        for (dst, &s) in work[carried..].iter_mut().zip(chunk) {
            *dst = s as f32 / SAMPLE_RANGE * input_scale;
        }

        let produced = g.columns_for(total);
        // Frames that would be evicted within this same write are skipped.
        let skipped = produced.saturating_sub(g.width);

        let tail = self.columns.shift(produced);
        for (i, column) in tail.chunks_exact_mut(g.num_mel_bins).enumerate() {
            let start = (skipped + i) * g.frame_step;
            let frame = &work[start..start + g.frame_length];
            let magnitude = self.spectrum.magnitudes(frame, &self.window);
            project_db(weights, magnitude, column);
        }

        let consumed = produced * g.frame_step;
        self.carry_len = total - consumed;
        self.carry[..self.carry_len].copy_from_slice(&work[consumed..]);

        produced
    }
}
