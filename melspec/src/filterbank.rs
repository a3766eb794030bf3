//! Mel-scale utilities and filterbank generation.
//!
//! The engine only borrows a weight matrix; this module builds one for
//! owners that do not ship a precomputed table.

/// Converts frequency in Hz to mel scale (HTK formula).
pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Converts mel scale frequency back to Hz.
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Creates a triangular mel filterbank matrix.
///
/// Returns `num_mels * (fft_size / 2 + 1)` weights in row-major order, one
/// row per mel bin. Each triangle is evaluated on the mel scale at the
/// center frequency of every transform bin. The DC bin always has weight 0.
pub fn mel_weight_matrix(
    num_mels: usize,
    fft_size: usize,
    sample_rate: usize,
    low_freq: f64,
    high_freq: f64,
) -> Vec<f32> {
    let half_fft = fft_size / 2 + 1;
    let mut weights = vec![0.0f32; num_mels * half_fft];
    if num_mels == 0 || fft_size == 0 {
        return weights;
    }

    let low_mel = hz_to_mel(low_freq);
    let high_mel = hz_to_mel(high_freq);

    // num_mels + 2 equally spaced edges
    let step = (high_mel - low_mel) / (num_mels + 1) as f64;
    let edges: Vec<f64> = (0..num_mels + 2)
        .map(|i| low_mel + i as f64 * step)
        .collect();

    let bin_hz = sample_rate as f64 / fft_size as f64;

    for (m, row) in weights.chunks_exact_mut(half_fft).enumerate() {
        let (left, center, right) = (edges[m], edges[m + 1], edges[m + 2]);
        for (k, w) in row.iter_mut().enumerate().skip(1) {
            let mel = hz_to_mel(k as f64 * bin_hz);
            let rising = (mel - left) / (center - left);
            let falling = (right - mel) / (right - center);
            *w = rising.min(falling).max(0.0) as f32;
        }
    }
    weights
}
