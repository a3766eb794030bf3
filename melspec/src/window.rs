//! Analysis window.

use std::f64::consts::PI;

/// Fills `out` with a raised-cosine (Hann) taper over `out.len()` points:
/// `0.5 * (1 - cos(2πi / n))`.
pub(crate) fn fill_hann(out: &mut [f32]) {
    let n = out.len();
    if n <= 1 {
        out.fill(1.0);
        return;
    }
    for (i, w) in out.iter_mut().enumerate() {
        *w = (0.5 * (1.0 - (2.0 * PI * i as f64 / n as f64).cos())) as f32;
    }
}
