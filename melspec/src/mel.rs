//! Projection of transform magnitudes onto mel bins.

/// Smallest mel power fed to the logarithm.
pub const POWER_FLOOR: f32 = 1e-6;

/// Decibel value of [`POWER_FLOOR`], the level of a silent cell.
pub const FLOOR_DB: f32 = -60.0;

/// Projects `magnitude` through a row-major filterbank and writes the
/// log-power of each mel bin, `10 * log10(max(mel², POWER_FLOOR))`, to `out`.
///
/// `weights` holds one row of `magnitude.len()` weights per element of `out`.
pub fn project_db(weights: &[f32], magnitude: &[f32], out: &mut [f32]) {
    debug_assert_eq!(weights.len(), magnitude.len() * out.len());

    for (row, o) in weights.chunks_exact(magnitude.len()).zip(out.iter_mut()) {
        let mel: f32 = row.iter().zip(magnitude).map(|(w, m)| w * m).sum();
        let power = (mel * mel).max(POWER_FLOOR);
        *o = 10.0 * power.log10();
    }
}
