use thiserror::Error;

/// Errors returned by spectrogram engine operations.
#[derive(Debug, Error)]
pub enum MelSpecError {
    #[error("melspec: failed to allocate {what} ({len} elements)")]
    Allocation { what: &'static str, len: usize },

    #[error("melspec: cannot initialize transform of size {fft_size}: {reason}")]
    TransformInit { fft_size: usize, reason: String },

    #[error("melspec: invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("melspec: filterbank has {got} weights, expected {expected}")]
    FilterbankShape { expected: usize, got: usize },

    #[error("melspec: engine is closed")]
    Closed,
}

/// Allocates a vector of `len` copies of `value`, reporting allocation
/// failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(
    what: &'static str,
    len: usize,
    value: T,
) -> Result<Vec<T>, MelSpecError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| MelSpecError::Allocation { what, len })?;
    v.resize(len, value);
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MelSpecError::Allocation {
            what: "window",
            len: 480,
        };
        assert_eq!(
            err.to_string(),
            "melspec: failed to allocate window (480 elements)"
        );

        let err = MelSpecError::FilterbankShape {
            expected: 2570,
            got: 10,
        };
        assert!(err.to_string().contains("expected 2570"));

        assert_eq!(MelSpecError::Closed.to_string(), "melspec: engine is closed");
    }

    #[test]
    fn try_filled_allocates() {
        let v = try_filled("test", 4, 1.5f32).unwrap();
        assert_eq!(v, vec![1.5; 4]);
        assert_eq!(v.capacity(), 4);
    }

    #[test]
    fn try_filled_reports_overflow() {
        let err = try_filled("huge", usize::MAX, 0u64).unwrap_err();
        assert!(matches!(err, MelSpecError::Allocation { what: "huge", .. }));
    }
}
