use chime_melspec::MelSpecError;
use thiserror::Error;

/// Errors returned by classifier operations.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model error: {0}")]
    Model(String),

    #[error("model input holds {got} values, spectrogram has {expected}")]
    InputSize { expected: usize, got: usize },

    #[error("prediction buffer holds {got} values, model has {expected} outputs")]
    OutputSize { expected: usize, got: usize },

    #[error("model has no outputs")]
    NoOutputs,

    #[error(transparent)]
    MelSpec(#[from] MelSpecError),
}
