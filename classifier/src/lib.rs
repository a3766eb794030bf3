//! Sound event detection on top of a quantized mel spectrogram.
//!
//! # Architecture
//!
//! Audio is processed in three stages:
//!
//! 1. [`chime_melspec::MelSpectrogram`]: PCM16 chunks -> rolling int8 spectrogram
//! 2. [`Model::predict`]: spectrogram tensor -> class scores
//! 3. [`Detector::feed`]: sliding window of scores -> [`Trigger`]
//!
//! [`Classifier`] wires the three together. The inference engine itself is
//! external; implement [`Model`] to plug one in.

mod classifier;
mod detector;
mod error;
mod model;

pub use classifier::Classifier;
pub use detector::{Detector, DetectorConfig, Trigger};
pub use error::ClassifierError;
pub use model::Model;
