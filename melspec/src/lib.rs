//! Streaming, fixed-memory mel-power spectrogram for int8 classifiers.
//!
//! [`MelSpectrogram`] turns PCM16 chunks of any length into a rolling
//! `[width, num_mel_bins]` decibel spectrogram and reads it out as an int8
//! tensor in the affine domain of the consuming model.
//!
//! # Example
//!
//! ```rust
//! use chime_melspec::{mel_weight_matrix, Geometry, MelSpectrogram, Quantization};
//!
//! let geometry = Geometry::default();
//! let weights = mel_weight_matrix(geometry.num_mel_bins, geometry.fft_size, 16000, 20.0, 7600.0);
//!
//! let mut engine = MelSpectrogram::open_with(geometry, &weights)?;
//! engine.set_output_quantization(Quantization::new(0.5, 0));
//!
//! // 10ms of audio at a time
//! for _ in 0..30 {
//!     engine.write(&[0i16; 160])?;
//! }
//!
//! let mut tensor = vec![0i8; engine.len()];
//! engine.read(&mut tensor)?;
//! # Ok::<(), chime_melspec::MelSpecError>(())
//! ```
//!
//! # Memory
//!
//! Buffers are allocated once by [`MelSpectrogram::open`]. Writes and
//! reads work in place; allocation failure is reported as
//! [`MelSpecError::Allocation`].

mod config;
mod engine;
mod error;
pub mod filterbank;
pub mod mel;
pub mod quant;
mod rolling;
mod transform;
mod window;

pub use config::Geometry;
pub use engine::MelSpectrogram;
pub use error::MelSpecError;
pub use filterbank::mel_weight_matrix;
pub use mel::{FLOOR_DB, POWER_FLOOR};
pub use quant::Quantization;
