use chime_melspec::MelSpectrogram;
use tracing::{debug, info};

use crate::detector::{Detector, DetectorConfig, Trigger};
use crate::model::Model;
use crate::ClassifierError;

/// Streams audio through a [`MelSpectrogram`] into a [`Model`].
///
/// # Pipeline
///
/// 1. [`feed`](Self::feed): PCM16 chunks -> spectrogram columns
/// 2. [`classify`](Self::classify): quantized spectrogram -> model input ->
///    dequantized class scores
/// 3. [`poll`](Self::poll): class scores -> [`Detector`] -> [`Trigger`]
///
/// The spectrogram is written directly in the model input's quantization,
/// which is copied from the model when the classifier is built.
pub struct Classifier<'w, M: Model> {
    engine: MelSpectrogram<'w>,
    model: M,
    detector: Detector,
    predictions: Vec<f32>,
}

impl<'w, M: Model> Classifier<'w, M> {
    /// Connects an open engine to a model.
    ///
    /// Fails if the engine is closed, if the model input does not match
    /// the spectrogram size, or if the model has no outputs.
    pub fn new(
        mut engine: MelSpectrogram<'w>,
        mut model: M,
        cfg: DetectorConfig,
    ) -> Result<Self, ClassifierError> {
        if !engine.is_open() {
            return Err(chime_melspec::MelSpecError::Closed.into());
        }
        let input_len = model.input_mut().len();
        if input_len != engine.len() {
            return Err(ClassifierError::InputSize {
                expected: engine.len(),
                got: input_len,
            });
        }
        let outputs = model.num_outputs();
        if outputs == 0 {
            return Err(ClassifierError::NoOutputs);
        }

        let q = model.input_quantization();
        engine.set_output_quantization(q);
        debug!(
            scale = q.scale,
            zero_point = q.zero_point,
            outputs,
            "classifier: connected"
        );

        Ok(Self {
            engine,
            model,
            detector: Detector::with_config(cfg),
            predictions: vec![0.0; outputs],
        })
    }

    /// Writes audio into the spectrogram. Returns the number of new columns.
    pub fn feed(&mut self, samples: &[i16]) -> Result<usize, ClassifierError> {
        Ok(self.engine.write(samples)?)
    }

    /// Runs the model on the current spectrogram and returns class scores.
    pub fn classify(&mut self) -> Result<&[f32], ClassifierError> {
        self.engine.read(self.model.input_mut())?;
        let n = self.model.predict(&mut self.predictions)?;
        debug!(scores = ?&self.predictions[..n], "classifier: inference");
        Ok(&self.predictions[..n])
    }

    /// Classifies and feeds the detector. After a trigger the spectrogram
    /// is cleared so the same sound is not reported again.
    pub fn poll(&mut self) -> Result<Option<Trigger>, ClassifierError> {
        self.classify()?;
        let Some(trigger) = self.detector.feed(&self.predictions) else {
            return Ok(None);
        };

        info!(
            class = trigger.class,
            score = trigger.score,
            hits = trigger.hits,
            "classifier: triggered"
        );
        self.engine.reset()?;
        Ok(Some(trigger))
    }

    /// Clears spectrogram history and detector state.
    pub fn reset(&mut self) -> Result<(), ClassifierError> {
        self.engine.reset()?;
        self.detector.reset();
        Ok(())
    }

    pub fn engine(&self) -> &MelSpectrogram<'w> {
        &self.engine
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Scores from the last classification.
    pub fn predictions(&self) -> &[f32] {
        &self.predictions
    }

    /// Splits the classifier back into its engine and model.
    pub fn into_parts(self) -> (MelSpectrogram<'w>, M) {
        (self.engine, self.model)
    }
}
