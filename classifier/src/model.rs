use chime_melspec::Quantization;

use crate::ClassifierError;

/// An int8 classifier consuming a flattened `[width, num_mel_bins]`
/// spectrogram.
///
/// Implementations wrap an external inference engine. The classifier only
/// fills the input tensor, invokes the model and reads the output tensor.
///
/// # Tensor Requirements
///
/// - Input: int8, `width * num_mel_bins` values, oldest column first
/// - Output: int8 class scores, one per class
/// - Both tensors carry affine quantization parameters
pub trait Model {
    /// Quantization of the input tensor. The spectrogram is written in
    /// this domain.
    fn input_quantization(&self) -> Quantization;

    /// Mutable view of the input tensor.
    fn input_mut(&mut self) -> &mut [i8];

    /// Runs inference on the current input.
    fn invoke(&mut self) -> Result<(), ClassifierError>;

    /// Output tensor of the last invocation.
    fn output(&self) -> &[i8];

    fn output_quantization(&self) -> Quantization;

    /// Number of classes.
    fn num_outputs(&self) -> usize {
        self.output().len()
    }

    /// Invokes the model and writes dequantized class scores to
    /// `predictions`. Returns the number of scores written.
    fn predict(&mut self, predictions: &mut [f32]) -> Result<usize, ClassifierError> {
        let n = self.num_outputs();
        if predictions.len() < n {
            return Err(ClassifierError::OutputSize {
                expected: n,
                got: predictions.len(),
            });
        }

        self.invoke()?;

        let q = self.output_quantization();
        for (p, &y) in predictions.iter_mut().zip(self.output()) {
            *p = q.dequantize(y);
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        input: Vec<i8>,
        output: Vec<i8>,
        fail: bool,
    }

    impl Fixed {
        fn new(fail: bool) -> Self {
            Self {
                input: vec![0; 4],
                output: vec![0; 3],
                fail,
            }
        }
    }

    impl Model for Fixed {
        fn input_quantization(&self) -> Quantization {
            Quantization::default()
        }
        fn input_mut(&mut self) -> &mut [i8] {
            &mut self.input
        }
        fn invoke(&mut self) -> Result<(), ClassifierError> {
            if self.fail {
                return Err(ClassifierError::Model("invoke failed".into()));
            }
            self.output = vec![-128, 0, 127];
            Ok(())
        }
        fn output(&self) -> &[i8] {
            &self.output
        }
        fn output_quantization(&self) -> Quantization {
            Quantization::new(1.0 / 256.0, -128)
        }
    }

    #[test]
    fn predict_dequantizes() {
        let mut m = Fixed::new(false);
        let mut p = [f32::NAN; 3];
        assert_eq!(m.predict(&mut p).unwrap(), 3);
        assert_eq!(p[0], 0.0);
        assert_eq!(p[1], 0.5);
        assert!((p[2] - 255.0 / 256.0).abs() < 1e-6);
    }

    #[test]
    fn predict_checks_buffer() {
        let mut m = Fixed::new(false);
        let mut p = [0.0; 2];
        assert!(matches!(
            m.predict(&mut p),
            Err(ClassifierError::OutputSize {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn predict_propagates_invoke_error() {
        let mut m = Fixed::new(true);
        let mut p = [0.0; 3];
        assert!(matches!(m.predict(&mut p), Err(ClassifierError::Model(_))));
    }
}
