//! Fixed-topology feedforward networks whose weights
//! are supplied from outside, usually by a genome.
mod activation;
mod errors;
mod structure;

pub use activation::{HiddenActivation, OutputActivation};
pub use errors::{ErrorKind, NetworkError};
pub use structure::{Structure, LAYER_SIZES};

use crate::genomics::Individual;

use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use neurojump::Genome;
use rand::Rng;

/// A fully-connected feedforward network.
///
/// Per-layer values are exchanged in "slot" form: one
/// flat vector per layer index, where slot 0 (the input
/// layer) is always empty and slot `l` holds the row-major
/// `layer_sizes[l-1] × layer_sizes[l]` weight matrix (or the
/// `layer_sizes[l]` biases) feeding layer `l`.
#[derive(Clone, Debug)]
pub struct FeedForwardNetwork {
    structure: Structure,
    /// Weights feeding layer `l` at index `l - 1`.
    weights: Vec<Array2<f32>>,
    /// Biases of layer `l` at index `l - 1`.
    biases: Vec<Array1<f32>>,
    /// Activations of every layer, input included.
    outputs: Vec<Array2<f32>>,
}

impl FeedForwardNetwork {
    /// Creates a network with randomized hidden weights,
    /// using the thread-local RNG. See [`with_rng`].
    ///
    /// [`with_rng`]: FeedForwardNetwork::with_rng
    pub fn new(structure: Structure) -> Result<FeedForwardNetwork, NetworkError> {
        Self::with_rng(structure, &mut rand::thread_rng())
    }

    /// Creates a network whose hidden-layer weights are drawn
    /// uniformly from `[-r, r)`, with `r = sqrt(6 / (n_l-1 + n_l+1))`.
    /// Output-layer weights and all biases start at zero.
    ///
    /// # Errors
    /// Returns an [`Initialization`] error if the structure
    /// is inconsistent.
    ///
    /// # Examples
    /// ```
    /// use neurojump_nn::networks::{FeedForwardNetwork, Structure};
    ///
    /// let network = FeedForwardNetwork::with_rng(Structure::jump(), &mut rand::thread_rng()).unwrap();
    /// let weights = network.all_weights();
    ///
    /// assert!(weights[0].is_empty());
    /// assert_eq!(weights[1].len(), 100);
    /// assert!(weights[2].iter().all(|w| *w == 0.0));
    /// ```
    ///
    /// [`Initialization`]: ErrorKind::Initialization
    pub fn with_rng<R: Rng + ?Sized>(
        structure: Structure,
        rng: &mut R,
    ) -> Result<FeedForwardNetwork, NetworkError> {
        let mut network = Self::zeroed(structure)?;
        let sizes = network.structure.layer_sizes().to_vec();
        for l in 1..sizes.len() - 1 {
            let range = (6.0 / (sizes[l - 1] + sizes[l + 1]) as f32).sqrt();
            network.weights[l - 1] =
                Array2::random_using((sizes[l - 1], sizes[l]), Uniform::new(-range, range), rng);
        }
        Ok(network)
    }

    /// Creates a network with the given weights
    /// and zeroed biases.
    ///
    /// # Errors
    /// Returns an [`Initialization`] error if the structure
    /// is inconsistent, or a [`Weights`] error if `weights`
    /// does not fit it.
    ///
    /// [`Initialization`]: ErrorKind::Initialization
    /// [`Weights`]: ErrorKind::Weights
    pub fn with_weights(
        structure: Structure,
        weights: &[Vec<f32>],
    ) -> Result<FeedForwardNetwork, NetworkError> {
        let mut network = Self::zeroed(structure)?;
        network.set_weights(weights)?;
        Ok(network)
    }

    fn zeroed(structure: Structure) -> Result<FeedForwardNetwork, NetworkError> {
        structure.validate()?;
        let sizes = structure.layer_sizes();
        let batch = structure.batch_size();
        let weights = sizes
            .windows(2)
            .map(|pair| Array2::zeros((pair[0], pair[1])))
            .collect();
        let biases = sizes[1..].iter().map(|size| Array1::zeros(*size)).collect();
        let outputs = sizes
            .iter()
            .map(|size| Array2::zeros((batch, *size)))
            .collect();
        Ok(FeedForwardNetwork {
            structure,
            weights,
            biases,
            outputs,
        })
    }

    /// Replaces every weight matrix. Nothing is
    /// changed unless all slots fit the structure.
    ///
    /// # Errors
    /// Returns a [`Weights`] error if the slot count, slot 0,
    /// or any slot's length does not match the structure.
    ///
    /// [`Weights`]: ErrorKind::Weights
    pub fn set_weights(&mut self, weights: &[Vec<f32>]) -> Result<(), NetworkError> {
        let sizes = self.structure.layer_sizes();
        self.check_slots(weights, |l| sizes[l - 1] * sizes[l])?;
        self.weights = weights[1..]
            .iter()
            .zip(sizes.windows(2))
            .enumerate()
            .map(|(i, (slot, pair))| {
                Array2::from_shape_vec((pair[0], pair[1]), slot.clone()).map_err(|_| {
                    NetworkError::LayerLength {
                        layer: i + 1,
                        expected: pair[0] * pair[1],
                        found: slot.len(),
                    }
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    /// Returns every weight matrix, in the
    /// form [`set_weights`] accepts.
    ///
    /// [`set_weights`]: FeedForwardNetwork::set_weights
    pub fn all_weights(&self) -> Vec<Vec<f32>> {
        std::iter::once(vec![])
            .chain(self.weights.iter().map(|w| w.iter().copied().collect::<Vec<f32>>()))
            .collect()
    }

    /// Replaces every bias vector. Nothing is
    /// changed unless all slots fit the structure.
    ///
    /// # Errors
    /// Returns a [`Weights`] error if the slot count, slot 0,
    /// or any slot's length does not match the structure.
    ///
    /// [`Weights`]: ErrorKind::Weights
    pub fn set_biases(&mut self, biases: &[Vec<f32>]) -> Result<(), NetworkError> {
        let sizes = self.structure.layer_sizes();
        self.check_slots(biases, |l| sizes[l])?;
        self.biases = biases[1..]
            .iter()
            .map(|slot| Array1::from(slot.clone()))
            .collect();
        Ok(())
    }

    /// Returns every bias vector, in the
    /// form [`set_biases`] accepts.
    ///
    /// [`set_biases`]: FeedForwardNetwork::set_biases
    pub fn biases(&self) -> Vec<Vec<f32>> {
        std::iter::once(vec![])
            .chain(self.biases.iter().map(|b| b.to_vec()))
            .collect()
    }

    fn check_slots(
        &self,
        slots: &[Vec<f32>],
        expected_len: impl Fn(usize) -> usize,
    ) -> Result<(), NetworkError> {
        let layer_count = self.structure.layer_count();
        if slots.len() != layer_count {
            return Err(NetworkError::LayerCount {
                expected: layer_count,
                found: slots.len(),
            });
        }
        for (layer, slot) in slots.iter().enumerate() {
            let expected = if layer == 0 { 0 } else { expected_len(layer) };
            if slot.len() != expected {
                return Err(NetworkError::LayerLength {
                    layer,
                    expected,
                    found: slot.len(),
                });
            }
        }
        Ok(())
    }

    /// Runs a forward pass over a batch of inputs,
    /// returning one output vector per input.
    ///
    /// # Errors
    /// Returns an [`Inference`] error if the batch does not
    /// hold exactly `batch_size` inputs of `layer_sizes[0]`
    /// values each. No buffer is touched in that case.
    ///
    /// # Examples
    /// ```
    /// use neurojump_nn::networks::{FeedForwardNetwork, Structure};
    ///
    /// let mut network = FeedForwardNetwork::new(Structure::jump()).unwrap();
    /// let outputs = network.infer(&[[0.5; 10]]).unwrap();
    ///
    /// assert_eq!(outputs.len(), 1);
    /// assert!((outputs[0].iter().sum::<f32>() - 1.0).abs() < 1e-5);
    /// assert!(network.infer(&[[0.5; 9]]).is_err());
    /// ```
    ///
    /// [`Inference`]: ErrorKind::Inference
    pub fn infer<I: AsRef<[f32]>>(&mut self, batch: &[I]) -> Result<Vec<Vec<f32>>, NetworkError> {
        let expected = self.structure.batch_size();
        if batch.len() != expected {
            return Err(NetworkError::BatchSize {
                expected,
                found: batch.len(),
            });
        }
        let input_size = self.structure.input_size();
        for (index, input) in batch.iter().enumerate() {
            let found = input.as_ref().len();
            if found != input_size {
                return Err(NetworkError::InputLength {
                    index,
                    expected: input_size,
                    found,
                });
            }
        }

        for (mut row, input) in self.outputs[0].rows_mut().into_iter().zip(batch) {
            row.assign(&ndarray::ArrayView1::from(input.as_ref()));
        }
        self.forward();

        let last = &self.outputs[self.outputs.len() - 1];
        Ok(last.rows().into_iter().map(|row| row.to_vec()).collect())
    }

    /// Runs a forward pass over a flat buffer holding the
    /// whole batch back to back, and returns the outputs
    /// the same way. With a batch size of 1 this is simply
    /// a single input and a single output.
    ///
    /// # Errors
    /// Returns an [`Inference`] error if `input` does not hold
    /// exactly `batch_size × layer_sizes[0]` values.
    ///
    /// [`Inference`]: ErrorKind::Inference
    pub fn infer_single(&mut self, input: &[f32]) -> Result<Vec<f32>, NetworkError> {
        let input_size = self.structure.input_size();
        let expected = self.structure.batch_size() * input_size;
        if input.len() != expected {
            return Err(NetworkError::InputLength {
                index: 0,
                expected,
                found: input.len(),
            });
        }
        let batch: Vec<&[f32]> = input.chunks_exact(input_size).collect();
        Ok(self.infer(&batch)?.concat())
    }

    fn forward(&mut self) {
        let layer_count = self.structure.layer_count();
        for l in 1..layer_count {
            let mut values = self.outputs[l - 1].dot(&self.weights[l - 1]);
            values += &self.biases[l - 1];
            if l == layer_count - 1 {
                self.structure.output_activation().apply(&mut values);
            } else {
                self.structure.hidden_activation().apply(&mut values);
            }
            self.outputs[l] = values;
        }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }
}

impl TryFrom<&Individual> for FeedForwardNetwork {
    type Error = NetworkError;

    /// Builds a jump network carrying the genome's weights.
    fn try_from(individual: &Individual) -> Result<FeedForwardNetwork, NetworkError> {
        FeedForwardNetwork::with_weights(Structure::jump(), &individual.to_weights())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn structure(
        layer_sizes: Vec<usize>,
        output_activation: OutputActivation,
        batch_size: usize,
    ) -> Structure {
        Structure::new(
            layer_sizes,
            HiddenActivation::RectifiedLinear,
            output_activation,
            batch_size,
            0.9,
            0.9,
        )
        .unwrap()
    }

    #[test]
    fn initialization_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let structure = structure(vec![4, 6, 8, 3], OutputActivation::Softmax, 1);
        let network = FeedForwardNetwork::with_rng(structure, &mut rng).unwrap();
        let weights = network.all_weights();

        assert_eq!(weights.len(), 4);
        assert!(weights[0].is_empty());
        assert_eq!(weights[1].len(), 24);
        assert_eq!(weights[2].len(), 48);
        assert_eq!(weights[3].len(), 24);

        let range1 = (6.0f32 / (4 + 8) as f32).sqrt();
        let range2 = (6.0f32 / (6 + 3) as f32).sqrt();
        assert!(weights[1].iter().all(|w| (-range1..range1).contains(w)));
        assert!(weights[2].iter().all(|w| (-range2..range2).contains(w)));
        assert!(weights[1].iter().any(|w| *w != 0.0));
        assert!(weights[3].iter().all(|w| *w == 0.0));
        assert!(network.biases().iter().flatten().all(|b| *b == 0.0));
    }

    #[test]
    fn seeded_initialization_is_reproducible() {
        let build = || {
            FeedForwardNetwork::with_rng(Structure::jump(), &mut ChaCha8Rng::seed_from_u64(4))
                .unwrap()
        };
        assert_eq!(build().all_weights(), build().all_weights());
    }

    #[test]
    fn weights_roundtrip() {
        let mut network = FeedForwardNetwork::new(Structure::jump()).unwrap();
        let weights = vec![
            vec![],
            (0..100).map(|i| i as f32 * 0.01).collect(),
            (0..20).map(|i| -(i as f32)).collect(),
        ];
        network.set_weights(&weights).unwrap();
        assert_eq!(network.all_weights(), weights);
    }

    #[test]
    fn mismatched_weights_leave_network_untouched() {
        let mut network = FeedForwardNetwork::new(Structure::jump()).unwrap();
        let before = network.all_weights();

        let error = network.set_weights(&[vec![], vec![1.0; 100]]).unwrap_err();
        assert_eq!(error, NetworkError::LayerCount { expected: 3, found: 2 });
        assert_eq!(error.kind(), ErrorKind::Weights);

        let error = network
            .set_weights(&[vec![], vec![1.0; 100], vec![1.0; 19]])
            .unwrap_err();
        assert_eq!(
            error,
            NetworkError::LayerLength {
                layer: 2,
                expected: 20,
                found: 19
            }
        );

        let error = network
            .set_weights(&[vec![0.0], vec![1.0; 100], vec![1.0; 20]])
            .unwrap_err();
        assert_eq!(
            error,
            NetworkError::LayerLength {
                layer: 0,
                expected: 0,
                found: 1
            }
        );
        assert_eq!(network.all_weights(), before);
    }

    #[test]
    fn known_forward_pass() {
        // 2 inputs, 2 hidden (ReLU), 1 identity output.
        let mut network = FeedForwardNetwork::with_weights(
            structure(vec![2, 2, 1], OutputActivation::Identity, 1),
            &[vec![], vec![1.0, -1.0, 2.0, 1.0], vec![1.0, 3.0]],
        )
        .unwrap();
        network.set_biases(&[vec![], vec![0.0, -1.0], vec![0.5]]).unwrap();

        // hidden = relu([1*1 + 2*2, 1*-1 + 2*1 - 1]) = [5, 0]
        let output = network.infer(&[[1.0, 2.0]]).unwrap();
        assert_abs_diff_eq!(output[0][0], 5.5);

        // hidden = relu([-1, 1 - 1]) = [0, 0]
        let output = network.infer(&[[-1.0, 0.0]]).unwrap();
        assert_abs_diff_eq!(output[0][0], 0.5);
    }

    #[test]
    fn zero_weights_give_uniform_softmax() {
        let weights = vec![vec![], vec![0.0; 100], vec![0.0; 20]];
        let mut network = FeedForwardNetwork::with_weights(Structure::jump(), &weights).unwrap();
        let output = network.infer_single(&[0.3; 10]).unwrap();
        assert_abs_diff_eq!(output[0], 0.5);
        assert_abs_diff_eq!(output[1], 0.5);
    }

    #[test]
    fn inference_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let mut network = FeedForwardNetwork::with_rng(Structure::jump(), &mut rng).unwrap();
        let hidden = network.all_weights()[1].clone();
        let output = (0..20).map(|i| (i as f32 - 10.0) * 0.1).collect();
        network.set_weights(&[vec![], hidden, output]).unwrap();
        let input: Vec<f32> = (0..10).map(|i| i as f32 / 10.0).collect();
        let first = network.infer_single(&input).unwrap();
        let second = network.infer_single(&input).unwrap();
        assert_eq!(first, second);
        assert_abs_diff_eq!(first.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        assert!(first.iter().all(|x| *x >= 0.0));
    }

    #[test]
    fn batched_inference() {
        let mut network = FeedForwardNetwork::with_weights(
            structure(vec![2, 3, 2], OutputActivation::Softmax, 3),
            &[vec![], vec![0.5; 6], vec![1.0, -1.0, 0.0, 1.0, 2.0, 0.0]],
        )
        .unwrap();
        let batch = [vec![1.0, 1.0], vec![0.0, 0.0], vec![-2.0, 4.0]];
        let outputs = network.infer(&batch).unwrap();
        assert_eq!(outputs.len(), 3);
        for output in &outputs {
            assert_eq!(output.len(), 2);
            assert_abs_diff_eq!(output.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        }
        // Zero input: zero hidden, so a uniform output.
        assert_abs_diff_eq!(outputs[1][0], 0.5);

        let flat = network.infer_single(&batch.concat()).unwrap();
        assert_eq!(flat, outputs.concat());
    }

    #[test]
    fn shape_errors_precede_computation() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut network = FeedForwardNetwork::with_rng(Structure::jump(), &mut rng).unwrap();
        let input = [0.25; 10];
        let expected = network.infer(&[input]).unwrap();

        let error = network.infer(&[input, input]).unwrap_err();
        assert_eq!(error, NetworkError::BatchSize { expected: 1, found: 2 });
        assert_eq!(error.kind(), ErrorKind::Inference);

        let error = network.infer(&[vec![1.0; 11]]).unwrap_err();
        assert_eq!(
            error,
            NetworkError::InputLength {
                index: 0,
                expected: 10,
                found: 11
            }
        );
        let empty: [Vec<f32>; 0] = [];
        assert!(network.infer(&empty).is_err());
        assert!(network.infer_single(&[1.0; 3]).is_err());

        assert_eq!(network.infer(&[input]).unwrap(), expected);
    }

    #[test]
    fn inconsistent_structure_fails_initialization() {
        let json = r#"{
            "layer_sizes": [10],
            "hidden_activation": "RectifiedLinear",
            "output_activation": "Softmax",
            "batch_size": 1,
            "learning_rate": 0.9,
            "momentum": 0.9
        }"#;
        let structure: Structure = serde_json::from_str(json).unwrap();
        let error = FeedForwardNetwork::new(structure).unwrap_err();
        assert_eq!(error, NetworkError::TooFewLayers(1));
        assert_eq!(error.kind(), ErrorKind::Initialization);
    }
}
