use super::{HiddenActivation, NetworkError, OutputActivation};

use serde::{Deserialize, Serialize};

/// Layer sizes of the jump network: 10 observations,
/// 10 hidden neurons, and one output per action.
pub const LAYER_SIZES: [usize; 3] = [10, 10, 2];

/// Immutable description of a feedforward network.
///
/// The learning rate and momentum are carried for
/// completeness only; networks are never trained
/// by gradient descent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    layer_sizes: Vec<usize>,
    hidden_activation: HiddenActivation,
    output_activation: OutputActivation,
    batch_size: usize,
    learning_rate: f32,
    momentum: f32,
}

impl Structure {
    /// Creates a new structure.
    ///
    /// # Errors
    /// Returns an error if there are fewer than 2 layers,
    /// if any layer is empty, or if `batch_size` is 0.
    ///
    /// # Examples
    /// ```
    /// use neurojump_nn::networks::{HiddenActivation, OutputActivation, Structure};
    ///
    /// let structure = Structure::new(
    ///     vec![3, 4, 1],
    ///     HiddenActivation::Sigmoid,
    ///     OutputActivation::Identity,
    ///     2,
    ///     0.1,
    ///     0.0,
    /// );
    /// assert!(structure.is_ok());
    ///
    /// let structure = Structure::new(
    ///     vec![3],
    ///     HiddenActivation::Sigmoid,
    ///     OutputActivation::Identity,
    ///     1,
    ///     0.1,
    ///     0.0,
    /// );
    /// assert!(structure.is_err());
    /// ```
    pub fn new(
        layer_sizes: Vec<usize>,
        hidden_activation: HiddenActivation,
        output_activation: OutputActivation,
        batch_size: usize,
        learning_rate: f32,
        momentum: f32,
    ) -> Result<Structure, NetworkError> {
        let structure = Structure {
            layer_sizes,
            hidden_activation,
            output_activation,
            batch_size,
            learning_rate,
            momentum,
        };
        structure.validate()?;
        Ok(structure)
    }

    /// The structure every jump agent uses:
    /// [`LAYER_SIZES`], ReLU hidden layer, softmax
    /// output, single-input batches.
    pub fn jump() -> Structure {
        Structure {
            layer_sizes: LAYER_SIZES.to_vec(),
            hidden_activation: HiddenActivation::RectifiedLinear,
            output_activation: OutputActivation::Softmax,
            batch_size: 1,
            learning_rate: 0.9,
            momentum: 0.9,
        }
    }

    /// Checks the structure's consistency. Needed
    /// for deserialized structures, which bypass [`new`].
    ///
    /// [`new`]: Structure::new
    pub(crate) fn validate(&self) -> Result<(), NetworkError> {
        if self.layer_sizes.len() < 2 {
            return Err(NetworkError::TooFewLayers(self.layer_sizes.len()));
        }
        if let Some(layer) = self.layer_sizes.iter().position(|size| *size == 0) {
            return Err(NetworkError::EmptyLayer(layer));
        }
        if self.batch_size == 0 {
            return Err(NetworkError::ZeroBatchSize);
        }
        Ok(())
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn layer_count(&self) -> usize {
        self.layer_sizes.len()
    }

    /// Length of each input vector.
    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    /// Length of each output vector.
    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    pub fn hidden_activation(&self) -> HiddenActivation {
        self.hidden_activation
    }

    pub fn output_activation(&self) -> OutputActivation {
        self.output_activation
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }
}

impl Default for Structure {
    fn default() -> Structure {
        Structure::jump()
    }
}
