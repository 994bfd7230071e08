use thiserror::Error;

/// Broad classification of a [`NetworkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The network structure is inconsistent.
    Initialization,
    /// Supplied weights or biases do not fit the structure.
    Weights,
    /// An inference batch does not fit the structure.
    Inference,
}

/// An error type indicating a failure to build,
/// configure or run a network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// A network needs an input and an output layer.
    #[error("a network needs at least 2 layers, got {0}")]
    TooFewLayers(usize),
    /// The layer at the given index has no neurons.
    #[error("layer {0} has no neurons")]
    EmptyLayer(usize),
    /// Inference batches must hold at least one input.
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
    /// Wrong number of per-layer slots.
    #[error("expected {expected} layer slots, got {found}")]
    LayerCount { expected: usize, found: usize },
    /// A per-layer slot has the wrong number of values.
    #[error("layer {layer} expects {expected} values, got {found}")]
    LayerLength {
        layer: usize,
        expected: usize,
        found: usize,
    },
    /// Wrong number of inputs in an inference batch.
    #[error("expected a batch of {expected} inputs, got {found}")]
    BatchSize { expected: usize, found: usize },
    /// An input of the batch has the wrong length.
    #[error("input {index} has length {found}, expected {expected}")]
    InputLength {
        index: usize,
        expected: usize,
        found: usize,
    },
}

impl NetworkError {
    /// Returns the error's classification.
    ///
    /// # Examples
    /// ```
    /// use neurojump_nn::networks::{ErrorKind, NetworkError};
    ///
    /// assert_eq!(NetworkError::ZeroBatchSize.kind(), ErrorKind::Initialization);
    /// assert_eq!(
    ///     NetworkError::BatchSize { expected: 1, found: 2 }.kind(),
    ///     ErrorKind::Inference
    /// );
    /// ```
    pub fn kind(&self) -> ErrorKind {
        use NetworkError::*;
        match self {
            TooFewLayers(_) | EmptyLayer(_) | ZeroBatchSize => ErrorKind::Initialization,
            LayerCount { .. } | LayerLength { .. } => ErrorKind::Weights,
            BatchSize { .. } | InputLength { .. } => ErrorKind::Inference,
        }
    }
}
