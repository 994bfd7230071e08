use thiserror::Error;

/// An error type indicating a failure
/// to carry out a point mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The genome has no genes.
    #[error("point mutation on empty genome")]
    EmptyGenome,
}
