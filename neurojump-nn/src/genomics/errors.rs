use thiserror::Error;

/// An error type indicating a genome
/// was built from badly-shaped data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenomeError {
    /// The data does not hold exactly one value per gene.
    #[error("expected {expected} genes, found {found}")]
    GeneCount { expected: usize, found: usize },
}
