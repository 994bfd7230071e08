use thiserror::Error;

/// Errors raised while breeding a population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PopulationError {
    /// There are no genomes to breed from.
    #[error("attempted evolution on empty population")]
    EmptyPopulation,
}
