use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Number of copies of the fittest genome carried
/// over unchanged into the next generation.
pub const ELITISM_K: usize = 5;
/// Number of genomes in a fully-built generation.
pub const POP_SIZE: usize = 95 + ELITISM_K;
/// Chance that each bred genome is mutated.
pub const MUTATION_RATE: f64 = 0.05;
/// Chance that a pair of selected parents is
/// replaced by their crossover children.
pub const CROSSOVER_RATE: f64 = 0.7;

/// Configuration data for next-generation
/// construction.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Values
/// outside it saturate to "never" or "always".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Size of each bred generation. Breeding adds
    /// genomes in pairs; a generation that would
    /// overshoot this size is truncated to it.
    pub size: NonZeroUsize,
    /// Number of copies of the generation champion
    /// placed at the start of the next generation.
    pub elitism: usize,
    /// Chance that each bred genome receives
    /// a point mutation.
    pub mutation_chance: f64,
    /// Chance that selected parents are replaced
    /// by their crossover children.
    pub crossover_chance: f64,
}

impl EvolutionConfig {
    /// Returns a "zero-valued" configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use neurojump::EvolutionConfig;
    ///
    /// let config = EvolutionConfig {
    ///     elitism: 2,
    ///     // Default the rest...
    ///     ..EvolutionConfig::zero()
    /// };
    /// assert_eq!(config.size.get(), 1);
    /// ```
    pub const fn zero() -> EvolutionConfig {
        EvolutionConfig {
            // SAFETY: 1 is a valid NonZeroUsize.
            size: unsafe { NonZeroUsize::new_unchecked(1) },
            elitism: 0,
            mutation_chance: 0.0,
            crossover_chance: 0.0,
        }
    }
}

impl Default for EvolutionConfig {
    /// Returns the standard configuration: [`POP_SIZE`] genomes,
    /// [`ELITISM_K`] elite copies, [`MUTATION_RATE`] and
    /// [`CROSSOVER_RATE`] chances.
    ///
    /// # Examples
    /// ```
    /// use neurojump::{EvolutionConfig, POP_SIZE};
    ///
    /// assert_eq!(EvolutionConfig::default().size.get(), POP_SIZE);
    /// ```
    fn default() -> EvolutionConfig {
        EvolutionConfig {
            // SAFETY: POP_SIZE is nonzero.
            size: unsafe { NonZeroUsize::new_unchecked(POP_SIZE) },
            elitism: ELITISM_K,
            mutation_chance: MUTATION_RATE,
            crossover_chance: CROSSOVER_RATE,
        }
    }
}
