mod errors;

pub use errors::MutationError;

use rand::Rng;

/// Fitness score of a genome. Scores are
/// game results, and so are never negative.
pub type Fitness = u32;

/// Smallest factor a gene can be scaled by
/// during a point mutation.
pub const MUTATION_FACTOR_MIN: f32 = 0.75;
/// Largest factor a gene can be scaled by
/// during a point mutation.
pub const MUTATION_FACTOR_MAX: f32 = 1.25;

/// An interface for genomes that can be evolved
/// by a [`Population`].
///
/// Genomes are flat vectors of real-valued genes
/// with an attached fitness. The layered representation
/// a genome is decoded into (e.g. per-layer weight
/// matrices of a neural network) is left to the
/// implementor, and is effectively opaque to the
/// population.
///
/// [`Population`]: crate::Population
pub trait Genome: Clone {
    /// Layered representation genomes are
    /// encoded from and decoded into.
    type Weights;
    /// Error returned when a layered representation
    /// does not fit the genome's layout.
    type Error: std::error::Error + 'static;

    /// Flattens a layered representation into a new genome
    /// with the specified fitness.
    fn from_weights(weights: &Self::Weights, fitness: Fitness) -> Result<Self, Self::Error>;

    /// Returns the genome's layered representation.
    fn to_weights(&self) -> Self::Weights;

    /// Returns the genome's genes.
    fn genes(&self) -> &[f32];

    /// Returns the genome's genes for modification.
    fn genes_mut(&mut self) -> &mut [f32];

    /// Returns the genome's fitness value.
    fn fitness(&self) -> Fitness;

    /// Sets the genome's fitness value.
    fn set_fitness(&mut self, fitness: Fitness);

    /// Scales a single, uniformly chosen gene by a factor
    /// drawn uniformly from [[`MUTATION_FACTOR_MIN`], [`MUTATION_FACTOR_MAX`]].
    /// Returns the index of the mutated gene.
    ///
    /// # Errors
    /// Returns an error if the genome has no genes.
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize, MutationError> {
        point_mutation(self.genes_mut(), rng)
    }
}

/// Scales one uniformly chosen value of `genes` by a random
/// factor in [[`MUTATION_FACTOR_MIN`], [`MUTATION_FACTOR_MAX`]],
/// returning the index of the changed value.
///
/// # Errors
/// Returns an error if `genes` is empty.
///
/// # Examples
/// ```
/// use neurojump::point_mutation;
///
/// let mut genes = [2.0; 8];
/// let index = point_mutation(&mut genes, &mut rand::thread_rng()).unwrap();
///
/// assert!((1.5..=2.5).contains(&genes[index]));
/// assert!(point_mutation(&mut [], &mut rand::thread_rng()).is_err());
/// ```
pub fn point_mutation<R: Rng + ?Sized>(
    genes: &mut [f32],
    rng: &mut R,
) -> Result<usize, MutationError> {
    if genes.is_empty() {
        return Err(MutationError::EmptyGenome);
    }
    let index = rng.gen_range(0..genes.len());
    genes[index] *= rng.gen_range(MUTATION_FACTOR_MIN..=MUTATION_FACTOR_MAX);
    Ok(index)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use std::convert::Infallible;

    /// Minimal genome used throughout the crate's tests.
    #[derive(Clone, Debug, PartialEq)]
    pub(crate) struct Strand {
        pub(crate) genes: Vec<f32>,
        pub(crate) fitness: Fitness,
    }

    impl Strand {
        pub(crate) fn filled(value: f32, len: usize, fitness: Fitness) -> Strand {
            Strand {
                genes: vec![value; len],
                fitness,
            }
        }
    }

    impl Genome for Strand {
        type Weights = Vec<f32>;
        type Error = Infallible;

        fn from_weights(weights: &Vec<f32>, fitness: Fitness) -> Result<Strand, Infallible> {
            Ok(Strand {
                genes: weights.clone(),
                fitness,
            })
        }

        fn to_weights(&self) -> Vec<f32> {
            self.genes.clone()
        }

        fn genes(&self) -> &[f32] {
            &self.genes
        }

        fn genes_mut(&mut self) -> &mut [f32] {
            &mut self.genes
        }

        fn fitness(&self) -> Fitness {
            self.fitness
        }

        fn set_fitness(&mut self, fitness: Fitness) {
            self.fitness = fitness;
        }
    }

    #[test]
    fn mutation_changes_exactly_one_gene() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let original: Vec<f32> = (1..=120).map(|i| i as f32).collect();
            let mut strand = Strand {
                genes: original.clone(),
                fitness: 0,
            };
            let index = strand.mutate(&mut rng).unwrap();

            for (i, (before, after)) in original.iter().zip(&strand.genes).enumerate() {
                if i != index {
                    assert_eq!(before.to_bits(), after.to_bits());
                }
            }
            let factor = strand.genes[index] / original[index];
            assert!(
                (MUTATION_FACTOR_MIN - 1e-6..=MUTATION_FACTOR_MAX + 1e-6).contains(&factor),
                "factor {} out of range",
                factor
            );
        }
    }

    #[test]
    fn mutation_of_empty_genome_fails() {
        let mut strand = Strand::filled(1.0, 0, 0);
        assert_eq!(
            strand.mutate(&mut ChaCha8Rng::seed_from_u64(0)),
            Err(MutationError::EmptyGenome)
        );
    }

    #[test]
    fn mutation_hits_every_position() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut hit = [false; 10];
        for _ in 0..500 {
            hit[point_mutation(&mut [1.0; 10], &mut rng).unwrap()] = true;
        }
        assert!(hit.iter().all(|h| *h));
    }
}
