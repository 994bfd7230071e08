use super::{GenomeError, Individual};

use neurojump::{EvolutionConfig, Genome, Population};
use serde::{Deserialize, Serialize};

/// A saved generation: the per-layer weights
/// of each of its individuals.
///
/// Scores are not saved; every individual loaded
/// from a snapshot starts with zero fitness.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    individuals: Vec<Vec<Vec<f64>>>,
}

impl Snapshot {
    /// Records the weights of every member of `population`.
    pub fn from_population(population: &Population<Individual>) -> Snapshot {
        Self::from_weights(population.members().iter().map(Genome::to_weights))
    }

    /// Records a sequence of per-layer weights.
    pub fn from_weights(weights: impl IntoIterator<Item = Vec<Vec<f32>>>) -> Snapshot {
        let individuals = weights
            .into_iter()
            .map(|layers| {
                layers
                    .into_iter()
                    .map(|slot| slot.into_iter().map(f64::from).collect())
                    .collect()
            })
            .collect();
        Snapshot { individuals }
    }

    /// Number of saved individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Rebuilds the saved individuals, optionally keeping
    /// only the first `limit` of them.
    ///
    /// # Errors
    /// Returns an error if any kept individual does not
    /// flatten to exactly [`Individual::SIZE`] genes.
    pub fn individuals(&self, limit: Option<usize>) -> Result<Vec<Individual>, GenomeError> {
        self.individuals
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|layers| {
                let genes = layers.iter().flatten().map(|w| *w as f32).collect();
                Individual::from_genes(genes, 0)
            })
            .collect()
    }

    /// Seeds the population preceding generation `generation`
    /// from the saved individuals, so that a single call to
    /// [`Population::next_generation`] yields that generation.
    ///
    /// # Errors
    /// Returns an error if any kept individual does not
    /// flatten to exactly [`Individual::SIZE`] genes.
    pub fn seed(
        &self,
        config: EvolutionConfig,
        generation: usize,
        limit: Option<usize>,
    ) -> Result<Population<Individual>, GenomeError> {
        Ok(Population::new_seeded(
            self.individuals(limit)?,
            config,
            generation,
        ))
    }
}
