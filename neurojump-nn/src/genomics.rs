//! Genomes encoding the weights of a jump network.
mod errors;
mod snapshot;

pub use errors::GenomeError;
pub use snapshot::Snapshot;

use crate::networks::LAYER_SIZES;

use neurojump::{Fitness, Genome};
use serde::{Deserialize, Serialize};

use std::cmp::Ordering;

/// Number of genes encoding the hidden layer's weights.
const HIDDEN_GENES: usize = LAYER_SIZES[0] * LAYER_SIZES[1];
/// Number of genes encoding the output layer's weights.
const OUTPUT_GENES: usize = LAYER_SIZES[1] * LAYER_SIZES[2];

/// A candidate jump network: its flattened weights
/// and the score it achieved.
///
/// Genes `[0, 100)` hold the row-major hidden weight matrix,
/// genes `[100, 120)` the row-major output weight matrix.
/// Individuals compare by fitness alone.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawIndividual")]
pub struct Individual {
    genes: Vec<f32>,
    fitness: Fitness,
}

impl Individual {
    /// Number of genes in every individual.
    pub const SIZE: usize = HIDDEN_GENES + OUTPUT_GENES;

    /// Creates an individual from its genes.
    ///
    /// # Errors
    /// Returns an error unless there are exactly
    /// [`SIZE`] genes.
    ///
    /// [`SIZE`]: Individual::SIZE
    pub fn from_genes(genes: Vec<f32>, fitness: Fitness) -> Result<Individual, GenomeError> {
        if genes.len() != Self::SIZE {
            return Err(GenomeError::GeneCount {
                expected: Self::SIZE,
                found: genes.len(),
            });
        }
        Ok(Individual { genes, fitness })
    }

    /// Flattens per-layer weights into genes, concatenating
    /// every slot in order.
    ///
    /// # Errors
    /// Returns an error unless the slots hold exactly
    /// [`SIZE`] values altogether.
    ///
    /// # Examples
    /// ```
    /// use neurojump_nn::genomics::Individual;
    ///
    /// let weights = vec![vec![], vec![0.5; 100], vec![-0.5; 20]];
    /// let genes = Individual::encode(&weights).unwrap();
    /// assert_eq!(genes.len(), Individual::SIZE);
    /// assert_eq!(genes[99], 0.5);
    /// assert_eq!(genes[100], -0.5);
    ///
    /// assert!(Individual::encode(&[vec![], vec![0.5; 100]]).is_err());
    /// ```
    ///
    /// [`SIZE`]: Individual::SIZE
    pub fn encode(weights: &[Vec<f32>]) -> Result<Vec<f32>, GenomeError> {
        let genes = weights.concat();
        if genes.len() != Self::SIZE {
            return Err(GenomeError::GeneCount {
                expected: Self::SIZE,
                found: genes.len(),
            });
        }
        Ok(genes)
    }

    /// Splits the genes into per-layer weights:
    /// an empty input slot, the hidden weights,
    /// and the output weights.
    pub fn decode(&self) -> Vec<Vec<f32>> {
        vec![
            vec![],
            self.genes[..HIDDEN_GENES].to_vec(),
            self.genes[HIDDEN_GENES..].to_vec(),
        ]
    }
}

impl Genome for Individual {
    type Weights = Vec<Vec<f32>>;
    type Error = GenomeError;

    fn from_weights(weights: &Vec<Vec<f32>>, fitness: Fitness) -> Result<Individual, GenomeError> {
        Ok(Individual {
            genes: Self::encode(weights)?,
            fitness,
        })
    }

    fn to_weights(&self) -> Vec<Vec<f32>> {
        self.decode()
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

impl PartialEq for Individual {
    fn eq(&self, other: &Individual) -> bool {
        self.fitness == other.fitness
    }
}

impl PartialOrd for Individual {
    fn partial_cmp(&self, other: &Individual) -> Option<Ordering> {
        self.fitness.partial_cmp(&other.fitness)
    }
}

#[derive(Deserialize)]
struct RawIndividual {
    genes: Vec<f32>,
    fitness: Fitness,
}

impl TryFrom<RawIndividual> for Individual {
    type Error = GenomeError;

    fn try_from(raw: RawIndividual) -> Result<Individual, GenomeError> {
        Individual::from_genes(raw.genes, raw.fitness)
    }
}
