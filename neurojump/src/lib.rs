//! A fixed-topology genetic algorithm for evolving the
//! weights of small neural networks.
//!
//! Genomes are flat vectors of real-valued genes with a
//! non-negative integer fitness, exposed through the [`Genome`]
//! trait. A [`Population`] breeds each new generation by copying
//! its champion a few times (elitism) and filling the rest with
//! children of fitness-weighted parents, recombined by single-point
//! crossover and scaled by point mutations. Generational logging
//! is supported via the [`logging`] module.
//!
//! A neural network-based genome representation is supplied by
//! the `neurojump-nn` crate.
//!
//! # Example usage: evolving a vector towards a target sum
//! ```
//! use neurojump::{EvolutionConfig, Fitness, Genome, Population};
//! use std::convert::Infallible;
//!
//! #[derive(Clone, Debug)]
//! struct Vector {
//!     genes: Vec<f32>,
//!     fitness: Fitness,
//! }
//!
//! impl Genome for Vector {
//!     type Weights = Vec<f32>;
//!     type Error = Infallible;
//!
//!     fn from_weights(weights: &Vec<f32>, fitness: Fitness) -> Result<Vector, Infallible> {
//!         Ok(Vector { genes: weights.clone(), fitness })
//!     }
//!     fn to_weights(&self) -> Vec<f32> {
//!         self.genes.clone()
//!     }
//!     fn genes(&self) -> &[f32] {
//!         &self.genes
//!     }
//!     fn genes_mut(&mut self) -> &mut [f32] {
//!         &mut self.genes
//!     }
//!     fn fitness(&self) -> Fitness {
//!         self.fitness
//!     }
//!     fn set_fitness(&mut self, fitness: Fitness) {
//!         self.fitness = fitness;
//!     }
//! }
//!
//! fn score(genes: &[f32]) -> Fitness {
//!     let distance = (genes.iter().sum::<f32>() - 20.0).abs();
//!     (100.0 - distance).max(0.0) as Fitness
//! }
//!
//! let mut rng = rand::thread_rng();
//! let mut population: Population<Vector> = Population::new(EvolutionConfig::default());
//! for _ in 0..EvolutionConfig::default().size.get() {
//!     population.add_member(&vec![1.0; 8], 0).unwrap();
//! }
//!
//! for _ in 0..20 {
//!     for genome in population.take_members() {
//!         let fitness = score(genome.genes());
//!         population.add_member(&genome.to_weights(), fitness).unwrap();
//!     }
//!     population = population.next_generation(&mut rng).unwrap();
//! }
//!
//! assert_eq!(population.generation(), 21);
//! assert_eq!(population.len(), 100);
//! ```
mod genome;
mod populations;
mod rng;

pub use genome::{
    point_mutation, Fitness, Genome, MutationError, MUTATION_FACTOR_MAX, MUTATION_FACTOR_MIN,
};
pub use populations::{
    logging, EvolutionConfig, Population, PopulationError, CROSSOVER_RATE, ELITISM_K,
    MUTATION_RATE, POP_SIZE,
};
