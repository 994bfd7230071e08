//! A Population is an ordered collection of genomes
//! gathered over one generation. The next generation
//! is bred from it through elitism, fitness-weighted
//! selection, single-point crossover and point mutation.
mod config;
mod errors;
pub mod logging;
mod offspring_factory;

use crate::{Fitness, Genome};
pub use config::{EvolutionConfig, CROSSOVER_RATE, ELITISM_K, MUTATION_RATE, POP_SIZE};
pub use errors::PopulationError;
use offspring_factory::OffspringFactory;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A generation of genomes.
///
/// Members are kept in insertion order; fitness
/// order is only ever computed on demand.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Population<G> {
    members: Vec<G>,
    total_fitness: u64,
    generation: usize,
    config: EvolutionConfig,
}

impl<G: Genome> Population<G> {
    /// Creates an empty population for the first generation.
    /// Generations are numbered from 1.
    pub fn new(config: EvolutionConfig) -> Population<G> {
        Population {
            members: vec![],
            total_fitness: 0,
            generation: 1,
            config,
        }
    }

    /// Creates a population from previously saved genomes,
    /// standing in for the generation _preceding_ `generation`.
    /// A single call to [`next_generation`] on the result
    /// yields generation `generation`.
    ///
    /// [`next_generation`]: Population::next_generation
    pub fn new_seeded(genomes: Vec<G>, config: EvolutionConfig, generation: usize) -> Population<G> {
        log::trace!(
            "seeding generation {} from {} genomes",
            generation,
            genomes.len()
        );
        Population {
            members: genomes,
            total_fitness: 0,
            generation: generation.saturating_sub(1),
            config,
        }
    }

    /// Appends a genome to the population.
    pub fn add(&mut self, genome: G) {
        self.members.push(genome);
    }

    /// Encodes a layered representation into a genome
    /// with the given fitness, and appends it.
    ///
    /// # Errors
    /// Returns the genome's encoding error if `weights`
    /// does not fit the genome layout. The population is
    /// left unchanged.
    pub fn add_member(&mut self, weights: &G::Weights, fitness: Fitness) -> Result<(), G::Error> {
        self.members.push(G::from_weights(weights, fitness)?);
        Ok(())
    }

    /// Recomputes, caches and returns the sum
    /// of all members' fitnesses.
    pub fn evaluate(&mut self) -> u64 {
        self.total_fitness = self.members.iter().map(|g| u64::from(g.fitness())).sum();
        self.total_fitness
    }

    /// Returns the total fitness computed by the
    /// last call to [`evaluate`].
    ///
    /// [`evaluate`]: Population::evaluate
    pub fn total_fitness(&self) -> u64 {
        self.total_fitness
    }

    /// Returns the fittest member. If every member has
    /// zero fitness there is nothing to discriminate on,
    /// and a uniformly random member is returned instead.
    ///
    /// Returns `None` if the population is empty.
    pub fn find_best_individual<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&G> {
        let best = self.best_index(rng)?;
        self.members.get(best)
    }

    /// Returns the first member with maximal fitness,
    /// or `None` if the population is empty.
    pub fn champion(&self) -> Option<&G> {
        self.champion_index().map(|i| &self.members[i])
    }

    /// Selects a member with probability proportional to
    /// its fitness plus one, so that zero-fitness members
    /// remain selectable.
    ///
    /// Returns `None` if the population is empty.
    pub fn weighted_selection<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&G> {
        self.selection_index(rng).map(|i| &self.members[i])
    }

    /// Recombines two parents around a uniformly chosen
    /// break point in `[1, len - 1]`, as in [`crossover_at`].
    ///
    /// [`crossover_at`]: Population::crossover_at
    pub fn crossover<R: Rng + ?Sized>(first: &G, second: &G, rng: &mut R) -> (G, G) {
        let len = first.genes().len().min(second.genes().len());
        let point = rng.gen_range(1..len.max(2));
        Self::crossover_at(first, second, point)
    }

    /// Recombines two parents around break point `point`.
    ///
    /// The first child takes `first`'s genes before index
    /// `point - 1` and `second`'s genes from `point - 1` on;
    /// the second child is its mirror image. Both children
    /// start with zero fitness.
    pub fn crossover_at(first: &G, second: &G, point: usize) -> (G, G) {
        let split = point.saturating_sub(1);
        let (mut left, mut right) = (first.clone(), second.clone());
        for (l, r) in left
            .genes_mut()
            .iter_mut()
            .zip(right.genes_mut().iter_mut())
            .skip(split)
        {
            std::mem::swap(l, r);
        }
        left.set_fitness(0);
        right.set_fitness(0);
        (left, right)
    }

    /// Breeds the next generation.
    ///
    /// The fittest member (see [`find_best_individual`]) is
    /// copied [`elitism`] times; the rest of the generation is
    /// filled with pairs of weighted-selected parents, which
    /// are replaced by their crossover children with
    /// [`crossover_chance`] and then each mutated with
    /// [`mutation_chance`]. The result holds exactly [`size`]
    /// members; members of this population are never modified.
    ///
    /// # Errors
    /// Returns an error if the population is empty.
    ///
    /// [`find_best_individual`]: Population::find_best_individual
    /// [`elitism`]: EvolutionConfig::elitism
    /// [`crossover_chance`]: EvolutionConfig::crossover_chance
    /// [`mutation_chance`]: EvolutionConfig::mutation_chance
    /// [`size`]: EvolutionConfig::size
    pub fn next_generation<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Population<G>, PopulationError> {
        let champion = self
            .best_index(rng)
            .ok_or(PopulationError::EmptyPopulation)?;
        let members = OffspringFactory::new(self, &self.members[champion]).generate_offspring(rng);

        log::debug!(
            "bred generation {} from {} genomes (total fitness {}, champion fitness {})",
            self.generation + 1,
            self.members.len(),
            self.total_fitness,
            self.members[champion].fitness()
        );

        Ok(Population {
            members,
            total_fitness: 0,
            generation: self.generation + 1,
            config: self.config.clone(),
        })
    }

    /// Removes and returns all members, keeping the
    /// generation number and configuration.
    pub fn take_members(&mut self) -> Vec<G> {
        self.total_fitness = 0;
        std::mem::take(&mut self.members)
    }

    /// Returns the population's members in insertion order.
    pub fn members(&self) -> &[G] {
        &self.members
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the population has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population's configuration.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    fn best_index<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.evaluate() == 0 {
            return self.random_index(rng);
        }
        self.champion_index()
    }

    fn champion_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, genome) in self.members.iter().enumerate() {
            // Strict comparison: the first maximal member wins ties.
            if best.map_or(true, |b| genome.fitness() > self.members[b].fitness()) {
                best = Some(i);
            }
        }
        best
    }

    fn selection_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let tickets: u64 = self.members.iter().map(tickets_held).sum();
        if tickets == 0 {
            return self.random_index(rng);
        }
        let mut ticket = rng.gen_range(0..tickets);
        for (i, genome) in self.members.iter().enumerate() {
            let held = tickets_held(genome);
            if ticket < held {
                return Some(i);
            }
            ticket -= held;
        }
        self.members.len().checked_sub(1)
    }

    fn random_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let len = self.members.len();
        (len > 0).then(|| rng.gen_range(0..len))
    }
}

/// Number of selection tickets a genome holds: one
/// per fitness point, plus one.
fn tickets_held<G: Genome>(genome: &G) -> u64 {
    u64::from(genome.fitness()) + 1
}
