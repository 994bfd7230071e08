use super::*;
use crate::rng::chance;

/// Auxiliary type for offspring generation.
/// Handles all the tasks of breeding a population's
/// next generation according to its config.
pub(super) struct OffspringFactory<'a, G> {
    population: &'a Population<G>,
    champion: &'a G,
}

impl<'a, G: Genome> OffspringFactory<'a, G> {
    pub(super) fn new(population: &'a Population<G>, champion: &'a G) -> OffspringFactory<'a, G> {
        OffspringFactory {
            population,
            champion,
        }
    }

    /// Generate a full generation of offspring.
    pub(super) fn generate_offspring<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<G> {
        let size = self.population.config.size.get();
        let mut offspring = Vec::with_capacity(size + 1);

        self.add_elite(&mut offspring);
        while offspring.len() < size {
            let (first, second) = self.breed_pair(rng);
            offspring.push(first);
            offspring.push(second);
        }
        // Pairs may overshoot by one.
        offspring.truncate(size);
        offspring
    }

    /// Add copies of the champion to the offspring.
    fn add_elite(&self, offspring: &mut Vec<G>) {
        let elite = self.population.config.elitism;
        offspring.extend(std::iter::repeat(self.champion).take(elite).cloned());
    }

    /// Choose two parents by weighted selection,
    /// optionally replace them by their crossover
    /// children, and optionally mutate each.
    fn breed_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> (G, G) {
        let config = &self.population.config;
        let mut pair = (self.select_parent(rng), self.select_parent(rng));

        if chance(rng, config.crossover_chance) {
            pair = Population::crossover(&pair.0, &pair.1, rng);
        }
        for child in [&mut pair.0, &mut pair.1] {
            if chance(rng, config.mutation_chance) {
                if let Err(e) = child.mutate(rng) {
                    log::warn!("skipped mutation: {}", e);
                }
            }
        }
        pair
    }

    fn select_parent<R: Rng + ?Sized>(&self, rng: &mut R) -> G {
        self.population
            .weighted_selection(rng)
            .unwrap_or(self.champion)
            .clone()
    }
}
