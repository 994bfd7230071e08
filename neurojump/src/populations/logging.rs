use super::Population;

use crate::genome::{Fitness, Genome};

use std::cmp::Ordering;
use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones the population champion.
    Champion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of an evaluated generation.
#[derive(Clone, Debug)]
pub struct GenerationLog<G> {
    pub generation: usize,
    pub population_size: usize,
    pub total_fitness: u64,
    pub best_fitness: Fitness,
    pub fitness: Stats,
    pub champion: Option<G>,
}

impl<G> fmt::Display for GenerationLog<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GenerationLog {{\n\
            \tgeneration: {}\n\
            \tpopulation_size: {}\n\
            \ttotal_fitness: {}\n\
            \tbest_fitness: {}\n\
            \tfitness: {:?}\n\
            }}",
            self.generation,
            self.population_size,
            self.total_fitness,
            self.best_fitness,
            self.fitness,
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    /// An empty sequence yields all zeros.
    ///
    /// # Examples
    /// ```
    /// use neurojump::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied());
    /// assert_eq!(stats.median, 2.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Stats {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return Stats::default();
        }
        let (mut max, mut min, mut sum) = (f32::MIN, f32::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / data.len() as f32;

        data.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };

        Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        }
    }
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<GenerationLog<G>>,
}

impl<G: Genome> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Stores a snapshot of an evaluated population,
    /// and returns it.
    pub fn log(&mut self, population: &Population<G>) -> &GenerationLog<G> {
        let members = population.members();
        let total_fitness = members.iter().map(|g| u64::from(g.fitness())).sum();
        let champion = population.champion();

        self.logs.push(GenerationLog {
            generation: population.generation(),
            population_size: members.len(),
            total_fitness,
            best_fitness: champion.map_or(0, |g| g.fitness()),
            fitness: Stats::from(members.iter().map(|g| g.fitness() as f32)),
            champion: match self.reporting_level {
                ReportingLevel::Champion => champion.cloned(),
                ReportingLevel::NoGenomes => None,
            },
        });
        &self.logs[self.logs.len() - 1]
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationLog<G>> {
        self.logs.iter()
    }

    /// Returns the most recent snapshot.
    pub fn latest(&self) -> Option<&GenerationLog<G>> {
        self.logs.last()
    }

    /// Best fitness ever logged.
    pub fn high_score(&self) -> Fitness {
        self.logs.iter().map(|l| l.best_fitness).max().unwrap_or(0)
    }

    /// Mean fitness per member, across every logged generation.
    pub fn average_fitness(&self) -> f64 {
        let (fitness, members) = self.logs.iter().fold((0u64, 0usize), |(f, m), l| {
            (f + l.total_fitness, m + l.population_size)
        });
        if members == 0 {
            0.0
        } else {
            fitness as f64 / members as f64
        }
    }
}
