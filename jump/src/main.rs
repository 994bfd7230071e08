mod config;
mod course;

use config::JumpConfig;

use neurojump::logging::{EvolutionLogger, ReportingLevel};
use neurojump::{Fitness, Population};
use neurojump_nn::agent::JumpAgent;
use neurojump_nn::genomics::{Individual, Snapshot};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jump")]
#[command(version)]
#[command(about = "Evolves neural networks playing a side-scrolling jump game")]
struct Args {
    /// Number of generations to play
    #[arg(short, long, default_value = "50")]
    generations: usize,

    /// RON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed of every random choice of the run
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Saved generation (JSON or RON) to start from
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Number of the first generation bred from the snapshot
    #[arg(long, default_value = "1", requires = "snapshot")]
    start_generation: usize,

    /// Where to save the last played generation (JSON or RON)
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => JumpConfig::from_file(path)?,
        None => JumpConfig::default(),
    };
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let (mut population, mut agents) = match &args.snapshot {
        Some(path) => seeded_generation(path, args.start_generation, &config, &mut rng)?,
        None => first_generation(&config, &mut rng)?,
    };
    let mut logger = EvolutionLogger::new(ReportingLevel::Champion);

    for i in 0..args.generations {
        let scores = run_generation(&mut agents, &config, rng.gen())?;
        for (agent, score) in agents.iter().zip(scores) {
            population.add_member(&agent.weights(), score)?;
        }

        let (generation, best, mean) = {
            let log = logger.log(&population);
            (log.generation, log.best_fitness, log.fitness.mean)
        };
        log::info!(
            "generation {}: best score {}, mean score {:.2}, high score {}",
            generation,
            best,
            mean,
            logger.high_score()
        );

        if i + 1 == args.generations {
            break;
        }
        let mut next = population.next_generation(&mut rng)?;
        agents = spawn_agents(next.take_members(), &config)?;
        population = next;
    }

    if let Some(log) = logger.latest() {
        log::debug!("{}", log);
    }
    log::info!(
        "played {} generations, high score {}, average fitness {:.2}",
        logger.iter().count(),
        logger.high_score(),
        logger.average_fitness()
    );

    if let Some(path) = &args.save {
        save_snapshot(&Snapshot::from_population(&population), path)?;
        log::info!("saved generation {} to {}", population.generation(), path.display());
    }
    Ok(())
}

/// Breeds the first generation from individuals with
/// random genes, so that output weights start non-zero.
fn first_generation(
    config: &JumpConfig,
    rng: &mut ChaCha8Rng,
) -> Result<(Population<Individual>, Vec<JumpAgent>)> {
    let range = config.initial_gene_range;
    let seeds = (0..config.evolution.size.get())
        .map(|_| {
            let genes = (0..Individual::SIZE)
                .map(|_| rng.gen_range(-range..=range))
                .collect();
            Individual::from_genes(genes, 0)
        })
        .collect::<Result<Vec<_>, _>>()?;
    breed(Population::new_seeded(seeds, config.evolution.clone(), 1), config, rng)
}

/// Breeds generation `generation` from a saved one.
fn seeded_generation(
    path: &Path,
    generation: usize,
    config: &JumpConfig,
    rng: &mut ChaCha8Rng,
) -> Result<(Population<Individual>, Vec<JumpAgent>)> {
    let snapshot = load_snapshot(path)?;
    let seeded = snapshot
        .seed(config.evolution.clone(), generation, config.seed_limit)
        .with_context(|| format!("invalid snapshot {}", path.display()))?;
    log::info!(
        "seeding generation {} from {} saved individuals",
        generation,
        seeded.len()
    );
    breed(seeded, config, rng)
}

/// Runs a seeded population through one generation
/// cycle, returning the empty bred population and
/// the agents playing its members.
fn breed(
    mut seeded: Population<Individual>,
    config: &JumpConfig,
    rng: &mut ChaCha8Rng,
) -> Result<(Population<Individual>, Vec<JumpAgent>)> {
    let mut population = seeded.next_generation(rng)?;
    let agents = spawn_agents(population.take_members(), config)?;
    Ok((population, agents))
}

fn spawn_agents(individuals: Vec<Individual>, config: &JumpConfig) -> Result<Vec<JumpAgent>> {
    let agents = individuals
        .iter()
        .map(|individual| JumpAgent::with_genome(config.structure.clone(), individual))
        .collect::<Result<_, _>>()?;
    Ok(agents)
}

/// Plays every agent on the same course, in parallel,
/// returning their scores in order.
fn run_generation(
    agents: &mut [JumpAgent],
    config: &JumpConfig,
    course_seed: u64,
) -> Result<Vec<Fitness>> {
    let scores = agents
        .par_iter_mut()
        .map(|agent| course::play(agent, course_seed, config.max_score, config.max_steps))
        .collect::<Result<_, _>>()?;
    Ok(scores)
}

fn is_ron(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "ron")
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot: Snapshot = if is_ron(path) {
        ron::from_str(&text).with_context(|| format!("malformed snapshot {}", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("malformed snapshot {}", path.display()))?
    };
    Ok(snapshot)
}

fn save_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let text = if is_ron(path) {
        ron::to_string(snapshot)?
    } else {
        serde_json::to_string(snapshot)?
    };
    std::fs::write(path, text).with_context(|| format!("failed to write snapshot {}", path.display()))
}
