//! The generation loop.
//!
//! ```text
//! Init → Evaluate → (Terminal | Select → Reproduce → Replace → Evaluate ...)
//! ```
//!
//! The run terminates when the best fitness reaches
//! [`fitness_limit`](EvolutionConfig::fitness_limit), when
//! [`generation_limit`](EvolutionConfig::generation_limit) reproduction steps have
//! been performed, or when the generation callback asks to stop.

use std::ops::ControlFlow;

use blockfall_engine::{Board, PieceSeed};
use blockfall_evaluator::WeightVector;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    EvolutionConfig, TrainingError,
    genetic::{Population, PopulationEvolver},
};

/// Summary of an evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Number of reproduction steps performed before this evaluation.
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub min_fitness: f64,
    pub best_weights: WeightVector,
}

impl GenerationReport {
    fn new(generation: usize, population: &Population) -> Option<Self> {
        let best = population.best()?;
        let fitness: Vec<_> = population.fitness_values().collect();
        #[expect(clippy::cast_precision_loss)]
        let mean_fitness = fitness.iter().sum::<f64>() / fitness.len() as f64;
        Some(Self {
            generation,
            best_fitness: best.fitness()?,
            mean_fitness,
            min_fitness: fitness.iter().copied().fold(f64::INFINITY, f64::min),
            best_weights: best.weights().clone(),
        })
    }
}

/// Final state of a run.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    /// Final population, sorted by fitness descending.
    pub population: Population,
    /// Number of reproduction steps performed.
    pub generation: usize,
}

/// Runs the genetic algorithm to completion.
pub fn run_evolution(config: &EvolutionConfig) -> Result<EvolutionOutcome, TrainingError> {
    run_evolution_with(config, |_| ControlFlow::Continue(()))
}

/// Runs the genetic algorithm, calling `on_generation` after every evaluation.
///
/// Returning [`ControlFlow::Break`] from the callback stops the run before the next
/// reproduction step; the outcome then holds the population that was just evaluated.
pub fn run_evolution_with<F>(
    config: &EvolutionConfig,
    mut on_generation: F,
) -> Result<EvolutionOutcome, TrainingError>
where
    F: FnMut(&GenerationReport) -> ControlFlow<()>,
{
    config.validate()?;

    let mut rng = Pcg32::seed_from_u64(config.seed);
    let boards = (0..config.games_per_genome)
        .map(|_| {
            let seed: PieceSeed = rng.random();
            config.session.new_board(seed)
        })
        .collect::<Result<Vec<Board>, _>>()
        .map_err(|e| TrainingError::invalid_config(e.to_string()))?;

    let evolver = PopulationEvolver {
        elite_count: config.elite_count,
        mutation_attempts: config.mutation_attempts,
        mutation_probability: config.mutation_probability,
        mutation_range: config.mutation_range,
        negative_fitness: config.negative_fitness,
    };
    let mut population = Population::perturbed(
        &config.baseline,
        config.population_size,
        config.initial_noise,
        &mut rng,
    );

    let mut generation = 0;
    loop {
        population.evaluate_fitness(&boards, config.session.max_pieces)?;

        let Some(report) = GenerationReport::new(generation, &population) else {
            break;
        };
        tracing::info!(
            generation,
            best = report.best_fitness,
            mean = report.mean_fitness,
            min = report.min_fitness,
            weights = %report.best_weights,
            "generation evaluated"
        );
        if on_generation(&report).is_break() {
            tracing::info!(generation, "evolution stopped by caller");
            break;
        }
        if report.best_fitness >= config.fitness_limit {
            tracing::info!(generation, "fitness limit reached");
            break;
        }
        if generation == config.generation_limit {
            break;
        }

        population = evolver.evolve(&population, &mut rng)?;
        generation += 1;
    }

    Ok(EvolutionOutcome {
        population,
        generation,
    })
}
