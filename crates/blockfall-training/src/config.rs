//! Run configuration of the evolutionary optimizer.
//!
//! Every field has a default, so a JSON configuration file only needs the values it
//! changes.

use blockfall_engine::Board;
use blockfall_evaluator::{HeuristicEvaluator, SessionConfig, WeightVector};
use serde::{Deserialize, Serialize};

use crate::TrainingError;

/// Seed vector of the initial population: weights previously found by evolution,
/// expressed in the evaluator's sign convention.
pub const EVOLVED_BASELINE: [f64; 7] = [
    19.916_366_988_549_214,
    0.270_260_295_117_916_27,
    1.539_239_609_361_963_4,
    0.787_585_417_651_552_9,
    3.774_702_054_688_445_3,
    100.765_552_877_960_35,
    0.424_463_414_128_100_96,
];

/// How negative fitness values enter fitness-proportionate selection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeFitnessPolicy {
    /// Negative fitness counts as zero.
    #[default]
    ClampToZero,
    /// Every fitness is shifted by the population minimum, so the worst genome has
    /// weight zero.
    ShiftByMinimum,
}

impl NegativeFitnessPolicy {
    /// Converts fitness values into non-negative selection weights.
    #[must_use]
    pub fn selection_weights(self, fitness: &[f64]) -> Vec<f64> {
        match self {
            NegativeFitnessPolicy::ClampToZero => {
                fitness.iter().map(|f| f.max(0.0)).collect()
            }
            NegativeFitnessPolicy::ShiftByMinimum => {
                let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
                fitness.iter().map(|f| f - min).collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Number of genomes in every generation.
    pub population_size: usize,
    /// The run stops once the best fitness reaches this value.
    pub fitness_limit: f64,
    /// Maximum number of reproduction steps.
    pub generation_limit: usize,
    /// Genomes copied unchanged into the next generation.
    pub elite_count: usize,
    /// Sessions played per genome; fitness is their mean score.
    pub games_per_genome: usize,
    /// Half-width of the uniform noise added to the baseline at initialization.
    pub initial_noise: f64,
    pub mutation_attempts: usize,
    pub mutation_probability: f64,
    /// Half-width of the uniform mutation step.
    pub mutation_range: f64,
    pub negative_fitness: NegativeFitnessPolicy,
    pub baseline: WeightVector,
    /// Seed of the run RNG. Game seeds, initial noise and genetic operators all draw
    /// from it, so a run is reproducible.
    pub seed: u64,
    pub session: SessionConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 18,
            fitness_limit: 21_000.0,
            generation_limit: 100,
            elite_count: 2,
            games_per_genome: 1,
            initial_noise: 10.0,
            mutation_attempts: 1,
            mutation_probability: 0.5,
            mutation_range: 1.0,
            negative_fitness: NegativeFitnessPolicy::default(),
            baseline: WeightVector::new(EVOLVED_BASELINE.to_vec()),
            seed: 0,
            session: SessionConfig::default(),
        }
    }
}

impl EvolutionConfig {
    #[must_use]
    pub fn new(population_size: usize, fitness_limit: f64, generation_limit: usize) -> Self {
        Self {
            population_size,
            fitness_limit,
            generation_limit,
            ..Self::default()
        }
    }

    /// Checks that the configuration describes a runnable evolution.
    pub fn validate(&self) -> Result<(), TrainingError> {
        if self.population_size == 0 {
            return Err(TrainingError::invalid_config("population size must be positive"));
        }
        if self.games_per_genome == 0 {
            return Err(TrainingError::invalid_config(
                "games per genome must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(TrainingError::invalid_config(format!(
                "mutation probability {} is outside [0, 1]",
                self.mutation_probability
            )));
        }
        for (name, value) in [
            ("initial noise", self.initial_noise),
            ("mutation range", self.mutation_range),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TrainingError::invalid_config(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }
        if self.fitness_limit.is_nan() {
            return Err(TrainingError::invalid_config("fitness limit is NaN"));
        }
        Board::new(self.session.width, self.session.height)
            .map_err(|e| TrainingError::invalid_config(e.to_string()))?;
        HeuristicEvaluator::with_default_features(self.baseline.clone())?;
        Ok(())
    }
}
