//! Offline tuning of the evaluator weights with a genetic algorithm.
//!
//! # How Training Works
//!
//! 1. **Init** - Perturb the evolved baseline weights into a population of genomes
//! 2. **Evaluate** - Each genome plays full game sessions with a lookahead player
//!    over its weights; fitness is the mean game score
//! 3. **Select** - The best genomes survive unchanged; parent pairs are drawn with
//!    probability proportional to fitness
//! 4. **Reproduce** - Single-point crossover followed by mutation
//! 5. **Repeat** - Until the fitness limit or the generation limit is reached
//!
//! # Architecture
//!
//! ```text
//! run_evolution (generation loop)
//!     ↓ evolves
//! Population of Genomes (weight vectors + fitness)
//!     ↓ each played by
//! LookaheadPlayer (blockfall-evaluator)
//!     ↓ in
//! play_session (fitness = cumulative game score)
//! ```
//!
//! # Example
//!
//! ```
//! use blockfall_training::{EvolutionConfig, run_evolution};
//!
//! let mut config = EvolutionConfig::new(4, 21_000.0, 0);
//! config.session.max_pieces = 5;
//! let outcome = run_evolution(&config).unwrap();
//! assert_eq!(outcome.generation, 0);
//! assert_eq!(outcome.population.genomes().len(), 4);
//! ```

use blockfall_evaluator::EvaluatorError;

pub use self::{
    config::{EVOLVED_BASELINE, EvolutionConfig, NegativeFitnessPolicy},
    evolution::{EvolutionOutcome, GenerationReport, run_evolution, run_evolution_with},
    genetic::{Genome, Population, PopulationEvolver},
};

pub mod config;
pub mod evolution;
pub mod genetic;
pub mod weights;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingError {
    #[display("genome length mismatch: {left} vs {right}")]
    GenomeLengthMismatch { left: usize, right: usize },
    #[display("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
    #[display("evaluator error: {_0}")]
    #[from]
    Evaluator(EvaluatorError),
}

impl TrainingError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
