use std::{collections::BTreeMap, iter};

use blockfall_evaluator::board_feature::{self, BoardFeature as _};
use blockfall_training::{EvolutionConfig, Genome, GenerationReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a `train-ai` run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingReport {
    pub trained_at: DateTime<Utc>,
    pub config: EvolutionConfig,
    /// Reproduction steps performed.
    pub generations: usize,
    pub best_fitness: Option<f64>,
    /// Weights of the best genome keyed by feature id.
    pub best_weights: BTreeMap<String, f64>,
    pub history: Vec<GenerationReport>,
    /// Final population, best first.
    pub population: Vec<Genome>,
}

impl TrainingReport {
    pub fn new(
        config: EvolutionConfig,
        generations: usize,
        history: Vec<GenerationReport>,
        population: Vec<Genome>,
    ) -> Self {
        let best = population.first();
        let features = board_feature::default_board_features();
        let best_weights = best
            .map(|genome| {
                iter::zip(&features, genome.weights().as_slice())
                    .map(|(f, w)| (f.id().to_owned(), *w))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            trained_at: Utc::now(),
            best_fitness: best.and_then(Genome::fitness),
            config,
            generations,
            best_weights,
            history,
            population,
        }
    }
}
