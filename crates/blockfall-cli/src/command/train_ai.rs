use std::{ops::ControlFlow, path::PathBuf};

use anyhow::Context as _;
use blockfall_training::{EvolutionConfig, run_evolution_with};

use crate::{model::training_report::TrainingReport, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainAiArg {
    /// JSON file with the evolution configuration; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of genomes per generation
    #[arg(long)]
    population_size: Option<usize>,
    /// Maximum number of generations
    #[arg(long)]
    generations: Option<usize>,
    /// Stop once the best fitness reaches this score
    #[arg(long)]
    fitness_limit: Option<f64>,
    /// Games played by each genome per evaluation
    #[arg(long)]
    games_per_genome: Option<usize>,
    /// Pieces per game before the session is cut off
    #[arg(long)]
    max_pieces: Option<usize>,
    /// Seed of the run
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TrainAiArg {
    fn load_config(&self) -> anyhow::Result<EvolutionConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("evolution config", path)?,
            None => EvolutionConfig::default(),
        };
        if let Some(population_size) = self.population_size {
            config.population_size = population_size;
        }
        if let Some(generations) = self.generations {
            config.generation_limit = generations;
        }
        if let Some(fitness_limit) = self.fitness_limit {
            config.fitness_limit = fitness_limit;
        }
        if let Some(games) = self.games_per_genome {
            config.games_per_genome = games;
        }
        if let Some(max_pieces) = self.max_pieces {
            config.session.max_pieces = max_pieces;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

pub(crate) fn run(arg: &TrainAiArg) -> anyhow::Result<()> {
    let config = arg.load_config()?;
    config.validate().context("Invalid evolution config")?;
    tracing::info!(
        population = config.population_size,
        generations = config.generation_limit,
        fitness_limit = config.fitness_limit,
        seed = config.seed,
        "starting evolution"
    );

    let mut history = vec![];
    let outcome = run_evolution_with(&config, |report| {
        history.push(report.clone());
        ControlFlow::Continue(())
    })
    .context("Evolution failed")?;

    let report = TrainingReport::new(
        config,
        outcome.generation,
        history,
        outcome.population.genomes().to_vec(),
    );
    util::write_json(&report, arg.output.as_deref())?;

    tracing::info!(
        generations = report.generations,
        best_fitness = ?report.best_fitness,
        "evolution completed"
    );
    if let Some(path) = &arg.output {
        tracing::info!(path = %path.display(), "report saved");
    }
    Ok(())
}
