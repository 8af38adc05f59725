//! Genomes, populations and the generation step of the genetic algorithm.
//!
//! # Algorithm Overview
//!
//! 1. **Evaluate Fitness** - Every unscored genome plays the run's game sessions
//! 2. **Elite Selection** - The top genomes are copied into the next generation
//! 3. **Roulette Selection** - Parent pairs are drawn with replacement, with
//!    probability proportional to (adjusted) fitness
//! 4. **Crossover** - Single-point crossover produces two children per pair
//! 5. **Mutation** - Each child gets a few random nudges
//!
//! # Parallelization
//!
//! Fitness evaluation runs one scoped thread per genome. Each thread owns its player
//! and plays on its own copies of the starting boards, so nothing is shared mutably.

use std::thread;

use blockfall_engine::Board;
use blockfall_evaluator::{HeuristicEvaluator, LookaheadPlayer, WeightVector, play_session};
use rand::{Rng, distr::Distribution as _, distr::weighted::WeightedIndex};
use serde::{Deserialize, Serialize};

use crate::{TrainingError, config::NegativeFitnessPolicy, weights};

/// A candidate weight vector and its most recent fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    weights: WeightVector,
    fitness: Option<f64>,
}

impl Genome {
    /// Creates an unscored genome.
    #[must_use]
    pub fn new(weights: WeightVector) -> Self {
        Self {
            weights,
            fitness: None,
        }
    }

    #[must_use]
    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    /// Mean game score, `None` before the genome has been evaluated.
    #[must_use]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    fn sort_key(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }
}

/// Plays every board to the end with a lookahead player and returns the mean score.
///
/// # Panics
///
/// Panics if `boards` is empty.
#[must_use]
pub fn mean_session_score(evaluator: HeuristicEvaluator, boards: &[Board], max_pieces: usize) -> f64 {
    assert!(!boards.is_empty());
    let mut player = LookaheadPlayer::new(evaluator);
    #[expect(clippy::cast_precision_loss)]
    let total = boards
        .iter()
        .map(|board| play_session(&mut board.clone(), &mut player, max_pieces).score as f64)
        .sum::<f64>();
    #[expect(clippy::cast_precision_loss)]
    let count = boards.len() as f64;
    total / count
}

/// An ordered collection of genomes, sorted best-first after evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    genomes: Vec<Genome>,
}

impl Population {
    /// Creates `count` genomes by adding `U(-noise, noise)` to each coefficient of
    /// `baseline`.
    #[must_use]
    pub fn perturbed<R>(baseline: &WeightVector, count: usize, noise: f64, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let genomes = (0..count)
            .map(|_| {
                Genome::new(weights::perturbed(baseline.as_slice(), noise, rng).into())
            })
            .collect();
        Self { genomes }
    }

    #[must_use]
    pub fn from_genomes(genomes: Vec<Genome>) -> Self {
        Self { genomes }
    }

    #[must_use]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    #[must_use]
    pub fn best(&self) -> Option<&Genome> {
        self.genomes.first()
    }

    /// Scores every genome that has no fitness yet, then sorts by fitness descending.
    ///
    /// Each genome plays a copy of every board in `boards` for at most `max_pieces`
    /// pieces. Scored genomes (the elites of the previous generation) keep their
    /// fitness, which is what they would score again since games are deterministic.
    pub fn evaluate_fitness(
        &mut self,
        boards: &[Board],
        max_pieces: usize,
    ) -> Result<(), TrainingError> {
        let jobs = self
            .genomes
            .iter_mut()
            .filter(|genome| genome.fitness.is_none())
            .map(|genome| {
                let evaluator = HeuristicEvaluator::with_default_features(genome.weights.clone())?;
                Ok::<_, TrainingError>((genome, evaluator))
            })
            .collect::<Result<Vec<_>, _>>()?;

        thread::scope(|s| {
            for (genome, evaluator) in jobs {
                s.spawn(move || {
                    let fitness = mean_session_score(evaluator, boards, max_pieces);
                    tracing::debug!(fitness, weights = %genome.weights, "evaluated genome");
                    genome.fitness = Some(fitness);
                });
            }
        });

        // sort by fitness descending
        self.genomes
            .sort_by(|a, b| b.sort_key().total_cmp(&a.sort_key()));
        Ok(())
    }

    /// Fitness of every scored genome, in population order.
    pub fn fitness_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.genomes.iter().filter_map(Genome::fitness)
    }
}

/// Produces the next generation from an evaluated population.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Number of top genomes copied unchanged.
    pub elite_count: usize,
    /// Mutation attempts per child.
    pub mutation_attempts: usize,
    /// Probability that a mutation attempt changes its coefficient.
    pub mutation_probability: f64,
    /// Half-width of the uniform mutation step.
    pub mutation_range: f64,
    pub negative_fitness: NegativeFitnessPolicy,
}

impl PopulationEvolver {
    /// Creates the next generation with the same size as `population`.
    ///
    /// Elites are the best `elite_count` genomes by fitness; unscored genomes rank last.
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Result<Population, TrainingError>
    where
        R: Rng + ?Sized,
    {
        let mut genomes = population.genomes.clone();
        genomes.sort_by(|a, b| b.sort_key().total_cmp(&a.sort_key()));
        let genomes = genomes.as_slice();

        let mut next_genomes = Vec::with_capacity(genomes.len() + 1);
        next_genomes.extend(genomes.iter().take(self.elite_count).cloned());

        let fitness: Vec<_> = genomes.iter().map(|g| g.fitness.unwrap_or(0.0)).collect();
        let selection = WeightedIndex::new(self.negative_fitness.selection_weights(&fitness)).ok();

        while next_genomes.len() < genomes.len() {
            let p1 = roulette_select(genomes, selection.as_ref(), rng);
            let p2 = roulette_select(genomes, selection.as_ref(), rng);
            let (mut child_a, mut child_b) = weights::single_point_crossover(
                p1.weights.as_slice(),
                p2.weights.as_slice(),
                rng,
            )?;
            for child in [&mut child_a, &mut child_b] {
                weights::mutate(
                    child,
                    self.mutation_attempts,
                    self.mutation_probability,
                    self.mutation_range,
                    rng,
                );
            }
            next_genomes.push(Genome::new(child_a.into()));
            next_genomes.push(Genome::new(child_b.into()));
        }
        next_genomes.truncate(genomes.len());

        Ok(Population {
            genomes: next_genomes,
        })
    }
}

/// Draws one genome with probability proportional to its selection weight.
///
/// Falls back to a uniform draw when no genome has a positive weight.
fn roulette_select<'a, R>(
    genomes: &'a [Genome],
    selection: Option<&WeightedIndex<f64>>,
    rng: &mut R,
) -> &'a Genome
where
    R: Rng + ?Sized,
{
    let index = match selection {
        Some(selection) => selection.sample(rng),
        None => rng.random_range(0..genomes.len()),
    };
    &genomes[index]
}

#[cfg(test)]
mod tests {
    use blockfall_engine::PieceSeed;
    use blockfall_evaluator::SessionConfig;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn scored(weights: Vec<f64>, fitness: f64) -> Genome {
        Genome {
            weights: weights.into(),
            fitness: Some(fitness),
        }
    }

    fn evolver() -> PopulationEvolver {
        PopulationEvolver {
            elite_count: 2,
            mutation_attempts: 1,
            mutation_probability: 0.5,
            mutation_range: 1.0,
            negative_fitness: NegativeFitnessPolicy::ClampToZero,
        }
    }

    #[test]
    fn test_perturbed_population() {
        let mut rng = Pcg32::seed_from_u64(0);
        let baseline = WeightVector::baseline();
        let population = Population::perturbed(&baseline, 18, 10.0, &mut rng);
        assert_eq!(population.genomes().len(), 18);
        for genome in population.genomes() {
            assert_eq!(genome.weights().len(), 7);
            assert_eq!(genome.fitness(), None);
        }
    }

    #[test]
    fn test_evolve_keeps_elites_and_size() {
        let mut rng = Pcg32::seed_from_u64(1);
        for size in [2, 5, 18] {
            let genomes = (0..size)
                .map(|i| scored(vec![f64::from(i); 7], f64::from(size - i)))
                .collect();
            let population = Population::from_genomes(genomes);
            let next = evolver().evolve(&population, &mut rng).unwrap();
            assert_eq!(next.genomes().len(), population.genomes().len());
            assert_eq!(&next.genomes()[..2], &population.genomes()[..2]);
            assert!(next.genomes()[2..].iter().all(|g| g.fitness().is_none()));
            assert!(next.genomes().iter().all(|g| g.weights().len() == 7));
        }
    }

    #[test]
    fn test_evolve_ranks_unsorted_population() {
        let mut rng = Pcg32::seed_from_u64(5);
        let population = Population::from_genomes(vec![
            scored(vec![1.0; 7], 10.0),
            Genome::new(WeightVector::new(vec![2.0; 7])),
            scored(vec![3.0; 7], 30.0),
            scored(vec![4.0; 7], 20.0),
        ]);
        let next = evolver().evolve(&population, &mut rng).unwrap();
        assert_eq!(next.genomes().len(), 4);
        assert_eq!(next.genomes()[0], population.genomes()[2]);
        assert_eq!(next.genomes()[1], population.genomes()[3]);
    }

    #[test]
    fn test_zero_fitness_falls_back_to_uniform_selection() {
        let mut rng = Pcg32::seed_from_u64(2);
        let genomes = (0..6).map(|i| scored(vec![f64::from(i); 3], -5.0)).collect();
        let population = Population::from_genomes(genomes);
        let next = evolver().evolve(&population, &mut rng).unwrap();
        assert_eq!(next.genomes().len(), 6);
    }

    #[test]
    fn test_mismatched_genomes_abort_reproduction() {
        let mut rng = Pcg32::seed_from_u64(3);
        let population = Population::from_genomes(vec![
            scored(vec![1.0; 7], 100.0),
            scored(vec![1.0; 6], 100.0),
            scored(vec![1.0; 7], 100.0),
        ]);
        let evolver = PopulationEvolver {
            elite_count: 0,
            ..evolver()
        };
        // drawing only matching pairs for many rounds is practically impossible
        let mismatch = (0..100).any(|_| {
            matches!(
                evolver.evolve(&population, &mut rng),
                Err(TrainingError::GenomeLengthMismatch { .. })
            )
        });
        assert!(mismatch);
    }

    #[test]
    fn test_evaluate_sorts_descending_and_skips_scored() {
        let session = SessionConfig {
            width: 6,
            height: 12,
            max_pieces: 15,
            ..SessionConfig::default()
        };
        let boards = vec![session.new_board(PieceSeed::from(4)).unwrap()];
        let mut population = Population::from_genomes(vec![
            Genome::new(WeightVector::new(vec![0.0; 7])),
            scored(vec![0.0; 7], 1e9),
            Genome::new(WeightVector::baseline()),
        ]);
        population.evaluate_fitness(&boards, session.max_pieces).unwrap();

        let fitness: Vec<_> = population.fitness_values().collect();
        assert_eq!(fitness.len(), 3);
        assert!(fitness.is_sorted_by(|a, b| a >= b));
        assert_eq!(population.best().and_then(Genome::fitness), Some(1e9));
    }

    #[test]
    fn test_evaluate_rejects_wrong_weight_count() {
        let boards = vec![Board::with_seed(10, 24, PieceSeed::from(0)).unwrap()];
        let mut population = Population::from_genomes(vec![Genome::new(vec![1.0; 3].into())]);
        assert!(matches!(
            population.evaluate_fitness(&boards, 10),
            Err(TrainingError::Evaluator(_))
        ));
    }
}
