//! Genetic operators on raw weight vectors.
//!
//! - **Initialization**: [`perturbed`] adds uniform noise to a baseline vector
//! - **Crossover**: [`single_point_crossover`] swaps the tails of two parents
//! - **Mutation**: [`mutate`] nudges randomly chosen coefficients
//!
//! These operators are used by [`PopulationEvolver`](crate::genetic::PopulationEvolver).
//! All of them preserve vector length.

use rand::Rng;

use crate::TrainingError;

/// Creates a weight vector by applying a function to each index.
///
/// ```
/// use blockfall_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f64 + 1.0), 4);
/// assert_eq!(weights, vec![1.0, 0.5, 1.0 / 3.0, 0.25]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f64>
where
    F: FnMut(usize) -> f64,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Returns `base` with independent `U(-noise, noise)` noise added to each coefficient.
pub fn perturbed<R>(base: &[f64], noise: f64, rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    from_fn(|i| base[i] + rng.random_range(-noise..=noise), base.len())
}

/// Single-point crossover.
///
/// A split point `p` is drawn uniformly from `[1, L - 1]` and the children are
/// `a[..p] ++ b[p..]` and `b[..p] ++ a[p..]`. Vectors shorter than two coefficients
/// cannot be split and are returned as copies.
///
/// # Errors
///
/// Returns [`TrainingError::GenomeLengthMismatch`] if the parents differ in length.
pub fn single_point_crossover<R>(
    a: &[f64],
    b: &[f64],
    rng: &mut R,
) -> Result<(Vec<f64>, Vec<f64>), TrainingError>
where
    R: Rng + ?Sized,
{
    if a.len() != b.len() {
        return Err(TrainingError::GenomeLengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let len = a.len();
    if len < 2 {
        return Ok((a.to_vec(), b.to_vec()));
    }
    let p = rng.random_range(1..len);
    let child_a = a[..p].iter().chain(&b[p..]).copied().collect();
    let child_b = b[..p].iter().chain(&a[p..]).copied().collect();
    Ok((child_a, child_b))
}

/// Mutates `weights` in place.
///
/// Each of the `attempts` picks one index uniformly and, with probability
/// `probability`, adds `U(-range, range)` to that coefficient.
pub fn mutate<R>(weights: &mut [f64], attempts: usize, probability: f64, range: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    if weights.is_empty() {
        return;
    }
    for _ in 0..attempts {
        let index = rng.random_range(0..weights.len());
        if rng.random_bool(probability) {
            weights[index] += rng.random_range(-range..=range);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_perturbed_stays_within_noise() {
        let mut rng = Pcg32::seed_from_u64(1);
        let base = [1.0, -2.0, 30.0];
        let values = perturbed(&base, 10.0, &mut rng);
        assert_eq!(values.len(), 3);
        for (v, b) in values.iter().zip(base) {
            assert!((v - b).abs() <= 10.0);
        }
        assert_eq!(perturbed(&base, 0.0, &mut rng), base.to_vec());
    }

    #[test]
    fn test_crossover_swaps_tails() {
        let mut rng = Pcg32::seed_from_u64(2);
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [-1.0, -2.0, -3.0, -4.0];
        for _ in 0..20 {
            let (x, y) = single_point_crossover(&a, &b, &mut rng).unwrap();
            let p = x.iter().position(|v| *v < 0.0).unwrap();
            assert!((1..4).contains(&p));
            assert_eq!(&x[..p], &a[..p]);
            assert_eq!(&x[p..], &b[p..]);
            assert_eq!(&y[..p], &b[..p]);
            assert_eq!(&y[p..], &a[p..]);
        }
    }

    #[test]
    fn test_crossover_of_short_vectors_copies() {
        let mut rng = Pcg32::seed_from_u64(3);
        let (x, y) = single_point_crossover(&[1.0], &[2.0], &mut rng).unwrap();
        assert_eq!((x, y), (vec![1.0], vec![2.0]));
    }

    #[test]
    fn test_crossover_rejects_mismatched_lengths() {
        let mut rng = Pcg32::seed_from_u64(4);
        let err = single_point_crossover(&[1.0; 7], &[1.0; 6], &mut rng).unwrap_err();
        assert!(matches!(
            err,
            TrainingError::GenomeLengthMismatch { left: 7, right: 6 }
        ));
    }

    #[test]
    fn test_mutate_changes_at_most_attempts_coefficients() {
        let mut rng = Pcg32::seed_from_u64(5);
        let original = vec![0.0; 7];
        for _ in 0..50 {
            let mut weights = original.clone();
            mutate(&mut weights, 1, 0.5, 1.0, &mut rng);
            let changed = weights.iter().filter(|w| **w != 0.0).count();
            assert!(changed <= 1);
            assert!(weights.iter().all(|w| w.abs() <= 1.0));
        }

        let mut weights = original.clone();
        mutate(&mut weights, 3, 0.0, 1.0, &mut rng);
        assert_eq!(weights, original);
    }
}
