/* src/generator.rs */
//! Random index-vector synthesis.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use std::collections::HashSet;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    config::GeneratorConfig,
    error::{HoloIndexError, Result},
    vector::{IndexVector, TernaryVector},
};

/// Produces fresh index vectors of a fixed dimensionality.
#[derive(Clone, Debug)]
pub enum VectorGenerator {
    /// Sparse ±1 vectors with `bits_to_set ± variance` non-zero entries.
    Ternary {
        /// Dimensionality `N`
        dimensions: usize,
        /// Target non-zero count `k`
        bits_to_set: usize,
        /// Maximum deviation from `k`
        variance: usize,
    },
    /// Dense vectors with i.i.d. N(0, σ²) components.
    Gaussian {
        /// Dimensionality `N`
        dimensions: usize,
        /// Component distribution
        normal: Normal<f64>,
    },
}

impl VectorGenerator {
    /// Builds a generator, rejecting parameters that could never produce a valid vector.
    pub fn new(dimensions: usize, config: &GeneratorConfig) -> Result<Self> {
        if dimensions == 0 {
            return Err(HoloIndexError::config("dimensions must be positive"));
        }
        match *config {
            GeneratorConfig::Ternary { bits_to_set, variance } => {
                if bits_to_set == 0 {
                    return Err(HoloIndexError::config("bits_to_set must be positive"));
                }
                if bits_to_set.checked_add(variance).map_or(true, |total| total > dimensions) {
                    return Err(HoloIndexError::config(format!(
                        "cannot set {bits_to_set} ± {variance} entries in a {dimensions}-dimensional vector"
                    )));
                }
                Ok(VectorGenerator::Ternary { dimensions, bits_to_set, variance })
            }
            GeneratorConfig::Gaussian { stdev } => {
                if !stdev.is_finite() || stdev <= 0.0 {
                    return Err(HoloIndexError::config(format!(
                        "stdev must be finite and positive, got {stdev}"
                    )));
                }
                let normal = Normal::new(0.0, stdev)
                    .map_err(|e| HoloIndexError::config(format!("invalid Gaussian: {e}")))?;
                Ok(VectorGenerator::Gaussian { dimensions, normal })
            }
        }
    }

    /// Dimensionality of every generated vector.
    pub fn dimensions(&self) -> usize {
        match self {
            VectorGenerator::Ternary { dimensions, .. } | VectorGenerator::Gaussian { dimensions, .. } => {
                *dimensions
            }
        }
    }

    /// `true` when this generator produces sparse ternary vectors.
    pub fn is_ternary(&self) -> bool {
        matches!(self, VectorGenerator::Ternary { .. })
    }

    /// Draws a new vector from `rng`.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> IndexVector {
        match self {
            VectorGenerator::Ternary { dimensions, bits_to_set, variance } => {
                IndexVector::Ternary(generate_ternary(rng, *dimensions, *bits_to_set, *variance))
            }
            VectorGenerator::Gaussian { dimensions, normal } => {
                IndexVector::Dense(generate_gaussian(rng, *dimensions, normal))
            }
        }
    }
}

/// Picks `k ± ⌊u·variance⌋` distinct positions, each randomly signed.
fn generate_ternary<R: Rng>(
    rng: &mut R,
    dimensions: usize,
    bits_to_set: usize,
    variance: usize,
) -> TernaryVector {
    let deviation = (rng.random::<f64>() * variance as f64) as usize;
    let bits = if rng.random::<bool>() {
        bits_to_set + deviation
    } else {
        bits_to_set.saturating_sub(deviation)
    }
    .min(dimensions);

    let mut taken = HashSet::with_capacity(bits);
    let mut positive = Vec::with_capacity(bits);
    let mut negative = Vec::with_capacity(bits);
    while taken.len() < bits {
        let index = rng.random_range(0..dimensions);
        if !taken.insert(index) {
            continue;
        }
        if rng.random::<bool>() {
            positive.push(index);
        } else {
            negative.push(index);
        }
    }
    TernaryVector::from_valid(dimensions, positive, negative)
}

fn generate_gaussian<R: Rng>(rng: &mut R, dimensions: usize, normal: &Normal<f64>) -> Vec<f64> {
    (0..dimensions).map(|_| normal.sample(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_ternary_exact_count_without_variance() {
        let generator =
            VectorGenerator::new(8, &GeneratorConfig::Ternary { bits_to_set: 2, variance: 0 }).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let v = generator.generate(&mut rng);
            let t = v.as_ternary().unwrap();
            assert_eq!(t.nonzero_count(), 2);
            assert!(t.positive().iter().all(|p| !t.negative().contains(p)));
            assert!(t.positive().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_ternary_variance_bounds() {
        let generator =
            VectorGenerator::new(64, &GeneratorConfig::Ternary { bits_to_set: 8, variance: 3 }).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let count = generator.generate(&mut rng).as_ternary().unwrap().nonzero_count();
            assert!((5..=11).contains(&count), "count {count} outside k ± variance");
        }
    }

    #[test]
    fn test_gaussian_moments() {
        let generator = VectorGenerator::new(4096, &GeneratorConfig::Gaussian { stdev: 2.0 }).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let v = generator.generate(&mut rng);
        let d = v.as_dense().unwrap();
        let mean = d.iter().sum::<f64>() / d.len() as f64;
        let var = d.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / d.len() as f64;
        assert!(mean.abs() < 0.15);
        assert!((var.sqrt() - 2.0).abs() < 0.15);
    }

    #[test]
    fn test_rejects_bad_configuration() {
        assert!(VectorGenerator::new(0, &GeneratorConfig::default()).is_err());
        assert!(VectorGenerator::new(4, &GeneratorConfig::Ternary { bits_to_set: 5, variance: 0 }).is_err());
        assert!(VectorGenerator::new(4, &GeneratorConfig::Gaussian { stdev: 0.0 }).is_err());
        let overflowing = GeneratorConfig::Ternary { bits_to_set: usize::MAX, variance: 1 };
        assert!(VectorGenerator::new(4, &overflowing).unwrap_err().is_configuration());
    }
}
