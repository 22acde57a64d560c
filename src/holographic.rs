/* src/holographic.rs */
//! # Holographic Accumulator
//!
//! Beagle-style context strategy. Each neighbor contributes its own vector plus
//! two evolving n-gram chains bound by circular convolution:
//!
//! - the *first* chain starts at the word before the focus word,
//!   `(prev ⊛ Φ) ⊛ n₁ ⊛ n₂ ⊛ ..`
//! - the *second* chain starts at the focus word itself, `Φ ⊛ n₁ ⊛ n₂ ⊛ ..`
//!
//! where `Φ` is the placeholder vector standing in for the focus word. Before
//! convolving, the left operand is reordered by a fixed permutation P1 and the
//! right operand by P2, which makes the binding non-commutative and so
//! order-sensitive.
//!
//! ## Thread confinement
//!
//! The chains are mutated on every call. One accumulator serves one stream of
//! focus words; run one instance per worker. The `&mut self` receivers enforce
//! this at compile time unless the caller wraps the accumulator in a lock, in
//! which case interleaving two documents through it silently mixes their chains.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::{debug, trace};

use crate::{
    config::{GeneratorConfig, IndexConfig},
    convolution::CircularConvolver,
    error::{HoloIndexError, Result},
    generator::VectorGenerator,
    metrics::counter,
    permutation::PermutationFunction,
    vector::{add_assign, check_len, DenseVector, IndexVector},
};

/// Per-stream n-gram convolution state plus its fixed binding parameters.
#[derive(Clone, Debug)]
pub struct HolographicAccumulator {
    convolver: CircularConvolver,
    placeholder: DenseVector,
    left_order: PermutationFunction,
    right_order: PermutationFunction,
    last_focus: DenseVector,
    first_convolution: Option<DenseVector>,
    second_convolution: Option<DenseVector>,
}

impl HolographicAccumulator {
    /// Creates an accumulator with random P1/P2 orderings drawn from `rng`.
    ///
    /// # Errors
    /// [`HoloIndexError::Configuration`] for zero dimensions or a placeholder of the wrong length.
    pub fn new<R: Rng>(dimensions: usize, placeholder: DenseVector, rng: &mut R) -> Result<Self> {
        let left_order = random_order(dimensions, rng)?;
        let right_order = random_order(dimensions, rng)?;
        Self::with_orders(placeholder, left_order, right_order)
    }

    /// Creates an accumulator with explicit P1 (left) and P2 (right) orderings.
    pub fn with_orders(
        placeholder: DenseVector,
        left_order: PermutationFunction,
        right_order: PermutationFunction,
    ) -> Result<Self> {
        let dimensions = placeholder.len();
        let convolver = CircularConvolver::new(dimensions)?;
        check_len(dimensions, left_order.len()).map_err(|_| mismatch("P1", dimensions, left_order.len()))?;
        check_len(dimensions, right_order.len()).map_err(|_| mismatch("P2", dimensions, right_order.len()))?;
        debug!(dimensions, "Holographic accumulator created");
        Ok(Self {
            convolver,
            last_focus: vec![0.0; dimensions],
            placeholder,
            left_order,
            right_order,
            first_convolution: None,
            second_convolution: None,
        })
    }

    /// Builds an accumulator from `config`: Gaussian placeholder (σ from the
    /// configured Gaussian generator, otherwise 1/√N) and seeded orderings.
    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15),
            None => StdRng::from_os_rng(),
        };
        let generator_config = match config.generator {
            GeneratorConfig::Gaussian { .. } => config.generator.clone(),
            GeneratorConfig::Ternary { .. } => GeneratorConfig::beagle(config.dimensions),
        };
        let generator = VectorGenerator::new(config.dimensions, &generator_config)?;
        let placeholder = match generator.generate(&mut rng) {
            IndexVector::Dense(d) => d,
            other => other.to_dense(),
        };
        Self::new(config.dimensions, placeholder, &mut rng)
    }

    /// Vector dimensionality `N`.
    pub fn dimensions(&self) -> usize {
        self.placeholder.len()
    }

    /// The placeholder vector Φ.
    pub fn placeholder(&self) -> &[f64] {
        &self.placeholder
    }

    /// The P1 ordering applied to left operands.
    pub fn left_order(&self) -> &PermutationFunction {
        &self.left_order
    }

    /// The P2 ordering applied to right operands.
    pub fn right_order(&self) -> &PermutationFunction {
        &self.right_order
    }

    /// Current first (previous-word) n-gram chain, if any.
    pub fn first_convolution(&self) -> Option<&[f64]> {
        self.first_convolution.as_deref()
    }

    /// Current second (focus-word) n-gram chain, if any.
    pub fn second_convolution(&self) -> Option<&[f64]> {
        self.second_convolution.as_deref()
    }

    /// Forgets all chain state, as at the start of a new document.
    pub fn reset(&mut self) {
        self.last_focus.iter_mut().for_each(|v| *v = 0.0);
        self.first_convolution = None;
        self.second_convolution = None;
    }

    /// Binds `left` and `right`: reorder by P1/P2, then circular convolution.
    pub fn convolve(&self, left: &[f64], right: &[f64]) -> Result<DenseVector> {
        let left = gather(left, &self.left_order)?;
        let right = gather(right, &self.right_order)?;
        self.convolver.convolve(&left, &right)
    }

    /// Contribution of `neighbor` to the meaning of `focus`.
    ///
    /// `new_focus` marks the first neighbor of a new focus word: both chains are
    /// rebuilt from the placeholder, the first one seeded by the previous focus
    /// vector. Otherwise both chains are extended by one more convolution with
    /// `neighbor`. A call with no chain state yet is treated as a new focus.
    /// `_distance` is accepted for interface symmetry; chain position already
    /// encodes order.
    ///
    /// # Errors
    /// [`HoloIndexError::RepresentationMismatch`] for non-dense input,
    /// [`HoloIndexError::DimensionMismatch`] for vectors of the wrong length.
    pub fn contribute(
        &mut self,
        focus: &IndexVector,
        neighbor: &IndexVector,
        _distance: i32,
        new_focus: bool,
    ) -> Result<DenseVector> {
        let focus = focus.as_dense()?;
        let neighbor = neighbor.as_dense()?;
        self.contribute_dense(focus, neighbor, new_focus)
    }

    /// [`Self::contribute`] over raw dense slices.
    pub fn contribute_dense(&mut self, focus: &[f64], neighbor: &[f64], new_focus: bool) -> Result<DenseVector> {
        let n = self.dimensions();
        check_len(n, focus.len())?;
        check_len(n, neighbor.len())?;

        let mut result = neighbor.to_vec();
        let chains = match (new_focus, self.first_convolution.take(), self.second_convolution.take()) {
            (false, Some(first), Some(second)) => {
                Some((self.convolve(&first, neighbor)?, self.convolve(&second, neighbor)?))
            }
            _ => None,
        };
        let (first, second) = match chains {
            Some(chains) => chains,
            None => {
                counter!("holographic_focus_resets").increment(1);
                trace!("Focus changed; rebuilding n-gram chains");
                let seed = self.convolve(&self.last_focus, &self.placeholder)?;
                add_assign(&mut result, &seed)?;
                let first = self.convolve(&seed, neighbor)?;
                let second = self.convolve(&self.placeholder, neighbor)?;
                (first, second)
            }
        };

        add_assign(&mut result, &first)?;
        add_assign(&mut result, &second)?;
        self.first_convolution = Some(first);
        self.second_convolution = Some(second);
        self.last_focus.copy_from_slice(focus);
        Ok(result)
    }
}

/// `out[i] = data[order[i]]`.
fn gather(data: &[f64], order: &PermutationFunction) -> Result<DenseVector> {
    check_len(order.len(), data.len())?;
    Ok(order.forward().iter().map(|&i| data[i]).collect())
}

fn random_order<R: Rng>(dimensions: usize, rng: &mut R) -> Result<PermutationFunction> {
    if dimensions == 0 {
        return Err(HoloIndexError::config("holographic dimensions must be positive"));
    }
    let mut order: Vec<usize> = (0..dimensions).collect();
    order.shuffle(rng);
    PermutationFunction::from_forward(order)
}

fn mismatch(which: &str, expected: usize, actual: usize) -> HoloIndexError {
    HoloIndexError::config(format!("{which} ordering has {actual} positions, expected {expected}"))
}
