/* src/permutation.rs */
//! # Permutation Engine
//!
//! Encodes relative word order by permuting index vectors. The table holds one
//! bijection per exponent `1..=max`; the map for exponent `e` is a fresh shuffle
//! of the map for `e - 1`, so the family composes rather than being drawn
//! independently.
//!
//! Applying exponent `e > 0` runs the forward maps `1, 2, .., e` in sequence.
//! A negative exponent runs the backward maps `|e|, .., 2, 1`, which undoes the
//! forward chain exactly. Ternary vectors only have their non-zero index sets
//! remapped, so a step costs O(k) instead of O(N).
//!
//! The table is built once per engine; later `init` calls are no-ops until
//! [`PermutationEngine::clear`] is called. After construction it is read through
//! an [`ArcSwapOption`] without locking.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Instant,
};

use arc_swap::ArcSwapOption;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::{
    error::{HoloIndexError, Result},
    metrics::{counter, histogram},
    vector::{check_len, IndexVector, TernaryVector},
};

/// A bijective mapping between vector positions and its inverse.
///
/// Invariant: `backward[forward[i]] == i` for every `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermutationFunction {
    forward: Vec<usize>,
    backward: Vec<usize>,
}

impl PermutationFunction {
    /// The identity mapping over `dimensions` positions.
    pub fn identity(dimensions: usize) -> Self {
        let forward: Vec<usize> = (0..dimensions).collect();
        Self { backward: forward.clone(), forward }
    }

    /// Builds a function from a forward mapping, deriving the inverse.
    ///
    /// # Errors
    /// Returns [`HoloIndexError::Configuration`] if `forward` is not a bijection on `0..len`.
    pub fn from_forward(forward: Vec<usize>) -> Result<Self> {
        let n = forward.len();
        let mut backward = vec![usize::MAX; n];
        for (i, &f) in forward.iter().enumerate() {
            if f >= n || backward[f] != usize::MAX {
                return Err(HoloIndexError::config("forward mapping is not a bijection"));
            }
            backward[f] = i;
        }
        Ok(Self { forward, backward })
    }

    /// A shuffled copy of this function's forward mapping.
    fn reshuffled<R: Rng>(&self, rng: &mut R) -> Self {
        let mut forward = self.forward.clone();
        forward.shuffle(rng);
        let mut backward = vec![0; forward.len()];
        for (i, &f) in forward.iter().enumerate() {
            backward[f] = i;
        }
        Self { forward, backward }
    }

    /// New position of each index.
    pub fn forward(&self) -> &[usize] {
        &self.forward
    }

    /// Inverse of [`Self::forward`].
    pub fn backward(&self) -> &[usize] {
        &self.backward
    }

    /// Number of positions the function permutes.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// `true` for a zero-dimensional function.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Immutable family of composed permutations for exponents `1..=max_exponent`.
#[derive(Clone, Debug)]
pub struct PermutationTable {
    dimensions: usize,
    functions: Vec<PermutationFunction>,
}

impl PermutationTable {
    /// Builds the table, deriving each exponent from the one below it.
    pub fn build<R: Rng>(max_exponent: usize, dimensions: usize, rng: &mut R) -> Self {
        let mut functions = Vec::with_capacity(max_exponent);
        let mut prior = PermutationFunction::identity(dimensions);
        for _ in 0..max_exponent {
            let next = prior.reshuffled(rng);
            functions.push(next.clone());
            prior = next;
        }
        Self { dimensions, functions }
    }

    /// Positions per function.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Largest exponent held.
    pub fn max_exponent(&self) -> usize {
        self.functions.len()
    }

    /// The function for `exponent` (1-based); `None` for 0 or past the end.
    pub fn function(&self, exponent: usize) -> Option<&PermutationFunction> {
        exponent.checked_sub(1).and_then(|i| self.functions.get(i))
    }

    fn check_exponent(&self, exponent: i32) -> Result<usize> {
        let steps = exponent.unsigned_abs() as usize;
        if steps > self.functions.len() {
            return Err(HoloIndexError::ExponentOutOfRange {
                requested: steps,
                provisioned: self.functions.len(),
            });
        }
        Ok(steps)
    }

    /// Maps of the chain to apply for `exponent`, in application order.
    fn chain(&self, exponent: i32, steps: usize) -> impl Iterator<Item = &[usize]> + '_ {
        let inverse = exponent < 0;
        let order: Box<dyn Iterator<Item = usize>> =
            if inverse { Box::new((0..steps).rev()) } else { Box::new(0..steps) };
        order.map(move |i| {
            let f = &self.functions[i];
            if inverse { f.backward.as_slice() } else { f.forward.as_slice() }
        })
    }

    /// Applies `exponent` to a ternary vector by remapping its index sets.
    pub fn permute_ternary(&self, v: &TernaryVector, exponent: i32) -> Result<TernaryVector> {
        check_len(self.dimensions, v.length())?;
        let steps = self.check_exponent(exponent)?;
        if steps == 0 {
            return Ok(v.clone());
        }
        let mut positive = v.positive().to_vec();
        let mut negative = v.negative().to_vec();
        for reordering in self.chain(exponent, steps) {
            for p in positive.iter_mut() {
                *p = reordering[*p];
            }
            for n in negative.iter_mut() {
                *n = reordering[*n];
            }
        }
        Ok(TernaryVector::from_valid(v.length(), positive, negative))
    }

    /// Applies `exponent` to a dense vector: the value at `i` moves to `map[i]` per step.
    pub fn permute_dense(&self, v: &[f64], exponent: i32) -> Result<Vec<f64>> {
        check_len(self.dimensions, v.len())?;
        let steps = self.check_exponent(exponent)?;
        let mut current = v.to_vec();
        let mut scratch = vec![0.0; v.len()];
        for reordering in self.chain(exponent, steps) {
            for (i, &value) in current.iter().enumerate() {
                scratch[reordering[i]] = value;
            }
            std::mem::swap(&mut current, &mut scratch);
        }
        Ok(current)
    }

    /// Applies `exponent` to either representation.
    pub fn permute(&self, v: &IndexVector, exponent: i32) -> Result<IndexVector> {
        match v {
            IndexVector::Ternary(t) => self.permute_ternary(t, exponent).map(IndexVector::Ternary),
            IndexVector::Dense(d) => self.permute_dense(d, exponent).map(IndexVector::Dense),
        }
    }
}

/// Owner of one lazily built [`PermutationTable`].
///
/// Engines are explicit objects handed to their consumers, so independent
/// configurations can coexist in one process.
#[derive(Debug)]
pub struct PermutationEngine {
    table: ArcSwapOption<PermutationTable>,
    rng: Mutex<StdRng>,
}

impl Default for PermutationEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PermutationEngine {
    /// Creates an uninitialized engine; `seed` makes the shuffles reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { table: ArcSwapOption::empty(), rng: Mutex::new(rng) }
    }

    /// Creates and initializes an engine in one step.
    pub fn initialized(max_exponent: usize, dimensions: usize, seed: Option<u64>) -> Result<Self> {
        let engine = Self::new(seed);
        engine.init(max_exponent, dimensions)?;
        Ok(engine)
    }

    /// Builds the table for exponents `1..=max_exponent` over `dimensions` positions.
    ///
    /// A no-op if a table already exists, whatever its parameters; call
    /// [`Self::clear`] first to rebuild. Concurrent callers build at most once.
    ///
    /// # Errors
    /// Returns [`HoloIndexError::Configuration`] if `dimensions` is zero.
    pub fn init(&self, max_exponent: usize, dimensions: usize) -> Result<()> {
        if dimensions == 0 {
            return Err(HoloIndexError::config("permutation dimensions must be positive"));
        }
        if self.table.load().is_some() {
            return Ok(());
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = self.table.load_full() {
            if existing.dimensions() != dimensions || existing.max_exponent() != max_exponent {
                debug!(
                    existing_dimensions = existing.dimensions(),
                    existing_max = existing.max_exponent(),
                    dimensions,
                    max_exponent,
                    "Permutation table already built; ignoring init"
                );
            }
            return Ok(());
        }
        let start = Instant::now();
        let table = PermutationTable::build(max_exponent, dimensions, &mut *rng);
        self.table.store(Some(Arc::new(table)));
        histogram!("permutation_build_ns").record(start.elapsed().as_nanos() as f64);
        counter!("permutation_tables_built").increment(1);
        info!(max_exponent, dimensions, "Permutation table built");
        Ok(())
    }

    /// Drops the table so the next `init` builds a new one.
    pub fn clear(&self) {
        let _guard = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.table.store(None);
        trace!("Permutation table cleared");
    }

    /// `true` once a table has been built.
    pub fn is_initialized(&self) -> bool {
        self.table.load().is_some()
    }

    /// The current table.
    ///
    /// # Errors
    /// Returns [`HoloIndexError::NotInitialized`] before the first `init`.
    pub fn table(&self) -> Result<Arc<PermutationTable>> {
        self.table.load_full().ok_or_else(|| HoloIndexError::NotInitialized {
            message: "PermutationEngine::init has not been called".to_string(),
        })
    }

    /// Largest exponent the current table supports (0 when uninitialized).
    pub fn max_exponent(&self) -> usize {
        self.table.load_full().map_or(0, |t| t.max_exponent())
    }

    /// Permutes `v` by `exponent`; the sign selects forward or inverse chains.
    ///
    /// # Errors
    /// [`HoloIndexError::ExponentOutOfRange`] past the provisioned table,
    /// [`HoloIndexError::DimensionMismatch`] for a vector of the wrong length.
    pub fn permute(&self, v: &IndexVector, exponent: i32) -> Result<IndexVector> {
        if exponent == 0 {
            return Ok(v.clone());
        }
        self.table()?.permute(v, exponent)
    }

    /// Ternary-only permutation; dense input is a representation mismatch.
    pub fn permute_ternary(&self, v: &IndexVector, exponent: i32) -> Result<TernaryVector> {
        let t = v.as_ternary()?;
        if exponent == 0 {
            return Ok(t.clone());
        }
        self.table()?.permute_ternary(t, exponent)
    }

    /// Dense-only permutation.
    pub fn permute_dense(&self, v: &[f64], exponent: i32) -> Result<Vec<f64>> {
        if exponent == 0 {
            return Ok(v.to_vec());
        }
        self.table()?.permute_dense(v, exponent)
    }
}

/// Permutation that coarsens exponents by a window size before delegating.
///
/// Distances inside the same sub-window share a permutation: the exponent is
/// divided with Rust integer division (truncating toward zero).
#[derive(Clone, Debug)]
pub struct WindowedPermutation {
    engine: Arc<PermutationEngine>,
    window: usize,
}

impl WindowedPermutation {
    /// Wraps `engine` with a window size.
    ///
    /// # Errors
    /// Returns [`HoloIndexError::Configuration`] for a zero window.
    pub fn new(engine: Arc<PermutationEngine>, window: usize) -> Result<Self> {
        if window == 0 || i32::try_from(window).is_err() {
            return Err(HoloIndexError::config(format!("invalid permutation window {window}")));
        }
        Ok(Self { engine, window })
    }

    /// Provisions the underlying engine for `max_exponent / window` exponents.
    pub fn init(&self, max_exponent: usize, dimensions: usize) -> Result<()> {
        self.engine.init(max_exponent / self.window, dimensions)
    }

    /// Window size.
    pub fn window(&self) -> usize {
        self.window
    }

    /// The exponent actually applied for a requested one.
    pub fn effective_exponent(&self, exponent: i32) -> i32 {
        exponent / self.window as i32
    }

    /// Permutes by `exponent / window`.
    pub fn permute(&self, v: &IndexVector, exponent: i32) -> Result<IndexVector> {
        self.engine.permute(v, self.effective_exponent(exponent))
    }
}

/// The order-encoding permutation an accumulator applies.
#[derive(Clone, Debug)]
pub enum OrderPermutation {
    /// One permutation step per unit of distance.
    Direct(Arc<PermutationEngine>),
    /// Distances coarsened by a window size.
    Windowed(WindowedPermutation),
}

impl OrderPermutation {
    /// Permutes `v` for a signed word distance.
    pub fn permute(&self, v: &IndexVector, distance: i32) -> Result<IndexVector> {
        match self {
            OrderPermutation::Direct(engine) => engine.permute(v, distance),
            OrderPermutation::Windowed(windowed) => windowed.permute(v, distance),
        }
    }

    /// Provisions the table for distances up to `max_exponent`.
    pub fn init(&self, max_exponent: usize, dimensions: usize) -> Result<()> {
        match self {
            OrderPermutation::Direct(engine) => engine.init(max_exponent, dimensions),
            OrderPermutation::Windowed(windowed) => windowed.init(max_exponent, dimensions),
        }
    }
}
