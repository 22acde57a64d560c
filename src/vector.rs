/* src/vector.rs */
//! # Index Vector Representations
//!
//! A term's random identity is either a *ternary sparse* vector, stored as two
//! disjoint ascending index sets of +1 and -1 entries, or a *dense* vector of
//! real components. Both are immutable once generated; consumers copy before
//! permuting or convolving.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use serde::{Deserialize, Serialize};

use crate::error::{HoloIndexError, Result};

/// Dense real-valued vector of dimensionality `N`.
pub type DenseVector = Vec<f64>;

/// Sparse vector whose only non-zero entries are +1 or -1.
///
/// Invariant: `positive` and `negative` are sorted ascending, disjoint, and every
/// index is `< length`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TernaryParts")]
pub struct TernaryVector {
    length: usize,
    positive: Vec<usize>,
    negative: Vec<usize>,
}

/// Unchecked wire form; deserialization goes through [`TernaryVector::new`].
#[derive(Deserialize)]
struct TernaryParts {
    length: usize,
    positive: Vec<usize>,
    negative: Vec<usize>,
}

impl TryFrom<TernaryParts> for TernaryVector {
    type Error = HoloIndexError;

    fn try_from(parts: TernaryParts) -> Result<Self> {
        TernaryVector::new(parts.length, parts.positive, parts.negative)
    }
}

impl TernaryVector {
    /// Builds a ternary vector, sorting both index sets and checking the invariants.
    pub fn new(length: usize, mut positive: Vec<usize>, mut negative: Vec<usize>) -> Result<Self> {
        positive.sort_unstable();
        negative.sort_unstable();
        if let Some(&bad) = positive.iter().chain(negative.iter()).find(|&&i| i >= length) {
            return Err(HoloIndexError::DimensionMismatch { expected: length, actual: bad + 1 });
        }
        if positive.windows(2).any(|w| w[0] == w[1]) || negative.windows(2).any(|w| w[0] == w[1]) {
            return Err(HoloIndexError::config("ternary index sets contain duplicates"));
        }
        if positive.iter().any(|p| negative.binary_search(p).is_ok()) {
            return Err(HoloIndexError::config("ternary index sets overlap"));
        }
        Ok(Self { length, positive, negative })
    }

    /// Builds a ternary vector from index sets the caller already knows are valid.
    ///
    /// Only sorts; used on the hot permutation path where a bijection preserves
    /// disjointness and range.
    pub(crate) fn from_valid(length: usize, mut positive: Vec<usize>, mut negative: Vec<usize>) -> Self {
        positive.sort_unstable();
        negative.sort_unstable();
        Self { length, positive, negative }
    }

    /// Recovers a ternary vector from dense components that are all in {-1, 0, +1}.
    pub fn from_dense(values: &[f64]) -> Result<Self> {
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        for (i, &v) in values.iter().enumerate() {
            if v == 1.0 {
                positive.push(i);
            } else if v == -1.0 {
                negative.push(i);
            } else if v != 0.0 {
                return Err(HoloIndexError::RepresentationMismatch {
                    expected: "ternary",
                    actual: "dense",
                });
            }
        }
        Ok(Self { length: values.len(), positive, negative })
    }

    /// Dimensionality `N`.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Sorted indices holding +1.
    pub fn positive(&self) -> &[usize] {
        &self.positive
    }

    /// Sorted indices holding -1.
    pub fn negative(&self) -> &[usize] {
        &self.negative
    }

    /// Number of non-zero entries.
    pub fn nonzero_count(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    /// Value at `index`, found by binary search over the index sets.
    pub fn get(&self, index: usize) -> f64 {
        if self.positive.binary_search(&index).is_ok() {
            1.0
        } else if self.negative.binary_search(&index).is_ok() {
            -1.0
        } else {
            0.0
        }
    }

    /// Adds this vector into `target` in O(k).
    pub fn add_to(&self, target: &mut [f64]) -> Result<()> {
        check_len(self.length, target.len())?;
        for &p in &self.positive {
            target[p] += 1.0;
        }
        for &n in &self.negative {
            target[n] -= 1.0;
        }
        Ok(())
    }

    /// Expands into a dense vector.
    pub fn to_dense(&self) -> DenseVector {
        let mut dense = vec![0.0; self.length];
        for &p in &self.positive {
            dense[p] = 1.0;
        }
        for &n in &self.negative {
            dense[n] = -1.0;
        }
        dense
    }
}

/// The identity vector assigned to a term.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum IndexVector {
    /// Sparse ±1 representation used by Random Indexing.
    Ternary(TernaryVector),
    /// Dense Gaussian representation used by holographic convolution.
    Dense(DenseVector),
}

impl IndexVector {
    /// Dimensionality `N`.
    pub fn len(&self) -> usize {
        match self {
            IndexVector::Ternary(t) => t.length(),
            IndexVector::Dense(d) => d.len(),
        }
    }

    /// `true` when the vector has zero dimensions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the concrete representation, used in error messages.
    pub fn representation(&self) -> &'static str {
        match self {
            IndexVector::Ternary(_) => "ternary",
            IndexVector::Dense(_) => "dense",
        }
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> f64 {
        match self {
            IndexVector::Ternary(t) => t.get(index),
            IndexVector::Dense(d) => d.get(index).copied().unwrap_or(0.0),
        }
    }

    /// Adds this vector into `target`.
    pub fn add_to(&self, target: &mut [f64]) -> Result<()> {
        match self {
            IndexVector::Ternary(t) => t.add_to(target),
            IndexVector::Dense(d) => add_assign(target, d),
        }
    }

    /// Dense copy of this vector.
    pub fn to_dense(&self) -> DenseVector {
        match self {
            IndexVector::Ternary(t) => t.to_dense(),
            IndexVector::Dense(d) => d.clone(),
        }
    }

    /// Borrows the ternary form or reports a representation mismatch.
    pub fn as_ternary(&self) -> Result<&TernaryVector> {
        match self {
            IndexVector::Ternary(t) => Ok(t),
            other => Err(HoloIndexError::RepresentationMismatch {
                expected: "ternary",
                actual: other.representation(),
            }),
        }
    }

    /// Borrows the dense form or reports a representation mismatch.
    pub fn as_dense(&self) -> Result<&[f64]> {
        match self {
            IndexVector::Dense(d) => Ok(d),
            other => Err(HoloIndexError::RepresentationMismatch {
                expected: "dense",
                actual: other.representation(),
            }),
        }
    }
}

impl From<TernaryVector> for IndexVector {
    fn from(t: TernaryVector) -> Self {
        IndexVector::Ternary(t)
    }
}

impl From<DenseVector> for IndexVector {
    fn from(d: DenseVector) -> Self {
        IndexVector::Dense(d)
    }
}

#[inline]
pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(HoloIndexError::DimensionMismatch { expected, actual })
    }
}

/// Element-wise `target += source`.
pub fn add_assign(target: &mut [f64], source: &[f64]) -> Result<()> {
    check_len(target.len(), source.len())?;
    for (t, s) in target.iter_mut().zip(source) {
        *t += s;
    }
    Ok(())
}
