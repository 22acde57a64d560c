/* src/strategy.rs */
//! Closed set of context strategies behind one call shape.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use std::sync::Arc;

use crate::{
    config::{GeneratorConfig, IndexConfig},
    error::Result,
    holographic::HolographicAccumulator,
    order::OrderAccumulator,
    permutation::PermutationEngine,
    vector::{add_assign, IndexVector},
};

/// One (focus, neighbor, distance) observation from a context window.
#[derive(Clone, Copy, Debug)]
pub struct ContextTriple<'a> {
    /// Index vector of the focus word.
    pub focus: &'a IndexVector,
    /// Index vector of the co-occurring word.
    pub neighbor: &'a IndexVector,
    /// Signed offset of the neighbor: negative to the left, positive to the right.
    pub distance: i32,
    /// `true` on the first neighbor of a new focus word.
    pub new_focus: bool,
}

impl<'a> ContextTriple<'a> {
    /// Bundles one window observation.
    pub fn new(focus: &'a IndexVector, neighbor: &'a IndexVector, distance: i32, new_focus: bool) -> Self {
        Self { focus, neighbor, distance, new_focus }
    }
}

/// A context strategy. Clones evolve independently, so each worker can hold
/// its own copy; holographic clones keep the same placeholder and orderings.
#[derive(Clone, Debug)]
pub enum ContextStrategy {
    /// Random Indexing: neighbor permuted by its distance.
    Order(OrderAccumulator),
    /// Beagle: neighbor plus convolved n-gram chains.
    Holographic(HolographicAccumulator),
}

impl ContextStrategy {
    /// Gaussian generators get the holographic strategy, ternary ones the
    /// order-permuting strategy backed by `engine`.
    pub fn from_config(config: &IndexConfig, engine: Arc<PermutationEngine>) -> Result<Self> {
        config.validate()?;
        Ok(match config.generator {
            GeneratorConfig::Ternary { .. } => Self::Order(OrderAccumulator::from_config(config, engine)?),
            GeneratorConfig::Gaussian { .. } => Self::Holographic(HolographicAccumulator::from_config(config)?),
        })
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Order(_) => "order",
            Self::Holographic(_) => "holographic",
        }
    }

    /// Contribution of `triple.neighbor` to the meaning of `triple.focus`.
    pub fn contribute(&mut self, triple: ContextTriple<'_>) -> Result<IndexVector> {
        match self {
            Self::Order(acc) => acc.contribute(triple.focus, triple.neighbor, triple.distance),
            Self::Holographic(acc) => acc
                .contribute(triple.focus, triple.neighbor, triple.distance, triple.new_focus)
                .map(IndexVector::Dense),
        }
    }

    /// Adds the contribution for `triple` into `meaning`.
    pub fn accumulate(&mut self, meaning: &mut [f64], triple: ContextTriple<'_>) -> Result<()> {
        match self {
            Self::Order(acc) => acc.accumulate(meaning, triple.neighbor, triple.distance),
            Self::Holographic(acc) => {
                let contribution = acc.contribute(triple.focus, triple.neighbor, triple.distance, triple.new_focus)?;
                add_assign(meaning, &contribution)
            }
        }
    }

    /// Drops any per-stream state before a new document.
    pub fn reset(&mut self) {
        if let Self::Holographic(acc) = self {
            acc.reset();
        }
    }
}

impl From<OrderAccumulator> for ContextStrategy {
    fn from(acc: OrderAccumulator) -> Self {
        Self::Order(acc)
    }
}

impl From<HolographicAccumulator> for ContextStrategy {
    fn from(acc: HolographicAccumulator) -> Self {
        Self::Holographic(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::TernaryVector;

    #[test]
    fn test_from_config_selects_by_generator() {
        let engine = Arc::new(PermutationEngine::new(Some(1)));
        let ri = ContextStrategy::from_config(&IndexConfig::random_indexing(32).with_seed(1), Arc::clone(&engine)).unwrap();
        assert_eq!(ri.name(), "order");
        assert!(engine.is_initialized());

        let beagle = ContextStrategy::from_config(&IndexConfig::holographic(32).with_seed(1), engine).unwrap();
        assert_eq!(beagle.name(), "holographic");
    }

    #[test]
    fn test_order_accumulate_matches_contribute() {
        let engine = Arc::new(PermutationEngine::initialized(2, 8, Some(3)).unwrap());
        let mut strategy = ContextStrategy::from(OrderAccumulator::with_permutation(
            crate::permutation::OrderPermutation::Direct(engine),
        ));
        let focus: IndexVector = TernaryVector::new(8, vec![0], vec![1]).unwrap().into();
        let neighbor: IndexVector = TernaryVector::new(8, vec![4, 6], vec![2]).unwrap().into();
        let triple = ContextTriple::new(&focus, &neighbor, -2, true);

        let mut meaning = vec![0.0; 8];
        strategy.accumulate(&mut meaning, triple).unwrap();
        assert_eq!(meaning, strategy.contribute(triple).unwrap().to_dense());
    }

    #[test]
    fn test_holographic_clone_has_independent_state() {
        let config = IndexConfig::holographic(16).with_seed(5);
        let mut primary = ContextStrategy::from_config(&config, Arc::new(PermutationEngine::default())).unwrap();
        let mut copy = primary.clone();
        let v = IndexVector::Dense((0..16).map(|i| i as f64 * 0.1).collect());

        let first = primary.contribute(ContextTriple::new(&v, &v, 1, true)).unwrap();
        primary.contribute(ContextTriple::new(&v, &v, 2, false)).unwrap();
        let from_copy = copy.contribute(ContextTriple::new(&v, &v, 1, true)).unwrap();
        assert_eq!(first, from_copy);
    }
}
