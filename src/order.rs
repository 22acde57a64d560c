/* src/order.rs */
//! Random Indexing context strategy with permutation-based order encoding.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use std::sync::Arc;

use tracing::debug;

use crate::{
    config::IndexConfig,
    error::Result,
    permutation::{OrderPermutation, PermutationEngine, WindowedPermutation},
    vector::IndexVector,
};

/// Stateless accumulator: a neighbor's contribution is its index vector permuted
/// by the signed distance to the focus word.
///
/// Holds no per-call state, so one instance can be shared by any number of threads.
#[derive(Clone, Debug, Default)]
pub struct OrderAccumulator {
    permutation: Option<OrderPermutation>,
}

impl OrderAccumulator {
    /// Bag-of-words accumulator: neighbors are returned unpermuted.
    pub fn unordered() -> Self {
        Self { permutation: None }
    }

    /// Accumulator that permutes through `permutation`.
    pub fn with_permutation(permutation: OrderPermutation) -> Self {
        Self { permutation: Some(permutation) }
    }

    /// Builds the accumulator described by `config`, provisioning `engine`
    /// for the configured window.
    pub fn from_config(config: &IndexConfig, engine: Arc<PermutationEngine>) -> Result<Self> {
        let settings = &config.permutation;
        if !settings.enabled {
            debug!("Order permutation disabled; using bag-of-words contributions");
            return Ok(Self::unordered());
        }
        let permutation = match settings.window_divisor {
            Some(window) => OrderPermutation::Windowed(WindowedPermutation::new(engine, window)?),
            None => OrderPermutation::Direct(engine),
        };
        permutation.init(settings.max_exponent(), config.dimensions)?;
        Ok(Self::with_permutation(permutation))
    }

    /// `true` when contributions are order-encoded.
    pub fn is_ordered(&self) -> bool {
        self.permutation.is_some()
    }

    /// Contribution of `neighbor` at signed `distance` from the focus word.
    ///
    /// Negative distances (neighbor to the left) use the inverse chain.
    /// `_focus` is accepted for interface symmetry with the holographic strategy.
    pub fn contribute(&self, _focus: &IndexVector, neighbor: &IndexVector, distance: i32) -> Result<IndexVector> {
        match &self.permutation {
            None => Ok(neighbor.clone()),
            Some(permutation) => permutation.permute(neighbor, distance),
        }
    }

    /// Adds the contribution of `neighbor` straight into `meaning`.
    pub fn accumulate(&self, meaning: &mut [f64], neighbor: &IndexVector, distance: i32) -> Result<()> {
        match &self.permutation {
            None => neighbor.add_to(meaning),
            Some(permutation) => permutation.permute(neighbor, distance)?.add_to(meaning),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::PermutationConfig, vector::TernaryVector};

    fn neighbor() -> IndexVector {
        TernaryVector::new(16, vec![2, 11], vec![5]).unwrap().into()
    }

    #[test]
    fn test_unordered_returns_neighbor() {
        let acc = OrderAccumulator::unordered();
        let n = neighbor();
        assert_eq!(acc.contribute(&n, &n, 3).unwrap(), n);
        assert!(!acc.is_ordered());
    }

    #[test]
    fn test_sign_selects_direction() {
        let engine = Arc::new(PermutationEngine::initialized(4, 16, Some(8)).unwrap());
        let acc = OrderAccumulator::with_permutation(OrderPermutation::Direct(Arc::clone(&engine)));
        let n = neighbor();
        let right = acc.contribute(&n, &n, 2).unwrap();
        let left = acc.contribute(&n, &n, -2).unwrap();
        assert_eq!(right, engine.permute(&n, 2).unwrap());
        assert_eq!(left, engine.permute(&n, -2).unwrap());
        assert_eq!(engine.permute(&right, -2).unwrap(), n);
    }

    #[test]
    fn test_accumulate_matches_contribute() {
        let engine = Arc::new(PermutationEngine::initialized(3, 16, Some(1)).unwrap());
        let acc = OrderAccumulator::with_permutation(OrderPermutation::Direct(engine));
        let n = neighbor();
        let mut meaning = vec![0.0; 16];
        acc.accumulate(&mut meaning, &n, -3).unwrap();
        assert_eq!(meaning, acc.contribute(&n, &n, -3).unwrap().to_dense());
    }

    #[test]
    fn test_from_config_provisions_window() {
        let config = IndexConfig {
            dimensions: 16,
            permutation: PermutationConfig { left_window: 2, right_window: 4, ..PermutationConfig::default() },
            ..IndexConfig::default()
        };
        let engine = Arc::new(PermutationEngine::new(Some(2)));
        let acc = OrderAccumulator::from_config(&config, Arc::clone(&engine)).unwrap();
        assert!(acc.is_ordered());
        assert_eq!(engine.max_exponent(), 4);
        assert!(acc.contribute(&neighbor(), &neighbor(), 5).is_err());

        let disabled = IndexConfig {
            permutation: PermutationConfig { enabled: false, ..PermutationConfig::default() },
            ..config
        };
        assert!(!OrderAccumulator::from_config(&disabled, engine).unwrap().is_ordered());
    }

    #[test]
    fn test_from_config_provisions_windowed_quotient() {
        let config = IndexConfig {
            dimensions: 16,
            permutation: PermutationConfig {
                left_window: 3,
                right_window: 11,
                window_divisor: Some(5),
                ..PermutationConfig::default()
            },
            ..IndexConfig::default()
        };
        let engine = Arc::new(PermutationEngine::new(Some(9)));
        let acc = OrderAccumulator::from_config(&config, Arc::clone(&engine)).unwrap();
        assert_eq!(engine.max_exponent(), 2);
        assert_eq!(acc.contribute(&neighbor(), &neighbor(), 11).unwrap(), engine.permute(&neighbor(), 2).unwrap());
    }
}
