/* tests/permutation_properties.rs */
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use holoindex::{circular_convolve, IndexVector, PermutationEngine, PermutationTable, TernaryVector};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn ternary(dimensions: usize) -> impl Strategy<Value = TernaryVector> {
    proptest::sample::subsequence((0..dimensions).collect::<Vec<_>>(), 0..dimensions.min(12))
        .prop_flat_map(move |indices| {
            let n = indices.len();
            (Just(indices), proptest::collection::vec(any::<bool>(), n))
        })
        .prop_map(move |(indices, signs)| {
            let (mut positive, mut negative) = (Vec::new(), Vec::new());
            for (i, s) in indices.into_iter().zip(signs) {
                if s { positive.push(i) } else { negative.push(i) }
            }
            TernaryVector::new(dimensions, positive, negative).unwrap()
        })
}

proptest! {
    #[test]
    fn every_function_is_a_bijection(seed in any::<u64>(), dims in 1usize..64, max in 1usize..6) {
        let table = PermutationTable::build(max, dims, &mut StdRng::seed_from_u64(seed));
        for e in 1..=max {
            let f = table.function(e).unwrap();
            let mut seen = vec![false; dims];
            for (i, &j) in f.forward().iter().enumerate() {
                prop_assert!(!seen[j]);
                seen[j] = true;
                prop_assert_eq!(f.backward()[j], i);
            }
        }
    }

    #[test]
    fn ternary_round_trip(seed in any::<u64>(), v in ternary(40), e in -6i32..=6) {
        let engine = PermutationEngine::initialized(6, 40, Some(seed)).unwrap();
        let v = IndexVector::Ternary(v);
        let there = engine.permute(&v, e).unwrap();
        prop_assert_eq!(engine.permute(&there, -e).unwrap(), v);
    }

    #[test]
    fn dense_round_trip_and_agreement(seed in any::<u64>(), v in ternary(24), e in -4i32..=4) {
        let engine = PermutationEngine::initialized(4, 24, Some(seed)).unwrap();
        let dense = IndexVector::Dense(v.to_dense());
        let sparse = IndexVector::Ternary(v);
        let permuted = engine.permute(&dense, e).unwrap();
        prop_assert_eq!(permuted.to_dense(), engine.permute(&sparse, e).unwrap().to_dense());
        prop_assert_eq!(engine.permute(&permuted, -e).unwrap(), dense);
    }

    #[test]
    fn convolution_is_commutative(a in proptest::collection::vec(-10.0f64..10.0, 1..40)) {
        let b: Vec<f64> = a.iter().rev().map(|x| x * 0.5 - 1.0).collect();
        let ab = circular_convolve(&a, &b).unwrap();
        let ba = circular_convolve(&b, &a).unwrap();
        for (x, y) in ab.iter().zip(&ba) {
            prop_assert!((x - y).abs() < 1e-8);
        }
    }
}
