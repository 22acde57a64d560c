/* src/lib.rs */
//! # HoloIndex - Random Indexing & Holographic Term Vectors
//!
//! Core of a distributional-semantics engine. Terms get stable random index
//! vectors on first sight; context strategies turn (focus, neighbor, distance)
//! triples into contributions that sum into per-term meaning vectors.
//!
//! - [`TermIndexRegistry`]: concurrent, exactly-once `term → IndexVector` map
//!   with binary snapshots.
//! - [`PermutationEngine`]: lazily built, shared table of random permutations
//!   `Π^e` with exact inverses, encoding word order.
//! - [`OrderAccumulator`]: Random Indexing strategy, neighbor permuted by distance.
//! - [`HolographicAccumulator`]: Beagle strategy, n-gram chains bound by FFT
//!   circular convolution.
//! - [`SemanticSpace`]: window driver over pre-tokenized documents.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

pub mod config;
pub mod convolution;
pub mod error;
pub mod generator;
pub mod holographic;
pub mod metrics;
pub mod order;
pub mod permutation;
pub mod registry;
pub mod space;
pub mod strategy;
pub mod telemetry;
pub mod vector;

pub use config::{GeneratorConfig, IndexConfig, PermutationConfig};
pub use convolution::{circular_convolve, CircularConvolver};
pub use error::{HoloIndexError, Result};
pub use generator::VectorGenerator;
pub use holographic::HolographicAccumulator;
pub use order::OrderAccumulator;
pub use permutation::{OrderPermutation, PermutationEngine, PermutationFunction, PermutationTable, WindowedPermutation};
pub use registry::TermIndexRegistry;
pub use space::SemanticSpace;
pub use strategy::{ContextStrategy, ContextTriple};
pub use telemetry::init_tracing;
pub use vector::{DenseVector, IndexVector, TernaryVector};
