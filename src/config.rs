/* src/config.rs */
//! # Engine Configuration
//!
//! All tunables are supplied at construction time: vector dimensionality, the
//! index-vector generator, the order-permutation window and an optional seed.
//! Configurations can be loaded from YAML or JSON files.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HoloIndexError, Result};

/// Default dimensionality for ternary (Random Indexing) vectors.
pub const DEFAULT_DIMENSIONS: usize = 2048;
/// Default dimensionality for Gaussian (holographic) vectors.
pub const DEFAULT_HOLOGRAPHIC_DIMENSIONS: usize = 512;
/// Default number of non-zero entries in a ternary vector.
pub const DEFAULT_BITS_TO_SET: usize = 4;
/// Default context window on each side of the focus word.
pub const DEFAULT_WINDOW: usize = 5;

/// How index vectors are synthesized for unseen terms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Sparse vectors of `bits_to_set ± variance` entries valued +1/-1.
    Ternary {
        /// Target number of non-zero entries
        #[serde(default = "default_bits_to_set")]
        bits_to_set: usize,
        /// Maximum random deviation from `bits_to_set`
        #[serde(default)]
        variance: usize,
    },
    /// Dense vectors drawn from N(0, stdev²).
    Gaussian {
        /// Standard deviation of every component
        #[serde(default = "default_stdev")]
        stdev: f64,
    },
}

fn default_bits_to_set() -> usize {
    DEFAULT_BITS_TO_SET
}

fn default_stdev() -> f64 {
    1.0
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig::Ternary { bits_to_set: DEFAULT_BITS_TO_SET, variance: 0 }
    }
}

impl GeneratorConfig {
    /// Gaussian generator scaled so vectors have unit expected length (σ = 1/√N).
    pub fn beagle(dimensions: usize) -> Self {
        let stdev = if dimensions == 0 { 1.0 } else { 1.0 / (dimensions as f64).sqrt() };
        GeneratorConfig::Gaussian { stdev }
    }

    /// Human-readable name of the representation this generator produces.
    pub fn representation(&self) -> &'static str {
        match self {
            GeneratorConfig::Ternary { .. } => "ternary",
            GeneratorConfig::Gaussian { .. } => "dense",
        }
    }
}

/// Order-encoding permutation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermutationConfig {
    /// Whether neighbor vectors are permuted at all (otherwise bag-of-words).
    pub enabled: bool,
    /// Number of words considered before the focus word.
    pub left_window: usize,
    /// Number of words considered after the focus word.
    pub right_window: usize,
    /// When set, exponents are divided by this value before permuting.
    pub window_divisor: Option<usize>,
}

impl Default for PermutationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            left_window: DEFAULT_WINDOW,
            right_window: DEFAULT_WINDOW,
            window_divisor: None,
        }
    }
}

impl PermutationConfig {
    /// Largest absolute distance a neighbor can have from its focus word.
    pub fn max_exponent(&self) -> usize {
        self.left_window.max(self.right_window)
    }
}

/// Top-level configuration for a registry, permutation engine and accumulators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Vector dimensionality `N` shared by every vector in the run.
    pub dimensions: usize,
    /// Index-vector generator.
    pub generator: GeneratorConfig,
    /// Order-permutation settings.
    pub permutation: PermutationConfig,
    /// Seed for every random source; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Worker threads used for parallel document processing.
    pub worker_threads: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            generator: GeneratorConfig::default(),
            permutation: PermutationConfig::default(),
            seed: None,
            worker_threads: num_cpus::get(),
        }
    }
}

impl IndexConfig {
    /// Random Indexing defaults with the given dimensionality.
    pub fn random_indexing(dimensions: usize) -> Self {
        Self { dimensions, ..Self::default() }
    }

    /// Holographic (Beagle) defaults: Gaussian vectors with σ = 1/√N.
    pub fn holographic(dimensions: usize) -> Self {
        Self {
            dimensions,
            generator: GeneratorConfig::beagle(dimensions),
            permutation: PermutationConfig { left_window: 1, ..PermutationConfig::default() },
            ..Self::default()
        }
    }

    /// Builder-style seed setter.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every invariant the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions == 0 {
            return Err(HoloIndexError::config("dimensions must be positive"));
        }
        match self.generator {
            GeneratorConfig::Ternary { bits_to_set, variance } => {
                if bits_to_set == 0 {
                    return Err(HoloIndexError::config("bits_to_set must be positive"));
                }
                if bits_to_set.checked_add(variance).map_or(true, |total| total > self.dimensions) {
                    return Err(HoloIndexError::config(format!(
                        "bits_to_set ({bits_to_set}) + variance ({variance}) exceeds dimensions ({})",
                        self.dimensions
                    )));
                }
            }
            GeneratorConfig::Gaussian { stdev } => {
                if !stdev.is_finite() || stdev <= 0.0 {
                    return Err(HoloIndexError::config(format!(
                        "stdev must be finite and positive, got {stdev}"
                    )));
                }
            }
        }
        if self.permutation.window_divisor == Some(0) {
            return Err(HoloIndexError::config("window_divisor must be positive"));
        }
        if self.worker_threads == 0 {
            return Err(HoloIndexError::config("worker_threads must be positive"));
        }
        Ok(())
    }

    /// Loads a configuration file (`.yaml`/`.yml` as YAML, anything else as JSON) and validates it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: IndexConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        config.validate()?;
        debug!(path = %path.display(), dimensions = config.dimensions, "Loaded index configuration");
        Ok(config)
    }
}
