/* src/space.rs */
//! # Semantic Space
//!
//! Drives a context strategy over pre-tokenized documents. Every token becomes
//! the focus word once; its `left_window` predecessors and `right_window`
//! successors are fed to the strategy as (focus, neighbor, distance) triples,
//! left side first, farthest neighbor first. Contributions are summed into a
//! per-document map and merged into the shared meaning store when the document
//! is done.
//!
//! ```no_run
//! use holoindex::{IndexConfig, SemanticSpace};
//!
//! let space = SemanticSpace::new(IndexConfig::random_indexing(512).with_seed(7))?;
//! space.process_documents(&[vec!["the", "cat", "sat"], vec!["the", "dog", "ran"]])?;
//! let cat = space.meaning("cat").expect("seen");
//! assert_eq!(cat.len(), 512);
//! # Ok::<(), holoindex::HoloIndexError>(())
//! ```
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use std::{collections::HashMap, sync::Arc};

use ahash::RandomState;
use dashmap::{mapref::entry::Entry, DashMap};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

use crate::{
    config::IndexConfig,
    error::{HoloIndexError, Result},
    metrics::counter,
    permutation::PermutationEngine,
    registry::TermIndexRegistry,
    strategy::{ContextStrategy, ContextTriple},
    vector::{add_assign, DenseVector, IndexVector},
};

type DocumentMeanings = HashMap<String, DenseVector, RandomState>;

/// Shared meaning store plus the registry and strategy that feed it.
pub struct SemanticSpace {
    config: IndexConfig,
    registry: Arc<TermIndexRegistry>,
    engine: Arc<PermutationEngine>,
    strategy: ContextStrategy,
    meanings: DashMap<String, DenseVector, RandomState>,
    pool: ThreadPool,
}

impl std::fmt::Debug for SemanticSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticSpace")
            .field("strategy", &self.strategy.name())
            .field("dimensions", &self.config.dimensions)
            .field("terms", &self.meanings.len())
            .finish_non_exhaustive()
    }
}

impl SemanticSpace {
    /// Builds a space with a fresh registry, permutation engine and strategy.
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(TermIndexRegistry::new(&config)?);
        let engine = Arc::new(PermutationEngine::new(config.seed.map(|s| s.wrapping_add(1))));
        let strategy = ContextStrategy::from_config(&config, Arc::clone(&engine))?;
        Self::with_parts(config, registry, engine, strategy)
    }

    /// Builds a space around an existing registry and strategy, e.g. one
    /// restored from a snapshot.
    pub fn with_parts(
        config: IndexConfig,
        registry: Arc<TermIndexRegistry>,
        engine: Arc<PermutationEngine>,
        strategy: ContextStrategy,
    ) -> Result<Self> {
        config.validate()?;
        if registry.dimensions() != config.dimensions {
            return Err(HoloIndexError::DimensionMismatch {
                expected: config.dimensions,
                actual: registry.dimensions(),
            });
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("holoindex-worker-{i}"))
            .build()
            .map_err(|e| HoloIndexError::config(format!("worker pool: {e}")))?;
        info!(
            strategy = strategy.name(),
            dimensions = config.dimensions,
            left_window = config.permutation.left_window,
            right_window = config.permutation.right_window,
            workers = config.worker_threads,
            "Semantic space ready"
        );
        Ok(Self {
            config,
            registry,
            engine,
            strategy,
            meanings: DashMap::with_hasher(RandomState::default()),
            pool,
        })
    }

    /// Accumulates one document into the space.
    pub fn process_document<S: AsRef<str>>(&self, tokens: &[S]) -> Result<()> {
        let mut strategy = self.strategy.clone();
        let local = self.document_meanings(&mut strategy, tokens)?;
        self.merge(local)
    }

    /// Accumulates many documents on the worker pool. Each worker runs its own
    /// strategy instance; the registry and meaning store are shared.
    pub fn process_documents<D, S>(&self, documents: &[D]) -> Result<()>
    where
        D: AsRef<[S]> + Sync,
        S: AsRef<str> + Sync,
    {
        self.pool.install(|| {
            documents
                .par_iter()
                .map_init(
                    || self.strategy.clone(),
                    |strategy, doc| {
                        let local = self.document_meanings(strategy, doc.as_ref())?;
                        self.merge(local)
                    },
                )
                .collect::<Result<()>>()
        })?;
        debug!(documents = documents.len(), terms = self.meanings.len(), "Batch processed");
        Ok(())
    }

    fn document_meanings<S: AsRef<str>>(&self, strategy: &mut ContextStrategy, tokens: &[S]) -> Result<DocumentMeanings> {
        strategy.reset();
        let left = self.config.permutation.left_window;
        let right = self.config.permutation.right_window;
        let vectors: Vec<Arc<IndexVector>> = tokens.iter().map(|t| self.registry.get_or_create(t.as_ref())).collect();

        let mut local = DocumentMeanings::default();
        for (i, token) in tokens.iter().enumerate() {
            let focus = &vectors[i];
            let start = i.saturating_sub(left);
            let end = (i + right).min(tokens.len().saturating_sub(1));
            let neighbors = (start..i).chain(i + 1..=end);

            let meaning = local
                .entry(token.as_ref().to_owned())
                .or_insert_with(|| vec![0.0; self.config.dimensions]);
            for (n, j) in neighbors.enumerate() {
                let distance = j as i32 - i as i32;
                strategy.accumulate(meaning, ContextTriple::new(focus, &vectors[j], distance, n == 0))?;
            }
        }
        counter!("space_documents_processed").increment(1);
        Ok(local)
    }

    fn merge(&self, local: DocumentMeanings) -> Result<()> {
        for (term, vector) in local {
            match self.meanings.entry(term) {
                Entry::Occupied(mut e) => add_assign(e.get_mut(), &vector)?,
                Entry::Vacant(e) => {
                    e.insert(vector);
                }
            }
        }
        Ok(())
    }

    /// Accumulated meaning vector of `term`, if it has been seen as a focus word.
    pub fn meaning(&self, term: &str) -> Option<DenseVector> {
        self.meanings.get(term).map(|v| v.value().clone())
    }

    /// Every term with a meaning vector (unordered).
    pub fn terms(&self) -> Vec<String> {
        self.meanings.iter().map(|e| e.key().clone()).collect()
    }

    /// Length of every meaning vector.
    pub fn vector_length(&self) -> usize {
        self.config.dimensions
    }

    /// Number of terms with a meaning vector.
    pub fn len(&self) -> usize {
        self.meanings.len()
    }

    /// `true` before any document has been processed.
    pub fn is_empty(&self) -> bool {
        self.meanings.is_empty()
    }

    /// The registry supplying index vectors.
    pub fn registry(&self) -> &Arc<TermIndexRegistry> {
        &self.registry
    }

    /// The permutation engine used by the order strategy.
    pub fn engine(&self) -> &Arc<PermutationEngine> {
        &self.engine
    }

    /// Configuration the space was built with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeneratorConfig, PermutationConfig};

    fn small_config(left: usize, right: usize) -> IndexConfig {
        IndexConfig {
            dimensions: 64,
            generator: GeneratorConfig::Ternary { bits_to_set: 4, variance: 0 },
            permutation: PermutationConfig { left_window: left, right_window: right, ..PermutationConfig::default() },
            seed: Some(11),
            worker_threads: 2,
        }
    }

    #[test]
    fn test_single_document_sums_permuted_neighbors() {
        let space = SemanticSpace::new(small_config(1, 1)).unwrap();
        space.process_document(&["a", "b", "c"]).unwrap();
        assert_eq!(space.len(), 3);

        let reg = space.registry();
        let engine = space.engine();
        let a = reg.get("a").unwrap();
        let c = reg.get("c").unwrap();
        let mut expected = vec![0.0; 64];
        engine.permute(&a, -1).unwrap().add_to(&mut expected).unwrap();
        engine.permute(&c, 1).unwrap().add_to(&mut expected).unwrap();
        assert_eq!(space.meaning("b").unwrap(), expected);
    }

    #[test]
    fn test_repeated_document_doubles_meaning() {
        let space = SemanticSpace::new(small_config(2, 2)).unwrap();
        let doc = ["x", "y", "z", "y"];
        space.process_document(&doc).unwrap();
        let once = space.meaning("y").unwrap();
        space.process_document(&doc).unwrap();
        let twice = space.meaning("y").unwrap();
        for (a, b) in once.iter().zip(&twice) {
            assert_eq!(2.0 * a, *b);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let docs: Vec<Vec<String>> = (0..12)
            .map(|d| (0..8).map(|w| format!("w{}", (d * 3 + w) % 10)).collect())
            .collect();

        let parallel = SemanticSpace::new(small_config(2, 3)).unwrap();
        parallel.process_documents(&docs).unwrap();

        // First-sight order differs between runs, so share the registry contents.
        let sequential = SemanticSpace::new(small_config(2, 3)).unwrap();
        let mut buf = Vec::new();
        parallel.registry().save(&mut buf).unwrap();
        sequential.registry().load(&mut std::io::Cursor::new(buf)).unwrap();
        for doc in &docs {
            sequential.process_document(doc).unwrap();
        }

        let mut terms = parallel.terms();
        terms.sort();
        let mut seq_terms = sequential.terms();
        seq_terms.sort();
        assert_eq!(terms, seq_terms);
        for term in terms {
            let p = parallel.meaning(&term).unwrap();
            let s = sequential.meaning(&term).unwrap();
            assert!(p.iter().zip(&s).all(|(x, y)| (x - y).abs() < 1e-9));
        }
    }

    #[test]
    fn test_holographic_space_produces_dense_meanings() {
        let config = IndexConfig { worker_threads: 1, ..IndexConfig::holographic(32).with_seed(3) };
        let space = SemanticSpace::new(config).unwrap();
        space.process_document(&["one", "two", "three"]).unwrap();
        assert_eq!(space.vector_length(), 32);
        assert!(space.meaning("two").unwrap().iter().any(|v| *v != 0.0));
    }

    #[test]
    fn test_single_token_document_has_zero_meaning() {
        let space = SemanticSpace::new(small_config(3, 3)).unwrap();
        space.process_document(&["alone"]).unwrap();
        assert!(space.meaning("alone").unwrap().iter().all(|v| *v == 0.0));
        assert!(space.meaning("missing").is_none());
    }
}
