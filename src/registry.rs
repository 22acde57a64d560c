/* src/registry.rs */
//! # Term Index Registry
//!
//! Lazily assigns every term a random [`IndexVector`] the first time it is seen
//! and hands the same shared vector to every later caller, across threads.
//!
//! Generation happens inside the map's per-shard entry lock, so two threads racing
//! on the first lookup of a term can never publish two different vectors. Reads of
//! already-known terms only take a shard read lock.
//!
//! The whole mapping can be written to and restored from a flat big-endian
//! snapshot: `[i32 count]` then `count` records of
//! `[i32 term_byte_len][term bytes][N × f64]`.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use ahash::RandomState;
use dashmap::DashMap;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::{
    config::IndexConfig,
    error::{HoloIndexError, Result},
    generator::VectorGenerator,
    metrics::counter,
    vector::{IndexVector, TernaryVector},
};

/// Concurrency-safe, lazily populated `term → IndexVector` map.
#[derive(Debug)]
pub struct TermIndexRegistry {
    generator: VectorGenerator,
    vectors: DashMap<String, Arc<IndexVector>, RandomState>,
    rng: Mutex<StdRng>,
}

impl TermIndexRegistry {
    /// Creates an empty registry from a validated configuration.
    ///
    /// # Errors
    /// Returns [`HoloIndexError::Configuration`] for non-positive dimensions or bit counts.
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let generator = VectorGenerator::new(config.dimensions, &config.generator)?;
        Ok(Self::with_generator(generator, config.seed))
    }

    /// Creates an empty registry around an existing generator.
    pub fn with_generator(generator: VectorGenerator, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        info!(
            dimensions = generator.dimensions(),
            ternary = generator.is_ternary(),
            seeded = seed.is_some(),
            "Term index registry created"
        );
        Self {
            generator,
            vectors: DashMap::with_hasher(RandomState::default()),
            rng: Mutex::new(rng),
        }
    }

    /// Returns the vector for `term`, generating and storing it on first sight.
    ///
    /// Every call for the same term returns the same `Arc`, including calls that
    /// race the first generation from other threads.
    pub fn get_or_create(&self, term: &str) -> Arc<IndexVector> {
        counter!("registry_lookups").increment(1);
        if let Some(existing) = self.vectors.get(term) {
            return Arc::clone(existing.value());
        }
        let entry = self.vectors.entry(term.to_owned()).or_insert_with(|| {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            counter!("registry_vectors_generated").increment(1);
            Arc::new(self.generator.generate(&mut *rng))
        });
        Arc::clone(entry.value())
    }

    /// Returns the vector for `term` without generating one.
    pub fn get(&self, term: &str) -> Option<Arc<IndexVector>> {
        self.vectors.get(term).map(|v| Arc::clone(v.value()))
    }

    /// `true` if a vector has already been assigned to `term`.
    pub fn contains(&self, term: &str) -> bool {
        self.vectors.contains_key(term)
    }

    /// Number of terms with assigned vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// `true` when no term has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Snapshot of all known terms (unordered).
    pub fn terms(&self) -> Vec<String> {
        self.vectors.iter().map(|e| e.key().clone()).collect()
    }

    /// Forgets `term`; the next lookup generates a fresh vector.
    pub fn remove(&self, term: &str) -> Option<Arc<IndexVector>> {
        self.vectors.remove(term).map(|(_, v)| v)
    }

    /// Forgets every term.
    pub fn clear(&self) {
        self.vectors.clear();
    }

    /// Dimensionality `N` of every vector in the registry.
    pub fn dimensions(&self) -> usize {
        self.generator.dimensions()
    }

    /// The generator used for unseen terms.
    pub fn generator(&self) -> &VectorGenerator {
        &self.generator
    }

    // =====================================================================================
    // SNAPSHOT I/O
    // =====================================================================================

    /// Writes the full mapping to `writer`. Terms are written in sorted order.
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut entries: Vec<(String, Arc<IndexVector>)> = self
            .vectors
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let count = i32::try_from(entries.len()).map_err(|_| HoloIndexError::Snapshot {
            message: format!("{} entries exceed the snapshot format limit", entries.len()),
        })?;
        writer.write_all(&count.to_be_bytes())?;
        for (term, vector) in &entries {
            let bytes = term.as_bytes();
            let len = i32::try_from(bytes.len()).map_err(|_| HoloIndexError::Snapshot {
                message: format!("term of {} bytes is too long", bytes.len()),
            })?;
            writer.write_all(&len.to_be_bytes())?;
            writer.write_all(bytes)?;
            for value in vector.to_dense() {
                writer.write_all(&value.to_be_bytes())?;
            }
        }
        writer.flush()?;
        debug!(entries = entries.len(), "Registry snapshot written");
        Ok(())
    }

    /// Replaces the mapping with the contents of `reader`.
    ///
    /// The snapshot is decoded completely before the registry is touched, so a
    /// failed load leaves the existing mapping in place.
    pub fn load<R: Read>(&self, reader: &mut R) -> Result<()> {
        let dimensions = self.dimensions();
        let count = read_i32(reader)?;
        let count = usize::try_from(count).map_err(|_| HoloIndexError::Snapshot {
            message: format!("negative entry count {count}"),
        })?;

        let mut decoded = Vec::with_capacity(count.min(1 << 16));
        for _ in 0..count {
            let len = read_i32(reader)?;
            let len = usize::try_from(len).map_err(|_| HoloIndexError::Snapshot {
                message: format!("negative term length {len}"),
            })?;
            let mut bytes = Vec::with_capacity(len.min(1 << 12));
            let read = (&mut *reader).take(len as u64).read_to_end(&mut bytes)?;
            if read != len {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("term declares {len} bytes, only {read} available"),
                )
                .into());
            }
            let term = String::from_utf8(bytes).map_err(|e| HoloIndexError::Snapshot {
                message: format!("term is not valid UTF-8: {e}"),
            })?;

            let mut values = Vec::with_capacity(dimensions);
            let mut buf = [0u8; 8];
            for _ in 0..dimensions {
                reader.read_exact(&mut buf)?;
                values.push(f64::from_be_bytes(buf));
            }
            let vector = if self.generator.is_ternary() {
                let ternary = TernaryVector::from_dense(&values).map_err(|_| HoloIndexError::Snapshot {
                    message: format!("vector for {term:?} is not ternary"),
                })?;
                IndexVector::Ternary(ternary)
            } else {
                IndexVector::Dense(values)
            };
            decoded.push((term, Arc::new(vector)));
        }

        self.vectors.clear();
        for (term, vector) in decoded {
            self.vectors.insert(term, vector);
        }
        info!(entries = count, dimensions, "Registry snapshot loaded");
        Ok(())
    }

    /// Writes the mapping to a file at `path`.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)
    }

    /// Replaces the mapping with the snapshot file at `path`.
    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut reader = BufReader::new(File::open(path)?);
        self.load(&mut reader)
    }
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}
