/* src/error.rs */
//! # Error Taxonomy
//!
//! Structured errors for the index-vector engine. Configuration problems are
//! surfaced eagerly by constructors; lookups of unseen terms never fail because
//! they are resolved by generation.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use thiserror::Error;

/// Unified error type for the holoindex engine.
///
/// Each variant carries enough context to tell a misconfigured run apart from a
/// misused API or a failed snapshot read.
#[derive(Error, Debug)]
pub enum HoloIndexError {
    /// Invalid construction parameters (zero dimensions, zero window, bad σ, ...).
    #[error("Configuration Error: {0}")]
    Configuration(String),

    /// Two vectors that must share a dimensionality do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality the component was built for
        expected: usize,
        /// Dimensionality that was supplied
        actual: usize,
    },

    /// A permutation exponent beyond what the table was provisioned for.
    #[error("Permutation exponent {requested} exceeds provisioned maximum {provisioned}")]
    ExponentOutOfRange {
        /// Absolute exponent requested by the caller
        requested: usize,
        /// Largest exponent present in the table
        provisioned: usize,
    },

    /// A component was used before its one-time initialization.
    #[error("System not initialized: {message}")]
    NotInitialized {
        /// Description of what needs to be initialized
        message: String,
    },

    /// A vector of the wrong concrete representation was supplied.
    #[error("Representation mismatch: expected {expected} vector, got {actual}")]
    RepresentationMismatch {
        /// Representation the operation requires
        expected: &'static str,
        /// Representation that was supplied
        actual: &'static str,
    },

    /// A snapshot stream was structurally invalid.
    #[error("Snapshot Error: {message}")]
    Snapshot {
        /// Description of the malformed content
        message: String,
    },

    /// An error related to system I/O.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    /// An error related to serialization/deserialization operations.
    #[error("Serialization Error: {message}")]
    Serialization {
        /// Description of the serialization failure
        message: String,
    },
}

impl From<serde_json::Error> for HoloIndexError {
    #[inline]
    fn from(error: serde_json::Error) -> Self {
        HoloIndexError::Serialization { message: error.to_string() }
    }
}

impl From<serde_yaml::Error> for HoloIndexError {
    #[inline]
    fn from(error: serde_yaml::Error) -> Self {
        HoloIndexError::Serialization { message: error.to_string() }
    }
}

/// A specialized `Result` type for holoindex operations.
pub type Result<T> = std::result::Result<T, HoloIndexError>;

impl HoloIndexError {
    /// Shorthand for a [`HoloIndexError::Configuration`] error.
    pub fn config(message: impl Into<String>) -> Self {
        HoloIndexError::Configuration(message.into())
    }

    /// Returns `true` for errors that indicate a misconfigured run rather than bad data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HoloIndexError::Configuration(_)
                | HoloIndexError::ExponentOutOfRange { .. }
                | HoloIndexError::NotInitialized { .. }
        )
    }
}
