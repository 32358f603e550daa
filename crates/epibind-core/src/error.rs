//! Error types for epibind.

use thiserror::Error;

/// Unified error type for encoding, training and persistence operations.
#[derive(Error, Debug)]
pub enum EpibindError {
    /// Symbol outside the 20-letter amino-acid alphabet
    #[error("unknown residue '{symbol}' at position {position} in peptide '{peptide}'")]
    UnknownResidue {
        peptide: String,
        symbol: char,
        position: usize,
    },

    /// Empty peptide string
    #[error("empty peptide")]
    EmptyPeptide,

    /// Peptide length does not match what a model was trained on
    #[error("peptide length {actual} does not match expected length {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Too few training samples for an allele
    #[error("allele '{allele}' has {n_samples} samples, need at least {min_samples}")]
    InsufficientData {
        allele: String,
        n_samples: usize,
        min_samples: usize,
    },

    /// Configuration validation errors
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors (dataset files, model artifacts)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EpibindError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        EpibindError::Config(message.into())
    }
}
