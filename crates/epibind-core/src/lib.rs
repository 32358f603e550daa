//! Core types for peptide-MHC binding affinity prediction.
//!
//! Provides the amino-acid alphabet, a validated peptide type, the numeric
//! encoding schemes (one-hot, BLOSUM62, NLF) and IC50 target linearization
//! shared by the model and benchmark crates.

pub mod affinity;
pub mod alphabet;
pub mod encoding;
pub mod error;

pub use affinity::{
    delinearize, linearize_ic50, AffinityRecord, DEFAULT_BINDER_CUTOFF_NM, IC50_CEILING_NM,
};
pub use alphabet::{residue_index, Peptide, ALPHABET, ALPHABET_SIZE};
pub use encoding::{EncodingScheme, BLOSUM62_WIDTH, NLF_WIDTH, ONE_HOT_WIDTH};
pub use error::EpibindError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EpibindError>;
