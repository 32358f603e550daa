//! The 20-letter amino-acid alphabet and validated peptide type.

use crate::error::EpibindError;
use std::fmt;
use std::str::FromStr;

/// Canonical residue order. Every encoding table in this crate is indexed
/// in this order.
pub const ALPHABET: [char; 20] = [
    'A', 'R', 'N', 'D', 'C', 'Q', 'E', 'G', 'H', 'I', 'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W', 'Y',
    'V',
];

/// Number of residues in [`ALPHABET`].
pub const ALPHABET_SIZE: usize = 20;

/// Index of a residue in [`ALPHABET`]. Case-insensitive; `None` for symbols
/// outside the alphabet (gap, ambiguity codes, junk).
pub fn residue_index(symbol: char) -> Option<usize> {
    let upper = symbol.to_ascii_uppercase();
    ALPHABET.iter().position(|&c| c == upper)
}

/// A peptide over the 20-letter alphabet.
///
/// Construction validates every symbol; downstream encoders can therefore
/// index their tables without rechecking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Peptide(String);

impl Peptide {
    /// Parse and validate a peptide. Input is trimmed and upper-cased.
    pub fn new(sequence: impl AsRef<str>) -> Result<Self, EpibindError> {
        let seq = sequence.as_ref().trim().to_ascii_uppercase();
        if seq.is_empty() {
            return Err(EpibindError::EmptyPeptide);
        }
        for (position, symbol) in seq.chars().enumerate() {
            if residue_index(symbol).is_none() {
                return Err(EpibindError::UnknownResidue {
                    peptide: seq.clone(),
                    symbol,
                    position,
                });
            }
        }
        Ok(Self(seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of residues.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Alphabet index of each residue, in sequence order.
    pub fn residue_indices(&self) -> Vec<usize> {
        // Safe to unwrap: validated at construction.
        self.0
            .chars()
            .map(|c| residue_index(c).expect("validated peptide"))
            .collect()
    }
}

impl fmt::Display for Peptide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Peptide {
    type Err = EpibindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Peptide::new(s)
    }
}
