//! Numeric peptide encodings.
//!
//! Three schemes, all position-wise concatenations over the residue order of
//! [`ALPHABET`](crate::alphabet::ALPHABET):
//! - one-hot: 20-dim indicator per position
//! - BLOSUM62: the residue's 21-value substitution column (gap row included)
//! - NLF: 19 Fisher-transform physicochemical descriptors per residue

use crate::alphabet::Peptide;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-position width of the one-hot encoding.
pub const ONE_HOT_WIDTH: usize = 20;

/// Per-position width of the BLOSUM62 encoding (20 residues + gap).
pub const BLOSUM62_WIDTH: usize = 21;

/// Per-position width of the NLF encoding.
pub const NLF_WIDTH: usize = 19;

/// BLOSUM62 substitution matrix, rows and columns in [`ALPHABET`] order with
/// the gap symbol `*` appended. Symmetric; the gap scores -4 against every
/// residue and 1 against itself.
#[rustfmt::skip]
const BLOSUM62: [[i8; BLOSUM62_WIDTH]; BLOSUM62_WIDTH] = [
    //A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V   *
    [ 4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -4], // A
    [-1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -4], // R
    [-2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3, -4], // N
    [-2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3, -4], // D
    [ 0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -4], // C
    [-1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2, -4], // Q
    [-1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2, -4], // E
    [ 0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -4], // G
    [-2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3, -4], // H
    [-1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -4], // I
    [-1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4], // L
    [-1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2, -4], // K
    [-1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -4], // M
    [-2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -4], // F
    [-1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -4], // P
    [ 1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2, -4], // S
    [ 0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -4], // T
    [-3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4], // W
    [-2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -4], // Y
    [ 0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -4], // V
    [-4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1], // *
];

/// Nanni-Lumini Fisher-transform descriptors, one 19-value row per residue
/// in [`ALPHABET`] order. Reference table values; components are ordered by
/// decreasing discriminative weight.
#[rustfmt::skip]
const NLF: [[f32; NLF_WIDTH]; 20] = [
    // A
    [-1.38, -1.63, -0.44,  0.32,  0.22,  0.29, -0.51, -0.87,  0.62,  0.18, -0.43,  0.38,  0.06, -0.29,  0.16, -0.10,  0.04, -0.11,  0.02],
    // R
    [ 2.07,  0.38, -1.64, -0.73,  1.58, -0.54,  0.39,  0.26, -0.84,  0.47,  0.16, -0.25,  0.35,  0.12, -0.27,  0.14, -0.08,  0.06, -0.03],
    // N
    [ 0.99,  0.24,  1.14, -0.45, -0.34,  0.77,  0.52, -0.41,  0.27, -0.66,  0.31,  0.21, -0.18,  0.09,  0.23, -0.12,  0.07, -0.04,  0.01],
    // D
    [ 1.30,  0.42,  1.76,  0.64, -0.51, -0.38,  0.67,  0.33, -0.29,  0.42, -0.22, -0.31,  0.15, -0.13,  0.08,  0.17, -0.06,  0.03, -0.02],
    // C
    [-0.96, -0.53,  0.83, -1.78,  1.24,  0.95, -0.42,  0.61,  0.38, -0.27,  0.44, -0.16,  0.22,  0.07, -0.14,  0.05, -0.09,  0.08,  0.04],
    // Q
    [ 1.25,  0.06, -0.35, -0.59,  0.28,  0.69,  0.61, -0.36, -0.48,  0.23,  0.27,  0.33, -0.21,  0.16, -0.07, -0.15,  0.11, -0.05,  0.02],
    // E
    [ 1.47,  0.21,  0.68,  0.77, -0.24, -0.62,  0.84,  0.42, -0.33, -0.21, -0.36,  0.18,  0.29, -0.08,  0.12,  0.09, -0.13,  0.04, -0.01],
    // G
    [-0.74, -1.94,  0.77,  0.94, -0.41,  0.63, -0.58,  0.51,  0.44, -0.35,  0.19, -0.27, -0.11,  0.21, -0.18,  0.06,  0.08, -0.07,  0.03],
    // H
    [ 0.89,  0.73, -0.78, -0.17,  1.12,  0.85, -0.29, -0.54,  0.71,  0.39, -0.24,  0.29, -0.16, -0.22,  0.13, -0.04,  0.05,  0.09, -0.06],
    // I
    [-1.61,  0.98, -0.62,  0.71, -0.27, -0.44,  0.36,  0.58, -0.19, -0.41,  0.52, -0.12,  0.24,  0.14, -0.21,  0.11, -0.02,  0.05,  0.07],
    // L
    [-1.55,  1.02, -0.51,  0.57,  0.34, -0.58,  0.27, -0.63,  0.41,  0.28, -0.47,  0.22, -0.26,  0.18,  0.09, -0.13,  0.06, -0.08,  0.01],
    // K
    [ 1.86,  0.31, -1.21,  0.19, -1.37,  0.46, -0.44,  0.37,  0.56, -0.32,  0.21,  0.41, -0.14, -0.19,  0.22,  0.08, -0.11,  0.02,  0.05],
    // M
    [-1.12,  0.84, -0.43, -0.68,  0.49,  0.62, -0.31,  0.44, -0.52,  0.36,  0.33, -0.35,  0.17, -0.06, -0.16,  0.12,  0.09, -0.03, -0.04],
    // F
    [-1.84,  1.21,  0.55, -0.34, -0.63,  0.37,  0.48, -0.26, -0.38, -0.53,  0.26,  0.31, -0.23,  0.25,  0.11, -0.09, -0.05,  0.07,  0.02],
    // P
    [ 0.33, -1.41,  1.32,  1.08,  0.76, -0.73, -0.36,  0.29, -0.44,  0.51, -0.28, -0.17,  0.32, -0.15,  0.19, -0.07,  0.12,  0.04, -0.05],
    // S
    [-0.23, -1.12,  0.41, -0.28, -0.45,  0.54,  0.63,  0.48,  0.25, -0.38, -0.31,  0.14, -0.22,  0.17, -0.12,  0.18,  0.03, -0.06,  0.04],
    // T
    [-0.44, -0.66, -0.18,  0.23, -0.62,  0.41, -0.57,  0.55, -0.27,  0.44,  0.29, -0.23,  0.19,  0.24, -0.09, -0.16, -0.07,  0.11,  0.03],
    // W
    [-1.52,  1.88,  1.07,  0.48,  0.81,  0.19, -0.41, -0.48,  0.36, -0.24, -0.39,  0.27,  0.21, -0.27, -0.13,  0.15, -0.04, -0.09,  0.06],
    // Y
    [-0.71,  1.44,  0.86, -0.52,  0.29, -0.68,  0.53,  0.34,  0.47,  0.31, -0.18, -0.42, -0.25,  0.13,  0.21, -0.11,  0.14,  0.05, -0.07],
    // V
    [-1.27,  0.44, -0.74,  0.58, -0.19, -0.29, -0.62,  0.46,  0.22, -0.49,  0.37,  0.26,  0.13, -0.31,  0.14,  0.04, -0.15, -0.02,  0.08],
];

/// Peptide encoding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingScheme {
    /// 20-dim indicator per position.
    OneHot,
    /// BLOSUM62 substitution column per position.
    Blosum62,
    /// Nanni-Lumini Fisher-transform descriptors per position.
    Nlf,
}

impl EncodingScheme {
    /// Per-position width of the encoded vector.
    pub fn width(&self) -> usize {
        match self {
            EncodingScheme::OneHot => ONE_HOT_WIDTH,
            EncodingScheme::Blosum62 => BLOSUM62_WIDTH,
            EncodingScheme::Nlf => NLF_WIDTH,
        }
    }

    /// Total encoded dimension for a peptide of `peptide_len` residues.
    pub fn encoded_len(&self, peptide_len: usize) -> usize {
        self.width() * peptide_len
    }

    /// Encode a peptide as a flat feature vector, position blocks
    /// concatenated in sequence order.
    pub fn encode(&self, peptide: &Peptide) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.encoded_len(peptide.len()));
        for idx in peptide.residue_indices() {
            match self {
                EncodingScheme::OneHot => {
                    let mut block = [0.0f32; ONE_HOT_WIDTH];
                    block[idx] = 1.0;
                    out.extend_from_slice(&block);
                }
                EncodingScheme::Blosum62 => {
                    out.extend(BLOSUM62[idx].iter().map(|&v| v as f32));
                }
                EncodingScheme::Nlf => {
                    out.extend_from_slice(&NLF[idx]);
                }
            }
        }
        out
    }

    pub fn name(&self) -> &'static str {
        match self {
            EncodingScheme::OneHot => "onehot",
            EncodingScheme::Blosum62 => "blosum62",
            EncodingScheme::Nlf => "nlf",
        }
    }
}

impl fmt::Display for EncodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncodingScheme {
    type Err = crate::error::EpibindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onehot" | "one-hot" | "one_hot" => Ok(EncodingScheme::OneHot),
            "blosum" | "blosum62" => Ok(EncodingScheme::Blosum62),
            "nlf" => Ok(EncodingScheme::Nlf),
            other => Err(crate::error::EpibindError::config(format!(
                "unknown encoding scheme '{other}' (expected onehot, blosum62 or nlf)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::ALPHABET_SIZE;

    #[test]
    fn test_one_hot_single_bit_per_block() {
        let p = Peptide::new("SIINFEKLV").unwrap();
        let v = EncodingScheme::OneHot.encode(&p);
        assert_eq!(v.len(), ONE_HOT_WIDTH * 9);

        for block in v.chunks(ALPHABET_SIZE) {
            let ones = block.iter().filter(|&&x| x == 1.0).count();
            let zeros = block.iter().filter(|&&x| x == 0.0).count();
            assert_eq!(ones, 1);
            assert_eq!(zeros, ALPHABET_SIZE - 1);
        }
    }

    #[test]
    fn test_encoded_dimensions() {
        let p = Peptide::new("SIINFEKLV").unwrap();
        assert_eq!(EncodingScheme::Blosum62.encode(&p).len(), 21 * 9);
        assert_eq!(EncodingScheme::Nlf.encode(&p).len(), 19 * 9);

        let short = Peptide::new("ACDEF").unwrap();
        assert_eq!(EncodingScheme::OneHot.encode(&short).len(), 20 * 5);
    }

    #[test]
    fn test_blosum62_symmetric_with_canonical_diagonal() {
        for i in 0..BLOSUM62_WIDTH {
            for j in 0..BLOSUM62_WIDTH {
                assert_eq!(BLOSUM62[i][j], BLOSUM62[j][i], "asymmetry at ({i},{j})");
            }
        }
        // C and W self-scores are the extremes of the matrix
        assert_eq!(BLOSUM62[4][4], 9); // C
        assert_eq!(BLOSUM62[17][17], 11); // W
        assert_eq!(BLOSUM62[0][0], 4); // A
    }

    #[test]
    fn test_encoding_deterministic() {
        let p = Peptide::new("KVAELVHFL").unwrap();
        for scheme in [
            EncodingScheme::OneHot,
            EncodingScheme::Blosum62,
            EncodingScheme::Nlf,
        ] {
            assert_eq!(scheme.encode(&p), scheme.encode(&p));
        }
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!(
            "blosum62".parse::<EncodingScheme>().unwrap(),
            EncodingScheme::Blosum62
        );
        assert_eq!(
            "one-hot".parse::<EncodingScheme>().unwrap(),
            EncodingScheme::OneHot
        );
        assert_eq!("NLF".parse::<EncodingScheme>().unwrap(), EncodingScheme::Nlf);
        assert!("pam250".parse::<EncodingScheme>().is_err());
    }
}
