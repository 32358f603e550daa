//! IEDB-style affinity dataset loading.
//!
//! Input CSVs are tabular (allele, peptide, ic50, length). Column positions
//! are located by header name, so exports carrying extra columns load
//! unchanged. Rows with unknown residues, unparsable IC50s or a stated
//! length that disagrees with the sequence are skipped, not fatal.

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use epibind_core::{AffinityRecord, Peptide};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::path::Path;

/// A loaded affinity dataset.
#[derive(Debug, Clone, Default)]
pub struct AffinityDataset {
    pub records: Vec<AffinityRecord>,
}

impl AffinityDataset {
    /// Load from a CSV file with headers.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

        let headers = reader.headers()?.clone();

        let find_col = |names: &[&str]| -> Option<usize> {
            for name in names {
                if let Some(idx) = headers.iter().position(|h| h.eq_ignore_ascii_case(name)) {
                    return Some(idx);
                }
            }
            None
        };

        let allele_col = find_col(&["allele", "mhc", "mhc_allele"])
            .context("dataset has no allele column")?;
        let peptide_col = find_col(&["peptide", "sequence", "linear_sequence"])
            .context("dataset has no peptide column")?;
        let ic50_col = find_col(&["ic50", "meas", "measurement_value", "affinity"])
            .context("dataset has no ic50 column")?;
        let length_col = find_col(&["length", "peptide_length"]);

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result?;

            let allele = match record.get(allele_col) {
                Some(a) if !a.trim().is_empty() => a.trim().to_string(),
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let ic50: f64 = match record.get(ic50_col).and_then(|s| s.trim().parse().ok()) {
                Some(v) if v > 0.0 && f64::is_finite(v) => v,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let peptide = match record.get(peptide_col).map(Peptide::new) {
                Some(Ok(p)) => p,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            // Stated length must agree with the sequence when present
            if let Some(lc) = length_col {
                if let Some(stated) = record.get(lc).and_then(|s| s.trim().parse::<usize>().ok()) {
                    if stated != peptide.len() {
                        skipped += 1;
                        continue;
                    }
                }
            }

            records.push(AffinityRecord::new(allele, peptide, ic50));
        }

        if records.is_empty() {
            bail!("no usable affinity records in {}", path.display());
        }

        info!(
            "Loaded {} affinity records from {} ({} rows skipped)",
            records.len(),
            path.display(),
            skipped
        );

        Ok(Self { records })
    }

    /// Keep only records of one peptide length.
    pub fn filter_length(&self, length: usize) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| r.peptide.len() == length)
                .cloned()
                .collect(),
        }
    }

    /// Records grouped per allele, allele order stable.
    pub fn by_allele(&self) -> BTreeMap<String, Vec<AffinityRecord>> {
        let mut groups: BTreeMap<String, Vec<AffinityRecord>> = BTreeMap::new();
        for record in &self.records {
            groups
                .entry(record.allele.clone())
                .or_default()
                .push(record.clone());
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Shuffle-split records into (train, eval) by a held-out fraction.
pub fn split_records(
    records: &[AffinityRecord],
    test_fraction: f32,
    seed: u64,
) -> Result<(Vec<AffinityRecord>, Vec<AffinityRecord>)> {
    if !(0.0..1.0).contains(&test_fraction) {
        bail!("test fraction {test_fraction} out of range, must be in [0, 1)");
    }

    let mut shuffled: Vec<AffinityRecord> = records.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let n_test = (test_fraction * records.len() as f32) as usize;
    let eval = shuffled.split_off(records.len() - n_test);

    if eval.is_empty() && test_fraction > 0.0 {
        warn!("evaluation split is empty ({} records)", records.len());
    }

    Ok((shuffled, eval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_csv_locates_columns() {
        let file = write_csv(
            "species,allele,peptide,length,ic50\n\
             human,HLA-A*02:01,SIINFEKLV,9,120.5\n\
             human,HLA-A*02:01,KVAELVHFL,9,4500\n\
             human,HLA-B*07:02,APRTLVLLL,9,30\n",
        );
        let ds = AffinityDataset::load_csv(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        let groups = ds.by_allele();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["HLA-A*02:01"].len(), 2);
    }

    #[test]
    fn test_load_csv_skips_bad_rows() {
        let file = write_csv(
            "allele,peptide,length,ic50\n\
             HLA-A*02:01,SIINFEKLV,9,120.5\n\
             HLA-A*02:01,SIINFEKXV,9,50\n\
             HLA-A*02:01,KVAELVHFL,9,not_a_number\n\
             HLA-A*02:01,KVAELVHFL,8,77\n\
             HLA-A*02:01,LLFGYPVYV,9,33\n",
        );
        let ds = AffinityDataset::load_csv(file.path()).unwrap();
        // unknown residue, bad ic50 and length mismatch rows are dropped
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_load_csv_no_usable_rows() {
        let file = write_csv("allele,peptide,ic50\nHLA-A*02:01,SIINFEKXV,50\n");
        assert!(AffinityDataset::load_csv(file.path()).is_err());
    }

    #[test]
    fn test_filter_length() {
        let file = write_csv(
            "allele,peptide,ic50\n\
             HLA-A*02:01,SIINFEKLV,120.5\n\
             HLA-A*02:01,ACDEFGHI,99\n",
        );
        let ds = AffinityDataset::load_csv(file.path()).unwrap();
        assert_eq!(ds.filter_length(9).len(), 1);
        assert_eq!(ds.filter_length(8).len(), 1);
    }

    #[test]
    fn test_split_records() {
        let ds = {
            let file = write_csv(
                "allele,peptide,ic50\n\
                 HLA-A*02:01,SIINFEKLV,120.5\n\
                 HLA-A*02:01,KVAELVHFL,4500\n\
                 HLA-A*02:01,LLFGYPVYV,33\n\
                 HLA-A*02:01,APRTLVLLL,800\n\
                 HLA-A*02:01,GILGFVFTL,12\n",
            );
            AffinityDataset::load_csv(file.path()).unwrap()
        };

        let (train, eval) = split_records(&ds.records, 0.4, 7).unwrap();
        assert_eq!(train.len() + eval.len(), 5);
        assert_eq!(eval.len(), 2);

        assert!(split_records(&ds.records, 1.5, 7).is_err());
    }
}
