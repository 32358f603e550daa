//! External predictor outputs (netMHCpan, MHCflurry).
//!
//! Each tool's predictions arrive as a CSV keyed by peptide, optionally per
//! allele. Predicted IC50s are joined to the evaluation set by (allele,
//! peptide); files without an allele column apply to every allele.

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use log::info;
use std::collections::HashMap;
use std::path::Path;

/// Predictions from one external tool.
#[derive(Debug, Clone)]
pub struct ToolPredictions {
    pub tool: String,
    /// allele -> peptide -> predicted IC50 (nM); "" allele matches any
    by_allele: HashMap<String, HashMap<String, f64>>,
    n_rows: usize,
}

impl ToolPredictions {
    /// Load a tool's prediction CSV.
    pub fn load_csv(tool: impl Into<String>, path: &Path) -> Result<Self> {
        let tool = tool.into();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open {} predictions: {}", tool, path.display()))?;

        let headers = reader.headers()?.clone();
        let find_col = |names: &[&str]| -> Option<usize> {
            for name in names {
                if let Some(idx) = headers.iter().position(|h| h.eq_ignore_ascii_case(name)) {
                    return Some(idx);
                }
            }
            None
        };

        let peptide_col = find_col(&["peptide", "sequence"])
            .with_context(|| format!("{tool} predictions have no peptide column"))?;
        let ic50_col = find_col(&["ic50", "prediction", "predicted_ic50", "score", "aff"])
            .with_context(|| format!("{tool} predictions have no ic50 column"))?;
        let allele_col = find_col(&["allele", "mhc", "mhc_allele"]);

        let mut by_allele: HashMap<String, HashMap<String, f64>> = HashMap::new();
        let mut n_rows = 0usize;

        for result in reader.records() {
            let record = result?;

            let peptide = match record.get(peptide_col) {
                Some(p) if !p.trim().is_empty() => p.trim().to_ascii_uppercase(),
                _ => continue,
            };
            let ic50: f64 = match record.get(ic50_col).and_then(|s| s.trim().parse().ok()) {
                Some(v) if v > 0.0 && f64::is_finite(v) => v,
                _ => continue,
            };
            let allele = allele_col
                .and_then(|c| record.get(c))
                .map(|a| a.trim().to_string())
                .unwrap_or_default();

            by_allele.entry(allele).or_default().insert(peptide, ic50);
            n_rows += 1;
        }

        if n_rows == 0 {
            bail!("no usable predictions in {}", path.display());
        }

        info!("Loaded {} {} predictions from {}", n_rows, tool, path.display());

        Ok(Self {
            tool,
            by_allele,
            n_rows,
        })
    }

    /// Predicted IC50 for (allele, peptide), falling back to allele-agnostic
    /// rows.
    pub fn predicted_ic50(&self, allele: &str, peptide: &str) -> Option<f64> {
        if let Some(v) = self.by_allele.get(allele).and_then(|m| m.get(peptide)) {
            return Some(*v);
        }
        self.by_allele.get("").and_then(|m| m.get(peptide)).copied()
    }

    pub fn len(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_and_lookup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allele,peptide,ic50").unwrap();
        writeln!(file, "HLA-A*02:01,SIINFEKLV,42.0").unwrap();
        writeln!(file, "HLA-A*02:01,KVAELVHFL,9000").unwrap();
        file.flush().unwrap();

        let preds = ToolPredictions::load_csv("netmhcpan", file.path()).unwrap();
        assert_eq!(preds.len(), 2);
        assert_eq!(preds.predicted_ic50("HLA-A*02:01", "SIINFEKLV"), Some(42.0));
        assert_eq!(preds.predicted_ic50("HLA-B*07:02", "SIINFEKLV"), None);
    }

    #[test]
    fn test_allele_agnostic_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "peptide,prediction").unwrap();
        writeln!(file, "SIINFEKLV,55.5").unwrap();
        file.flush().unwrap();

        let preds = ToolPredictions::load_csv("mhcflurry", file.path()).unwrap();
        assert_eq!(preds.predicted_ic50("HLA-A*02:01", "SIINFEKLV"), Some(55.5));
    }
}
