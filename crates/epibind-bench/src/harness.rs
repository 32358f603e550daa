//! Allele-by-allele benchmark of the MLP against external predictors.
//!
//! For each allele with enough data: shuffle-split, train on the larger
//! half, score ROC-AUC on the held-out peptides at the binder cutoff, and
//! score each external tool's predictions on the same held-out set. A
//! failure aborts only that allele's row (logged and skipped).

use crate::dataset::{split_records, AffinityDataset};
use crate::tools::ToolPredictions;
use anyhow::{bail, Result};
use epibind_core::{linearize_ic50, AffinityRecord};
use epibind_model::{metrics, train_allele, TrainerConfig};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Benchmark configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Held-out fraction per allele
    pub test_fraction: f32,
    /// Shuffle seed
    pub seed: u64,
    /// Cap on the number of alleles evaluated (largest first)
    pub max_alleles: Option<usize>,
    /// Per-allele training configuration; its binder cutoff is also the
    /// evaluation cutoff
    pub trainer: TrainerConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            max_alleles: None,
            trainer: TrainerConfig::default(),
        }
    }
}

/// One allele's evaluation row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlleleResult {
    pub allele: String,
    pub n_train: usize,
    pub n_eval: usize,
    /// ROC-AUC of the trained MLP on the held-out set
    pub auc_model: f32,
    /// RMSE of the MLP against the linearized targets
    pub rmse_model: f32,
    /// Pearson r of the MLP against the linearized targets
    pub pearson_model: f32,
    /// ROC-AUC per external tool; None when too few of the held-out
    /// peptides were covered by the tool's predictions
    pub tool_auc: BTreeMap<String, Option<f32>>,
}

/// Aggregated benchmark results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    pub tools: Vec<String>,
    pub results: Vec<AlleleResult>,
}

impl BenchmarkSummary {
    /// Run the benchmark over every allele in the dataset.
    pub fn run(
        dataset: &AffinityDataset,
        tools: &[ToolPredictions],
        config: &BenchmarkConfig,
    ) -> Self {
        let filtered = dataset.filter_length(config.trainer.peptide_length);
        let groups = filtered.by_allele();

        // Largest alleles first
        let mut alleles: Vec<(&String, &Vec<AffinityRecord>)> = groups.iter().collect();
        alleles.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(b.0)));
        if let Some(max) = config.max_alleles {
            alleles.truncate(max);
        }

        let mut results = Vec::new();
        for (allele, records) in alleles {
            if records.len() < config.trainer.min_samples {
                info!(
                    "skipping {}: {} samples < {}",
                    allele,
                    records.len(),
                    config.trainer.min_samples
                );
                continue;
            }
            match Self::run_allele(allele, records, tools, config) {
                Ok(result) => {
                    info!(
                        "{}: auc {:.3} over {} held-out peptides",
                        allele, result.auc_model, result.n_eval
                    );
                    results.push(result);
                }
                Err(e) => warn!("allele {} skipped: {}", allele, e),
            }
        }

        Self {
            tools: tools.iter().map(|t| t.tool.clone()).collect(),
            results,
        }
    }

    fn run_allele(
        allele: &str,
        records: &[AffinityRecord],
        tools: &[ToolPredictions],
        config: &BenchmarkConfig,
    ) -> Result<AlleleResult> {
        let (train, eval) = split_records(records, config.test_fraction, config.seed)?;
        if eval.is_empty() {
            bail!("empty evaluation split");
        }

        let cutoff = config.trainer.binder_cutoff_nm;
        let labels: Vec<bool> = eval.iter().map(|r| r.is_binder(cutoff)).collect();
        if labels.iter().all(|&l| l) || labels.iter().all(|&l| !l) {
            bail!("single-class evaluation set at {cutoff} nM");
        }

        let model = train_allele(allele, &train, &config.trainer)?;
        let mut scores = Vec::with_capacity(eval.len());
        for record in &eval {
            scores.push(model.predict(&record.peptide)?);
        }
        let targets: Vec<f32> = eval.iter().map(|r| r.target() as f32).collect();
        let auc_model = metrics::auc_roc(&scores, &labels);
        let rmse_model = metrics::rmse(&scores, &targets);
        let pearson_model = metrics::pearson_r(&scores, &targets);

        let mut tool_auc = BTreeMap::new();
        for tool in tools {
            tool_auc.insert(tool.tool.clone(), Self::score_tool(tool, &eval, cutoff));
        }

        Ok(AlleleResult {
            allele: allele.to_string(),
            n_train: train.len(),
            n_eval: eval.len(),
            auc_model,
            rmse_model,
            pearson_model,
            tool_auc,
        })
    }

    /// AUC of one tool's predictions on the held-out records, or None when
    /// coverage is too thin to score.
    fn score_tool(tool: &ToolPredictions, eval: &[AffinityRecord], cutoff_nm: f64) -> Option<f32> {
        let mut scores = Vec::new();
        let mut labels = Vec::new();
        for record in eval {
            if let Some(ic50) = tool.predicted_ic50(&record.allele, record.peptide.as_str()) {
                scores.push(linearize_ic50(ic50) as f32);
                labels.push(record.is_binder(cutoff_nm));
            }
        }
        if scores.len() < 2 || labels.iter().all(|&l| l) || labels.iter().all(|&l| !l) {
            return None;
        }
        Some(metrics::auc_roc(&scores, &labels))
    }

    /// Write one row per allele: allele, sizes, AUC per method.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec![
            "allele".to_string(),
            "n_train".to_string(),
            "n_eval".to_string(),
            "auc_mlp".to_string(),
            "rmse_mlp".to_string(),
            "pearson_mlp".to_string(),
        ];
        header.extend(self.tools.iter().map(|t| format!("auc_{t}")));
        writer.write_record(&header)?;

        for result in &self.results {
            let mut row = vec![
                result.allele.clone(),
                result.n_train.to_string(),
                result.n_eval.to_string(),
                format!("{:.4}", result.auc_model),
                format!("{:.4}", result.rmse_model),
                format!("{:.4}", result.pearson_model),
            ];
            for tool in &self.tools {
                row.push(match result.tool_auc.get(tool) {
                    Some(Some(auc)) => format!("{auc:.4}"),
                    _ => String::new(),
                });
            }
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Mean model AUC across evaluated alleles.
    pub fn mean_auc(&self) -> f32 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.results.iter().map(|r| r.auc_model).sum::<f32>() / self.results.len() as f32
    }

    /// Formatted comparison table.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let width = self
            .results
            .iter()
            .map(|r| r.allele.len())
            .max()
            .unwrap_or(6)
            .max(6);

        out.push_str(&format!(
            "{:width$}  {:>7}  {:>7}  {:>8}",
            "allele", "n_train", "n_eval", "mlp"
        ));
        for tool in &self.tools {
            out.push_str(&format!("  {:>10}", tool));
        }
        out.push('\n');

        for result in &self.results {
            out.push_str(&format!(
                "{:width$}  {:>7}  {:>7}  {:>8.3}",
                result.allele, result.n_train, result.n_eval, result.auc_model
            ));
            for tool in &self.tools {
                match result.tool_auc.get(tool) {
                    Some(Some(auc)) => out.push_str(&format!("  {auc:>10.3}")),
                    _ => out.push_str(&format!("  {:>10}", "-")),
                }
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "{:width$}  {:>7}  {:>7}  {:>8.3}\n",
            "mean",
            "",
            "",
            self.mean_auc()
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epibind_core::{Peptide, ALPHABET};
    use epibind_model::MlpConfig;
    use std::io::Write;

    /// Synthetic allele: leucine-anchored peptides bind, aspartate-anchored
    /// do not.
    fn synthetic_dataset(allele: &str, n: usize) -> AffinityDataset {
        let mut records = Vec::with_capacity(n);
        for i in 0..n {
            let mut seq = String::new();
            for pos in 0..9 {
                let idx = (i * 7 + pos * 3) % ALPHABET.len();
                seq.push(ALPHABET[idx]);
            }
            let strong = i % 2 == 0;
            let seq = if strong {
                format!("L{}", &seq[1..])
            } else {
                format!("D{}", &seq[1..])
            };
            let ic50 = if strong { 25.0 + i as f64 } else { 9_000.0 + i as f64 };
            records.push(AffinityRecord::new(allele, Peptide::new(seq).unwrap(), ic50));
        }
        AffinityDataset { records }
    }

    fn test_config() -> BenchmarkConfig {
        let mut config = BenchmarkConfig {
            test_fraction: 0.25,
            seed: 3,
            max_alleles: None,
            trainer: TrainerConfig {
                min_samples: 20,
                mlp: MlpConfig {
                    epochs: 40,
                    ..Default::default()
                },
                ..Default::default()
            },
        };
        config.trainer.binder_cutoff_nm = 500.0;
        config
    }

    #[test]
    fn test_run_produces_rows() {
        let mut dataset = synthetic_dataset("HLA-A*02:01", 80);
        dataset
            .records
            .extend(synthetic_dataset("HLA-B*07:02", 60).records);

        let summary = BenchmarkSummary::run(&dataset, &[], &test_config());
        assert_eq!(summary.results.len(), 2);
        // Largest allele first
        assert_eq!(summary.results[0].allele, "HLA-A*02:01");
        for row in &summary.results {
            assert!(row.auc_model >= 0.0 && row.auc_model <= 1.0);
            assert!(row.n_eval > 0);
        }
    }

    #[test]
    fn test_small_alleles_skipped() {
        let dataset = synthetic_dataset("HLA-A*02:01", 10);
        let summary = BenchmarkSummary::run(&dataset, &[], &test_config());
        assert!(summary.results.is_empty());
    }

    #[test]
    fn test_perfect_tool_scores_one() {
        let dataset = synthetic_dataset("HLA-A*02:01", 80);

        // Tool predictions that repeat the measured IC50s exactly
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allele,peptide,ic50").unwrap();
        for record in &dataset.records {
            writeln!(
                file,
                "{},{},{}",
                record.allele,
                record.peptide.as_str(),
                record.ic50_nm
            )
            .unwrap();
        }
        file.flush().unwrap();
        let tool = ToolPredictions::load_csv("netmhcpan", file.path()).unwrap();

        let summary = BenchmarkSummary::run(&dataset, &[tool], &test_config());
        assert_eq!(summary.results.len(), 1);
        let auc = summary.results[0].tool_auc["netmhcpan"].unwrap();
        assert!((auc - 1.0).abs() < 1e-6, "perfect tool auc = {auc}");
    }

    #[test]
    fn test_write_csv_and_report() {
        let dataset = synthetic_dataset("HLA-A*02:01", 60);
        let summary = BenchmarkSummary::run(&dataset, &[], &test_config());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        summary.write_csv(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("allele,n_train,n_eval,auc_mlp"));
        assert_eq!(content.lines().count(), 2);

        let report = summary.report();
        assert!(report.contains("HLA-A*02:01"));
        assert!(report.contains("mean"));
    }
}
