//! Per-allele model training and persistence.
//!
//! One model per allele: encode that allele's peptides, fit the MLP on the
//! linearized IC50 target, and persist the artifact as a binary blob under
//! a models directory keyed by a filesystem-safe allele name.

use crate::metrics;
use crate::mlp::{MlpConfig, MlpRegressor, TrainingSet};
use epibind_core::{
    AffinityRecord, EncodingScheme, EpibindError, Peptide, Result, DEFAULT_BINDER_CUTOFF_NM,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Alleles with fewer usable samples than this are skipped.
pub const MIN_TRAINING_SAMPLES: usize = 200;

/// Configuration for per-allele training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Encoding scheme for peptide features
    pub scheme: EncodingScheme,
    /// Fixed peptide length; records of other lengths are dropped
    pub peptide_length: usize,
    /// Minimum usable samples per allele
    pub min_samples: usize,
    /// Binder cutoff (nM) used for the training AUC
    pub binder_cutoff_nm: f64,
    pub mlp: MlpConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            scheme: EncodingScheme::Blosum62,
            peptide_length: 9,
            min_samples: MIN_TRAINING_SAMPLES,
            binder_cutoff_nm: DEFAULT_BINDER_CUTOFF_NM,
            mlp: MlpConfig::default(),
        }
    }
}

/// Trained per-allele artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub allele: String,
    pub scheme: EncodingScheme,
    pub peptide_length: usize,
    pub model: MlpRegressor,
    pub n_train_samples: usize,
    /// ROC-AUC on the training set at the binder cutoff
    pub train_auc: f32,
    pub binder_cutoff_nm: f64,
}

impl TrainedModel {
    /// Predicted linearized affinity for one peptide.
    pub fn predict(&self, peptide: &Peptide) -> Result<f32> {
        if peptide.len() != self.peptide_length {
            return Err(EpibindError::LengthMismatch {
                expected: self.peptide_length,
                actual: peptide.len(),
            });
        }
        let features = self.scheme.encode(peptide);
        Ok(self.model.predict_one(&features))
    }

    /// Predict a batch of peptides. `workers` > 1 fans the batch out over a
    /// rayon pool of that size; otherwise prediction is sequential.
    pub fn predict_many(&self, peptides: &[Peptide], workers: Option<usize>) -> Result<Vec<f32>> {
        match workers {
            Some(n) if n > 1 => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| EpibindError::config(format!("thread pool: {e}")))?;
                pool.install(|| peptides.par_iter().map(|p| self.predict(p)).collect())
            }
            _ => peptides.iter().map(|p| self.predict(p)).collect(),
        }
    }

    /// Save to binary file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = bincode::serialize(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Load from binary file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        let model = bincode::deserialize(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        Ok(model)
    }

    /// Save a JSON mirror for inspection.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Train a model for one allele's records.
///
/// Records whose peptide length differs from the configured length are
/// dropped before the sample-count gate.
pub fn train_allele(
    allele: &str,
    records: &[AffinityRecord],
    config: &TrainerConfig,
) -> Result<TrainedModel> {
    let usable: Vec<&AffinityRecord> = records
        .iter()
        .filter(|r| r.peptide.len() == config.peptide_length)
        .collect();

    if usable.len() < config.min_samples {
        return Err(EpibindError::InsufficientData {
            allele: allele.to_string(),
            n_samples: usable.len(),
            min_samples: config.min_samples,
        });
    }

    let dim = config.scheme.encoded_len(config.peptide_length);
    let mut set = TrainingSet::new(dim);
    for record in &usable {
        let features = config.scheme.encode(&record.peptide);
        set.push(&features, record.target() as f32);
    }

    let mut model = MlpRegressor::new(dim, config.mlp.clone());
    let history = model.fit(&set);
    log::info!(
        "trained {}: {} samples, final mse {:.5}",
        allele,
        set.n_samples,
        history.last().copied().unwrap_or(f32::NAN)
    );

    let predictions = model.predict_set(&set);
    let labels: Vec<bool> = usable
        .iter()
        .map(|r| r.is_binder(config.binder_cutoff_nm))
        .collect();
    let train_auc = metrics::auc_roc(&predictions, &labels);

    Ok(TrainedModel {
        allele: allele.to_string(),
        scheme: config.scheme,
        peptide_length: config.peptide_length,
        model,
        n_train_samples: set.n_samples,
        train_auc,
        binder_cutoff_nm: config.binder_cutoff_nm,
    })
}

/// Filesystem-safe allele name: "HLA-A*01:01" -> "HLA-A-01-01".
pub fn sanitize_allele(allele: &str) -> String {
    allele
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
            c
        } else {
            '-'
        })
        .collect()
}

/// Directory of per-allele model artifacts.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Artifact path for an allele.
    pub fn path_for(&self, allele: &str) -> PathBuf {
        self.dir.join(format!("{}.bin", sanitize_allele(allele)))
    }

    /// Persist a model, creating the directory on first use.
    pub fn save(&self, model: &TrainedModel) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&model.allele);
        model.save(&path)?;
        Ok(path)
    }

    /// Load the artifact for an allele.
    pub fn load(&self, allele: &str) -> Result<TrainedModel> {
        TrainedModel::load(&self.path_for(allele))
    }

    /// Sanitized allele names with a stored artifact.
    pub fn alleles(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        if self.dir.is_dir() {
            for entry in fs::read_dir(&self.dir)? {
                let path = entry?.path();
                if path.extension().map(|e| e == "bin").unwrap_or(false) {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        names.push(stem.to_string());
                    }
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
