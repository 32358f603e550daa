//! MLP affinity regressor, per-allele training and persistence.
//!
//! ## Components
//!
//! - `MlpRegressor`: single-hidden-layer regressor trained by mini-batch SGD
//! - `TrainedModel` / `ModelStore`: per-allele artifacts on disk
//! - `metrics`: ROC-AUC, RMSE and Pearson r

pub mod metrics;
pub mod mlp;
pub mod trainer;

pub use mlp::{MlpConfig, MlpRegressor, TrainingSet};
pub use trainer::{
    sanitize_allele, train_allele, ModelStore, TrainedModel, TrainerConfig, MIN_TRAINING_SAMPLES,
};
