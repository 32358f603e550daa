//! Benchmark harness for peptide-MHC affinity prediction.
//!
//! Loads IEDB-style affinity CSVs, trains per-allele models, and scores them
//! against external predictors (netMHCpan, MHCflurry) on held-out peptides.

pub mod dataset;
pub mod figures;
pub mod harness;
pub mod tools;

pub use dataset::{split_records, AffinityDataset};
pub use harness::{AlleleResult, BenchmarkConfig, BenchmarkSummary};
pub use tools::ToolPredictions;
