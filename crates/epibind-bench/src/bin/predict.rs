//! Predict binding affinity for peptides with a trained allele model.
//!
//! Usage:
//!   cargo run --release --bin predict -- \
//!     --models-dir models --allele "HLA-A*02:01" SIINFEKLV KVAELVHFL

use anyhow::{bail, Context, Result};
use clap::Parser;
use epibind_core::{delinearize, Peptide};
use epibind_model::ModelStore;
use std::fs;
use std::path::PathBuf;

/// Affinity prediction tool
#[derive(Parser)]
#[command(name = "predict")]
#[command(about = "Predict peptide-MHC binding affinity with a trained model")]
struct Cli {
    /// Directory of trained model artifacts
    #[arg(long, default_value = "models")]
    models_dir: PathBuf,

    /// Allele to predict for, e.g. "HLA-A*02:01"
    #[arg(long)]
    allele: String,

    /// File with one peptide per line
    #[arg(long)]
    peptides_file: Option<PathBuf>,

    /// Worker threads for batch prediction
    #[arg(long)]
    workers: Option<usize>,

    /// Binder cutoff (nM) for the binder column; defaults to the cutoff the
    /// model was trained with
    #[arg(long)]
    cutoff: Option<f64>,

    /// Peptides given directly on the command line
    peptides: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let store = ModelStore::new(&cli.models_dir);
    let model = store
        .load(&cli.allele)
        .with_context(|| format!("no trained model for '{}'", cli.allele))?;
    let cutoff = cli.cutoff.unwrap_or(model.binder_cutoff_nm);

    let mut raw: Vec<String> = cli.peptides.clone();
    if let Some(path) = &cli.peptides_file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        raw.extend(
            content
                .lines()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        );
    }
    if raw.is_empty() {
        bail!("no peptides given (positional arguments or --peptides-file)");
    }

    let mut peptides = Vec::with_capacity(raw.len());
    for s in &raw {
        match Peptide::new(s) {
            Ok(p) => peptides.push(p),
            Err(e) => log::warn!("skipping '{}': {}", s, e),
        }
    }

    let scores = model.predict_many(&peptides, cli.workers)?;

    println!("peptide,score,ic50_nm,binder");
    for (peptide, score) in peptides.iter().zip(&scores) {
        let ic50 = delinearize(*score as f64);
        println!(
            "{},{:.4},{:.1},{}",
            peptide,
            score,
            ic50,
            ic50 <= cutoff
        );
    }
    Ok(())
}
