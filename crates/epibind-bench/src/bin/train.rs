//! Train per-allele peptide-MHC affinity regressors from an IEDB-style CSV.
//!
//! Usage:
//!   cargo run --release --bin train -- \
//!     --data data/mhci.csv --models-dir models --scheme blosum62 --length 9

use anyhow::{Context, Result};
use clap::Parser;
use epibind_bench::AffinityDataset;
use epibind_core::EncodingScheme;
use epibind_model::{train_allele, MlpConfig, ModelStore, TrainerConfig};
use std::path::PathBuf;

/// Per-allele MLP training tool
#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train per-allele peptide-MHC affinity regressors")]
struct Cli {
    /// Training data CSV (allele, peptide, ic50, length)
    #[arg(long)]
    data: PathBuf,

    /// Output directory for model artifacts
    #[arg(long, default_value = "models")]
    models_dir: PathBuf,

    /// Encoding scheme: onehot, blosum62 or nlf
    #[arg(long, default_value = "blosum62")]
    scheme: String,

    /// Peptide length; other lengths are dropped
    #[arg(long, default_value_t = 9)]
    length: usize,

    /// Minimum samples per allele
    #[arg(long, default_value_t = 200)]
    min_samples: usize,

    /// Training epochs
    #[arg(long, default_value_t = 200)]
    epochs: usize,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Binder cutoff (nM) for the reported training AUC
    #[arg(long, default_value_t = 500.0)]
    cutoff: f64,

    /// Restrict training to these alleles (repeatable)
    #[arg(long)]
    allele: Vec<String>,

    /// Also write a JSON mirror next to each artifact
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let scheme: EncodingScheme = cli
        .scheme
        .parse()
        .with_context(|| format!("invalid --scheme '{}'", cli.scheme))?;

    let config = TrainerConfig {
        scheme,
        peptide_length: cli.length,
        min_samples: cli.min_samples,
        binder_cutoff_nm: cli.cutoff,
        mlp: MlpConfig {
            epochs: cli.epochs,
            seed: cli.seed,
            ..Default::default()
        },
    };

    let dataset = AffinityDataset::load_csv(&cli.data)?.filter_length(cli.length);
    let groups = dataset.by_allele();
    let store = ModelStore::new(&cli.models_dir);

    let mut trained = 0usize;
    let mut skipped = 0usize;

    for (allele, records) in &groups {
        if !cli.allele.is_empty() && !cli.allele.iter().any(|a| a == allele) {
            continue;
        }

        match train_allele(allele, records, &config) {
            Ok(model) => {
                let path = store.save(&model)?;
                if cli.json {
                    model.save_json(&path.with_extension("json"))?;
                }
                log::info!(
                    "{}: {} samples, train auc {:.3} -> {}",
                    allele,
                    model.n_train_samples,
                    model.train_auc,
                    path.display()
                );
                trained += 1;
            }
            Err(e) => {
                log::warn!("skipping {}: {}", allele, e);
                skipped += 1;
            }
        }
    }

    println!(
        "Trained {} allele models into {} ({} skipped)",
        trained,
        cli.models_dir.display(),
        skipped
    );
    Ok(())
}
