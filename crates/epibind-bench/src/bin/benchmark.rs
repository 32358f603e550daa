//! Benchmark the MLP against external predictor CSVs.
//!
//! Trains a fresh model per allele on a shuffle split and scores everything
//! on the held-out peptides. External tools are optional; any provided
//! prediction file is joined by (allele, peptide).
//!
//! Usage:
//!   cargo run --release --bin benchmark -- \
//!     --data data/mhci.csv \
//!     --netmhcpan preds/netmhcpan.csv --mhcflurry preds/mhcflurry.csv \
//!     --out-dir benchmark

use anyhow::{Context, Result};
use clap::Parser;
use epibind_bench::{figures, AffinityDataset, BenchmarkConfig, BenchmarkSummary, ToolPredictions};
use epibind_core::EncodingScheme;
use epibind_model::{MlpConfig, TrainerConfig};
use std::fs;
use std::path::PathBuf;

/// Benchmark tool
#[derive(Parser)]
#[command(name = "benchmark")]
#[command(about = "Benchmark per-allele affinity models against external predictors")]
struct Cli {
    /// Affinity data CSV (allele, peptide, ic50, length)
    #[arg(long)]
    data: PathBuf,

    /// Output directory for summary and figures
    #[arg(long, default_value = "benchmark")]
    out_dir: PathBuf,

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

    /// Binder cutoff in nM
    #[arg(long, default_value_t = 500.0)]
    cutoff: f64,

    /// Held-out fraction per allele
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f32,

    /// Shuffle seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Evaluate at most this many alleles (largest first)
    #[arg(long)]
    max_alleles: Option<usize>,

    /// netMHCpan prediction CSV
    #[arg(long)]
    netmhcpan: Option<PathBuf>,

    /// MHCflurry prediction CSV
    #[arg(long)]
    mhcflurry: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let scheme: EncodingScheme = cli
        .scheme
        .parse()
        .with_context(|| format!("invalid --scheme '{}'", cli.scheme))?;

    let dataset = AffinityDataset::load_csv(&cli.data)?;

    let mut tools = Vec::new();
    if let Some(path) = &cli.netmhcpan {
        tools.push(ToolPredictions::load_csv("netmhcpan", path)?);
    }
    if let Some(path) = &cli.mhcflurry {
        tools.push(ToolPredictions::load_csv("mhcflurry", path)?);
    }

    let config = BenchmarkConfig {
        test_fraction: cli.test_fraction,
        seed: cli.seed,
        max_alleles: cli.max_alleles,
        trainer: TrainerConfig {
            scheme,
            peptide_length: cli.length,
            min_samples: cli.min_samples,
            binder_cutoff_nm: cli.cutoff,
            mlp: MlpConfig {
                epochs: cli.epochs,
                seed: cli.seed,
                ..Default::default()
            },
        },
    };

    let summary = BenchmarkSummary::run(&dataset, &tools, &config);

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Failed to create {}", cli.out_dir.display()))?;
    summary.write_csv(&cli.out_dir.join("summary.csv"))?;
    figures::auc_by_allele(&cli.out_dir.join("auc_by_allele.png"), &summary)?;
    figures::auc_vs_training_size(&cli.out_dir.join("auc_vs_training_size.png"), &summary)?;

    print!("{}", summary.report());
    println!(
        "Evaluated {} alleles, mean AUC {:.3}; results in {}",
        summary.results.len(),
        summary.mean_auc(),
        cli.out_dir.display()
    );
    Ok(())
}
