//! End-to-end run over a synthetic dataset: CSV in, trained models,
//! benchmark summary and figures out.

use epibind_bench::{figures, AffinityDataset, BenchmarkConfig, BenchmarkSummary, ToolPredictions};
use epibind_core::ALPHABET;
use epibind_model::{MlpConfig, TrainerConfig};
use std::fmt::Write as _;
use std::fs;

/// Two-allele dataset with an anchor-residue signal: leucine-anchored
/// peptides bind strongly, aspartate-anchored ones do not.
fn synthetic_csv(per_allele: usize) -> String {
    let mut csv = String::from("allele,peptide,length,ic50\n");
    for (a, allele) in ["HLA-A*02:01", "HLA-B*07:02"].iter().enumerate() {
        for i in 0..per_allele {
            let mut seq = String::new();
            for pos in 0..9 {
                let idx = (i * 7 + pos * 3 + a * 11) % ALPHABET.len();
                seq.push(ALPHABET[idx]);
            }
            let strong = i % 2 == 0;
            let seq = if strong {
                format!("L{}", &seq[1..])
            } else {
                format!("D{}", &seq[1..])
            };
            let ic50 = if strong {
                20.0 + i as f64
            } else {
                7_000.0 + i as f64 * 10.0
            };
            writeln!(csv, "{allele},{seq},9,{ic50}").unwrap();
        }
    }
    csv
}

#[test]
fn benchmark_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    let data_path = dir.path().join("affinities.csv");
    fs::write(&data_path, synthetic_csv(90)).unwrap();
    let dataset = AffinityDataset::load_csv(&data_path).unwrap();
    assert_eq!(dataset.len(), 180);

    // External tool that reproduces the measurements exactly
    let mut tool_csv = String::from("allele,peptide,ic50\n");
    for record in &dataset.records {
        writeln!(
            tool_csv,
            "{},{},{}",
            record.allele,
            record.peptide.as_str(),
            record.ic50_nm
        )
        .unwrap();
    }
    let tool_path = dir.path().join("netmhcpan.csv");
    fs::write(&tool_path, tool_csv).unwrap();
    let tool = ToolPredictions::load_csv("netmhcpan", &tool_path).unwrap();

    let config = BenchmarkConfig {
        test_fraction: 0.25,
        seed: 5,
        max_alleles: None,
        trainer: TrainerConfig {
            min_samples: 20,
            binder_cutoff_nm: 500.0,
            mlp: MlpConfig {
                epochs: 40,
                ..Default::default()
            },
            ..Default::default()
        },
    };

    let summary = BenchmarkSummary::run(&dataset, &[tool], &config);
    assert_eq!(summary.results.len(), 2);

    for row in &summary.results {
        assert!(row.n_train > row.n_eval);
        assert!(row.auc_model >= 0.0 && row.auc_model <= 1.0);
        let tool_auc = row.tool_auc["netmhcpan"].expect("tool covered the eval set");
        assert!((tool_auc - 1.0).abs() < 1e-6, "tool auc = {tool_auc}");
    }

    let out_dir = dir.path().join("benchmark");
    fs::create_dir_all(&out_dir).unwrap();
    summary.write_csv(&out_dir.join("summary.csv")).unwrap();
    figures::auc_by_allele(&out_dir.join("auc_by_allele.png"), &summary).unwrap();
    figures::auc_vs_training_size(&out_dir.join("auc_vs_training_size.png"), &summary).unwrap();

    let content = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(content.starts_with("allele,n_train,n_eval,auc_mlp,rmse_mlp,pearson_mlp,auc_netmhcpan"));

    // PNG paths land as SVG
    assert!(out_dir.join("auc_by_allele.svg").exists());
    assert!(out_dir.join("auc_vs_training_size.svg").exists());
}
