//! Benchmark figures using plotters (SVG output)
//!
//! Uses SVG backend to avoid system font dependencies.

use crate::harness::BenchmarkSummary;
use anyhow::Result;
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use std::path::Path;

const PALETTE: [RGBColor; 5] = [BLUE, RED, GREEN, MAGENTA, CYAN];

/// Convert a requested output path to SVG if it names a PNG.
fn svg_path(path: &Path) -> std::path::PathBuf {
    if path.extension().map(|e| e == "png").unwrap_or(false) {
        path.with_extension("svg")
    } else {
        path.to_path_buf()
    }
}

/// Grouped AUC bars per allele, one series per method.
pub fn auc_by_allele(path: &Path, summary: &BenchmarkSummary) -> Result<()> {
    let out = svg_path(path);
    let root = SVGBackend::new(&out, (900, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    if summary.results.is_empty() {
        root.draw(&Text::new(
            "No benchmark results",
            (450, 250),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    }

    let alleles: Vec<String> = summary.results.iter().map(|r| r.allele.clone()).collect();
    let n_alleles = alleles.len();

    // Method order: the MLP first, then each tool
    let mut methods = vec!["mlp".to_string()];
    methods.extend(summary.tools.iter().cloned());
    let n_methods = methods.len();

    let mut chart = ChartBuilder::on(&root)
        .caption("ROC-AUC by allele", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..n_alleles as f32, 0f32..1.05f32)?;

    chart
        .configure_mesh()
        .x_desc("Allele")
        .y_desc("ROC-AUC")
        .x_labels(n_alleles)
        .x_label_formatter(&|x| {
            let i = x.floor() as usize;
            alleles.get(i).cloned().unwrap_or_default()
        })
        .draw()?;

    let bar_width = 0.8 / n_methods as f32;
    for (m, method) in methods.iter().enumerate() {
        let color = PALETTE[m % PALETTE.len()];
        let bars: Vec<Rectangle<(f32, f32)>> = summary
            .results
            .iter()
            .enumerate()
            .filter_map(|(i, result)| {
                let auc = if m == 0 {
                    Some(result.auc_model)
                } else {
                    result.tool_auc.get(method).copied().flatten()
                };
                auc.map(|auc| {
                    let x0 = i as f32 + 0.1 + m as f32 * bar_width;
                    Rectangle::new([(x0, 0.0), (x0 + bar_width, auc)], color.filled())
                })
            })
            .collect();

        chart
            .draw_series(bars)?
            .label(method.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 4), (x + 8, y + 4)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE)
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Held-out AUC against training-set size, one point per allele.
pub fn auc_vs_training_size(path: &Path, summary: &BenchmarkSummary) -> Result<()> {
    let out = svg_path(path);
    let root = SVGBackend::new(&out, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    if summary.results.is_empty() {
        root.draw(&Text::new(
            "No benchmark results",
            (400, 250),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    }

    let max_n = summary
        .results
        .iter()
        .map(|r| r.n_train)
        .max()
        .unwrap_or(1) as f32;

    let mut chart = ChartBuilder::on(&root)
        .caption("AUC vs training-set size", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..max_n * 1.05, 0f32..1.05f32)?;

    chart
        .configure_mesh()
        .x_desc("Training samples")
        .y_desc("ROC-AUC")
        .draw()?;

    chart.draw_series(
        summary
            .results
            .iter()
            .map(|r| Circle::new((r.n_train as f32, r.auc_model), 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}
