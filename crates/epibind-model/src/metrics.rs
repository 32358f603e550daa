//! Evaluation metrics for affinity models.

/// Compute Area Under the ROC Curve by the trapezoidal rule.
///
/// `scores` are ranked descending; `labels` mark true binders. Returns 0.5
/// when the labels are single-class (AUC undefined).
pub fn auc_roc(scores: &[f32], labels: &[bool]) -> f32 {
    if scores.len() != labels.len() || scores.is_empty() {
        return 0.0;
    }

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    // Sort descending by score
    indices.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_pos = labels.iter().filter(|&&l| l).count() as f32;
    let total_neg = labels.len() as f32 - total_pos;

    if total_pos == 0.0 || total_neg == 0.0 {
        return 0.5; // Undefined, return random
    }

    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut prev_tp = 0.0;
    let mut prev_fp = 0.0;
    let mut auc = 0.0;

    for &i in &indices {
        if labels[i] {
            tp += 1.0;
        } else {
            fp += 1.0;
        }

        // Trapezoidal rule
        auc += (fp - prev_fp) * (tp + prev_tp) / 2.0;

        prev_tp = tp;
        prev_fp = fp;
    }

    auc / (total_pos * total_neg)
}

/// Compute Root Mean Squared Error.
pub fn rmse(predictions: &[f32], targets: &[f32]) -> f32 {
    if predictions.len() != targets.len() || predictions.is_empty() {
        return 0.0;
    }

    let mse = predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, t)| (p - t).powi(2))
        .sum::<f32>()
        / predictions.len() as f32;

    mse.sqrt()
}

/// Compute Pearson's correlation coefficient.
pub fn pearson_r(x: &[f32], y: &[f32]) -> f32 {
    let n = x.len();
    if n != y.len() || n < 2 {
        return 0.0;
    }
    let nf = n as f32;
    let mean_x = x.iter().sum::<f32>() / nf;
    let mean_y = y.iter().sum::<f32>() / nf;

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;

    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }

    if den_x == 0.0 || den_y == 0.0 {
        0.0
    } else {
        num / (den_x.sqrt() * den_y.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auc_perfect() {
        let scores = vec![0.9, 0.8, 0.2, 0.1];
        let labels = vec![true, true, false, false];
        assert!((auc_roc(&scores, &labels) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_auc_inverted() {
        let scores = vec![0.1, 0.2, 0.8, 0.9];
        let labels = vec![true, true, false, false];
        assert!(auc_roc(&scores, &labels).abs() < 1e-6);
    }

    #[test]
    fn test_auc_random() {
        // Scores carry no signal: labels alternate down the ranking
        let mut scores = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            scores.push(1.0 - i as f32 * 0.02);
            labels.push(i % 2 == 0);
        }
        let auc = auc_roc(&scores, &labels);
        assert!((auc - 0.5).abs() < 0.1, "auc = {auc}");
    }

    #[test]
    fn test_auc_single_class() {
        let scores = vec![0.9, 0.8];
        assert_eq!(auc_roc(&scores, &[true, true]), 0.5);
        assert_eq!(auc_roc(&scores, &[false, false]), 0.5);
    }

    #[test]
    fn test_rmse() {
        assert_eq!(rmse(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
        let r = rmse(&[0.0, 0.0], &[3.0, 4.0]);
        // sqrt((9 + 16) / 2)
        assert!((r - 12.5f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_pearson() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![2.0, 4.0, 6.0, 8.0];
        assert!((pearson_r(&x, &y) - 1.0).abs() < 1e-6);

        let y_inv = vec![8.0, 6.0, 4.0, 2.0];
        assert!((pearson_r(&x, &y_inv) + 1.0).abs() < 1e-6);

        assert_eq!(pearson_r(&x, &[1.0, 1.0, 1.0, 1.0]), 0.0);
    }
}
