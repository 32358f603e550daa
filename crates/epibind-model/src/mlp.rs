//! Single-hidden-layer MLP regressor.
//!
//! ReLU hidden layer, linear output, mini-batch SGD with momentum on MSE
//! loss. Weights are flat `Vec<f32>` row-major matrices so the whole model
//! serializes with serde/bincode.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for MLP training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpConfig {
    /// Hidden layer width
    pub hidden_size: usize,
    /// SGD step size
    pub learning_rate: f32,
    /// Momentum coefficient
    pub momentum: f32,
    /// Training epochs
    pub epochs: usize,
    /// Mini-batch size
    pub batch_size: usize,
    /// L2 weight penalty
    pub l2: f32,
    /// RNG seed for init and shuffling
    pub seed: u64,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            hidden_size: 20,
            learning_rate: 0.01,
            momentum: 0.9,
            epochs: 200,
            batch_size: 32,
            l2: 1e-4,
            seed: 42,
        }
    }
}

/// Training samples as a flat feature matrix, `n_samples` rows of `dim`
/// features each.
#[derive(Clone, Debug, Default)]
pub struct TrainingSet {
    pub n_samples: usize,
    pub dim: usize,
    /// Feature matrix [n_samples x dim], row-major
    pub features: Vec<f32>,
    /// Regression targets [n_samples]
    pub targets: Vec<f32>,
}

impl TrainingSet {
    pub fn new(dim: usize) -> Self {
        Self {
            n_samples: 0,
            dim,
            features: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Add a sample. Panics if the feature width does not match `dim`.
    pub fn push(&mut self, features: &[f32], target: f32) {
        assert_eq!(features.len(), self.dim, "feature width mismatch");
        self.features.extend_from_slice(features);
        self.targets.push(target);
        self.n_samples += 1;
    }

    /// Feature row for sample `i`.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.features[i * self.dim..(i + 1) * self.dim]
    }

    pub fn is_empty(&self) -> bool {
        self.n_samples == 0
    }
}

/// Single-hidden-layer regressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpRegressor {
    input_dim: usize,
    hidden_size: usize,
    /// Hidden weights [hidden_size x input_dim], row-major
    w1: Vec<f32>,
    /// Hidden biases [hidden_size]
    b1: Vec<f32>,
    /// Output weights [hidden_size]
    w2: Vec<f32>,
    /// Output bias
    b2: f32,
    config: MlpConfig,
}

impl MlpRegressor {
    /// Create a regressor with He-scaled random initialization.
    pub fn new(input_dim: usize, config: MlpConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let hidden_size = config.hidden_size.max(1);

        let scale1 = (2.0 / input_dim.max(1) as f32).sqrt();
        let w1 = (0..hidden_size * input_dim)
            .map(|_| (rng.gen::<f32>() * 2.0 - 1.0) * scale1)
            .collect();

        let scale2 = (2.0 / hidden_size as f32).sqrt();
        let w2 = (0..hidden_size)
            .map(|_| (rng.gen::<f32>() * 2.0 - 1.0) * scale2)
            .collect();

        Self {
            input_dim,
            hidden_size,
            w1,
            b1: vec![0.0; hidden_size],
            w2,
            b2: 0.0,
            config,
        }
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn config(&self) -> &MlpConfig {
        &self.config
    }

    /// ReLU hidden activations for one sample, written into `h`.
    fn hidden_activations(&self, x: &[f32], h: &mut [f32]) {
        for j in 0..self.hidden_size {
            let row = &self.w1[j * self.input_dim..(j + 1) * self.input_dim];
            let mut acc = self.b1[j];
            for (w, xv) in row.iter().zip(x.iter()) {
                acc += w * xv;
            }
            h[j] = acc.max(0.0);
        }
    }

    /// Predict the regression output for one feature row.
    pub fn predict_one(&self, x: &[f32]) -> f32 {
        assert_eq!(x.len(), self.input_dim, "feature width mismatch");
        let mut h = vec![0.0f32; self.hidden_size];
        self.hidden_activations(x, &mut h);
        let mut y = self.b2;
        for (w, hv) in self.w2.iter().zip(h.iter()) {
            y += w * hv;
        }
        y
    }

    /// Predict over every row of a training set.
    pub fn predict_set(&self, set: &TrainingSet) -> Vec<f32> {
        (0..set.n_samples).map(|i| self.predict_one(set.row(i))).collect()
    }

    /// Train on `set`, returning per-epoch mean squared error.
    pub fn fit(&mut self, set: &TrainingSet) -> Vec<f32> {
        assert_eq!(set.dim, self.input_dim, "feature width mismatch");
        assert!(set.n_samples > 0, "empty training set");

        let cfg = self.config.clone();
        let n = set.n_samples;
        let batch = cfg.batch_size.clamp(1, n);
        // Distinct stream from the init seed so re-fitting is reproducible
        let mut rng = StdRng::seed_from_u64(cfg.seed ^ 0x9e37_79b9_7f4a_7c15);
        let mut order: Vec<usize> = (0..n).collect();

        // Momentum buffers
        let mut vw1 = vec![0.0f32; self.w1.len()];
        let mut vb1 = vec![0.0f32; self.hidden_size];
        let mut vw2 = vec![0.0f32; self.hidden_size];
        let mut vb2 = 0.0f32;

        // Gradient accumulators, reused across batches
        let mut gw1 = vec![0.0f32; self.w1.len()];
        let mut gb1 = vec![0.0f32; self.hidden_size];
        let mut gw2 = vec![0.0f32; self.hidden_size];
        let mut h = vec![0.0f32; self.hidden_size];
        let mut delta = vec![0.0f32; self.hidden_size];

        let mut history = Vec::with_capacity(cfg.epochs);

        for epoch in 0..cfg.epochs {
            order.shuffle(&mut rng);
            let mut epoch_sse = 0.0f32;

            for chunk in order.chunks(batch) {
                gw1.iter_mut().for_each(|g| *g = 0.0);
                gb1.iter_mut().for_each(|g| *g = 0.0);
                gw2.iter_mut().for_each(|g| *g = 0.0);
                let mut gb2 = 0.0f32;

                for &i in chunk {
                    let x = set.row(i);
                    self.hidden_activations(x, &mut h);

                    let mut yhat = self.b2;
                    for (w, hv) in self.w2.iter().zip(h.iter()) {
                        yhat += w * hv;
                    }
                    let err = yhat - set.targets[i];
                    epoch_sse += err * err;

                    // Output layer gradients
                    for j in 0..self.hidden_size {
                        gw2[j] += err * h[j];
                    }
                    gb2 += err;

                    // Backprop through ReLU: h[j] > 0 iff pre-activation > 0
                    for j in 0..self.hidden_size {
                        delta[j] = if h[j] > 0.0 { err * self.w2[j] } else { 0.0 };
                    }
                    for j in 0..self.hidden_size {
                        let d = delta[j];
                        if d == 0.0 {
                            continue;
                        }
                        let grow = &mut gw1[j * self.input_dim..(j + 1) * self.input_dim];
                        for (g, xv) in grow.iter_mut().zip(x.iter()) {
                            *g += d * xv;
                        }
                        gb1[j] += d;
                    }
                }

                let inv = 1.0 / chunk.len() as f32;
                for k in 0..self.w1.len() {
                    vw1[k] = cfg.momentum * vw1[k]
                        - cfg.learning_rate * (gw1[k] * inv + cfg.l2 * self.w1[k]);
                    self.w1[k] += vw1[k];
                }
                for j in 0..self.hidden_size {
                    vb1[j] = cfg.momentum * vb1[j] - cfg.learning_rate * gb1[j] * inv;
                    self.b1[j] += vb1[j];

                    vw2[j] = cfg.momentum * vw2[j]
                        - cfg.learning_rate * (gw2[j] * inv + cfg.l2 * self.w2[j]);
                    self.w2[j] += vw2[j];
                }
                vb2 = cfg.momentum * vb2 - cfg.learning_rate * gb2 * inv;
                self.b2 += vb2;
            }

            let mse = epoch_sse / n as f32;
            history.push(mse);
            if epoch % 50 == 0 {
                log::debug!("epoch {epoch}: mse = {mse:.6}");
            }
        }

        history
    }
}
