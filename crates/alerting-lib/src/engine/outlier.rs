//! Isolation-forest outlier model
//!
//! Ensemble of randomized binary trees over encoded feature vectors.
//! Points that end up isolated after few random splits receive short
//! average path lengths and therefore high anomaly scores. The model is
//! fitted once, on the first non-empty batch it sees, and reused for the
//! lifetime of the process.

use super::features::{FeatureVector, NUM_FEATURES};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Guard against a zero-width range when normalizing batch scores
pub const NORMALIZATION_EPSILON: f64 = 1e-8;

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

/// Outlier model parameters
#[derive(Debug, Clone)]
pub struct OutlierConfig {
    /// Number of trees in the ensemble
    pub num_trees: usize,
    /// Subsample size per tree
    pub sample_size: usize,
    /// Expected fraction of outliers, drives the label cutoff
    pub contamination: f64,
    /// RNG seed so fitting is reproducible
    pub seed: u64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            num_trees: 100,
            sample_size: 256,
            contamination: 0.1,
            seed: 42,
        }
    }
}

/// Raw decision value and label for one sample
#[derive(Debug, Clone, Copy)]
pub struct OutlierScore {
    /// Decision value, higher = more inlier-like
    pub raw: f64,
    pub is_outlier: bool,
}

enum Tree {
    Split {
        feature: usize,
        value: f64,
        left: Box<Tree>,
        right: Box<Tree>,
    },
    Leaf {
        size: usize,
    },
}

/// Stateful ensemble outlier detector
pub struct OutlierModel {
    config: OutlierConfig,
    trees: Vec<Tree>,
    /// Expected path length c(n) for the fitted subsample size
    expected_path: f64,
    /// Anomaly-score cutoff above which a sample is labeled an outlier
    label_cutoff: f64,
    fitted: bool,
}

impl OutlierModel {
    pub fn new(config: OutlierConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            expected_path: 0.0,
            label_cutoff: f64::INFINITY,
            fitted: false,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Train the ensemble on a batch of feature vectors.
    ///
    /// No-op when already fitted or the batch is empty; the first
    /// non-empty batch the model sees becomes its baseline forever.
    pub fn fit(&mut self, batch: &[FeatureVector]) {
        if self.fitted || batch.is_empty() {
            return;
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let subsample = self.config.sample_size.min(batch.len());
        let height_limit = (subsample as f64).log2().ceil().max(1.0) as usize;

        let mut trees = Vec::with_capacity(self.config.num_trees);
        for _ in 0..self.config.num_trees {
            let rows: Vec<&FeatureVector> = if batch.len() > subsample {
                rand::seq::index::sample(&mut rng, batch.len(), subsample)
                    .into_iter()
                    .map(|i| &batch[i])
                    .collect()
            } else {
                batch.iter().collect()
            };
            trees.push(build_tree(&rows, 0, height_limit, &mut rng));
        }

        self.trees = trees;
        self.expected_path = average_path_length(subsample);

        // Label cutoff at the (1 - contamination) quantile of training
        // scores: roughly that fraction of the densest points stay inliers.
        let mut scores: Vec<f64> = batch.iter().map(|f| self.anomaly_score(f)).collect();
        scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        self.label_cutoff = quantile(&scores, 1.0 - self.config.contamination);
        self.fitted = true;
    }

    /// Score one sample. Valid only after [`fit`](Self::fit); an unfitted
    /// model returns a neutral inlier score.
    pub fn score(&self, features: &FeatureVector) -> OutlierScore {
        let s = self.anomaly_score(features);
        OutlierScore {
            raw: 0.5 - s,
            is_outlier: s > self.label_cutoff,
        }
    }

    /// Anomaly score in (0, 1): 2^(-E(h)/c(n)), higher = more anomalous
    fn anomaly_score(&self, features: &FeatureVector) -> f64 {
        if self.trees.is_empty() || self.expected_path < f64::EPSILON {
            return 0.5;
        }
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| path_length(tree, features, 0))
            .sum();
        let mean_path = total / self.trees.len() as f64;
        2f64.powf(-mean_path / self.expected_path)
    }
}

fn build_tree(rows: &[&FeatureVector], depth: usize, limit: usize, rng: &mut StdRng) -> Tree {
    if depth >= limit || rows.len() <= 1 {
        return Tree::Leaf { size: rows.len() };
    }

    let mut mins = [f64::INFINITY; NUM_FEATURES];
    let mut maxs = [f64::NEG_INFINITY; NUM_FEATURES];
    for row in rows {
        for i in 0..NUM_FEATURES {
            mins[i] = mins[i].min(row[i]);
            maxs[i] = maxs[i].max(row[i]);
        }
    }

    let candidates: Vec<usize> = (0..NUM_FEATURES).filter(|&i| maxs[i] > mins[i]).collect();
    if candidates.is_empty() {
        // All rows identical, nothing left to split on
        return Tree::Leaf { size: rows.len() };
    }

    let feature = candidates[rng.gen_range(0..candidates.len())];
    let value = rng.gen_range(mins[feature]..maxs[feature]);
    let (left, right): (Vec<&FeatureVector>, Vec<&FeatureVector>) =
        rows.iter().copied().partition(|row| row[feature] < value);

    Tree::Split {
        feature,
        value,
        left: Box::new(build_tree(&left, depth + 1, limit, rng)),
        right: Box::new(build_tree(&right, depth + 1, limit, rng)),
    }
}

fn path_length(tree: &Tree, features: &FeatureVector, depth: usize) -> f64 {
    match tree {
        Tree::Leaf { size } => depth as f64 + average_path_length(*size),
        Tree::Split {
            feature,
            value,
            left,
            right,
        } => {
            if features[*feature] < *value {
                path_length(left, features, depth + 1)
            } else {
                path_length(right, features, depth + 1)
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over n points
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_MASCHERONI) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated quantile over an ascending-sorted slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Min-max rescale raw decision values over the current batch and invert,
/// so higher = more anomalous: `1 - (raw - min)/(max - min + ε)`.
pub fn normalize_scores(raw: &[f64]) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    raw.iter()
        .map(|r| 1.0 - (r - min) / (max - min + NORMALIZATION_EPSILON))
        .collect()
}
