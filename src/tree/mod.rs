//! Decision tree and random forest regressors.
//!
//! Trees are grown with the CART algorithm: at each node the split that
//! maximizes variance reduction is chosen among midpoint thresholds between
//! consecutive distinct feature values. The forest aggregates trees fitted on
//! bootstrap resamples and averages their predictions.
//!
//! Every split records its variance reduction and sample count, so the
//! forest can report mean-decrease-in-impurity feature importances that sum
//! to 1.0 over the encoded columns.
//!
//! Training is deterministic for a fixed seed: tree `i` draws its bootstrap
//! sample from a generator seeded with `random_state + i`.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{HuellaError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;

/// An internal split node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitNode {
    /// Encoded column index the split tests.
    pub feature_idx: usize,
    /// Rows with `value <= threshold` go left.
    pub threshold: f32,
    /// Training samples that reached this node.
    pub n_samples: usize,
    /// Variance reduction achieved by this split.
    pub gain: f32,
    /// Subtree for `value <= threshold`.
    pub left: Box<TreeNode>,
    /// Subtree for `value > threshold`.
    pub right: Box<TreeNode>,
}

/// A terminal node holding the mean target of its samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeafNode {
    /// Predicted value (mean of training targets in this leaf).
    pub value: f32,
    /// Training samples that reached this leaf.
    pub n_samples: usize,
}

/// A node in a regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal split.
    Split(SplitNode),
    /// Terminal leaf.
    Leaf(LeafNode),
}

impl TreeNode {
    /// Predicts the target for a single encoded row.
    #[must_use]
    pub fn predict(&self, row: &[f32]) -> f32 {
        let mut node = self;
        loop {
            match node {
                Self::Leaf(leaf) => return leaf.value,
                Self::Split(split) => {
                    node = if row[split.feature_idx] <= split.threshold {
                        &split.left
                    } else {
                        &split.right
                    };
                }
            }
        }
    }

    /// Returns the depth of the subtree (a lone leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Split(split) => 1 + split.left.depth().max(split.right.depth()),
        }
    }

    /// Adds `gain * n_samples` of every split to the per-feature accumulator.
    fn accumulate_importances(&self, into: &mut [f32]) {
        if let Self::Split(split) = self {
            into[split.feature_idx] += split.gain * split.n_samples as f32;
            split.left.accumulate_importances(into);
            split.right.accumulate_importances(into);
        }
    }
}

/// Candidate split found while growing a node.
struct BestSplit {
    feature_idx: usize,
    threshold: f32,
    /// Reduction in total squared error.
    sse_gain: f64,
}

/// Sum and sum of squares over the targets of the given rows.
fn target_moments(y: &[f32], indices: &[usize]) -> (f64, f64) {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for &idx in indices {
        let v = f64::from(y[idx]);
        sum += v;
        sum_sq += v * v;
    }
    (sum, sum_sq)
}

/// Total squared error around the mean, from precomputed moments.
fn sse(sum: f64, sum_sq: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    (sum_sq - sum * sum / n as f64).max(0.0)
}

/// A single CART regression tree.
///
/// # Examples
///
/// ```
/// use huella::prelude::*;
///
/// let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0]).unwrap();
/// let y = Vector::from_vec(vec![5.0, 5.0, 5.0, 50.0, 50.0, 50.0]);
///
/// let mut tree = DecisionTreeRegressor::new();
/// tree.fit(&x, &y).unwrap();
///
/// let test = Matrix::from_vec(1, 1, vec![2.5]).unwrap();
/// assert_eq!(tree.predict(&test)[0], 5.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    root: Option<TreeNode>,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    n_features: Option<usize>,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeRegressor {
    /// Creates an unfitted tree with no depth limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            n_features: None,
        }
    }

    /// Sets the maximum tree depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the minimum number of samples required to split a node.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split.max(2);
        self
    }

    /// Sets the minimum number of samples required in each leaf.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf.max(1);
        self
    }

    /// Returns `true` if the tree has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Returns the fitted tree root.
    #[must_use]
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Returns the depth of the fitted tree.
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        self.root.as_ref().map(TreeNode::depth)
    }

    /// Fits the tree on the full training set.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` and `y` disagree on the number of rows or the
    /// training set is empty.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let indices: Vec<usize> = (0..x.n_rows()).collect();
        self.fit_on(x, y, indices)
    }

    /// Fits the tree on a row subset (possibly with repeats, for bagging).
    fn fit_on(&mut self, x: &Matrix<f32>, y: &Vector<f32>, indices: Vec<usize>) -> Result<()> {
        if x.n_rows() != y.len() {
            return Err(HuellaError::dimension_mismatch(
                "training rows",
                x.n_rows(),
                y.len(),
            ));
        }
        if indices.is_empty() {
            return Err("Cannot fit tree on an empty training set".into());
        }

        self.root = Some(self.grow(x, y.as_slice(), indices, 0));
        self.n_features = Some(x.n_cols());
        Ok(())
    }

    /// Recursively grows the tree from the given rows.
    fn grow(&self, x: &Matrix<f32>, y: &[f32], indices: Vec<usize>, depth: usize) -> TreeNode {
        let n = indices.len();
        let (sum, sum_sq) = target_moments(y, &indices);
        let mean = (sum / n as f64) as f32;
        let parent_sse = sse(sum, sum_sq, n);

        let leaf = |value: f32| TreeNode::Leaf(LeafNode {
            value,
            n_samples: n,
        });

        if n < self.min_samples_split {
            return leaf(mean);
        }
        if let Some(max_depth) = self.max_depth {
            if depth >= max_depth {
                return leaf(mean);
            }
        }
        // Pure node: no split can reduce the error.
        if parent_sse / (n as f64) < 1e-10 {
            return leaf(mean);
        }

        let Some(best) = self.find_best_split(x, y, &indices, parent_sse) else {
            return leaf(mean);
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&idx| x.get(idx, best.feature_idx) <= best.threshold);

        // Degenerate partitions can appear when the midpoint rounds onto a
        // data value; fall back to a leaf rather than recurse forever.
        if left.is_empty() || right.is_empty() {
            return leaf(mean);
        }

        TreeNode::Split(SplitNode {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            n_samples: n,
            gain: (best.sse_gain / n as f64) as f32,
            left: Box::new(self.grow(x, y, left, depth + 1)),
            right: Box::new(self.grow(x, y, right, depth + 1)),
        })
    }

    /// Scans every feature for the threshold with the highest variance
    /// reduction. Candidate thresholds are midpoints between consecutive
    /// distinct values.
    fn find_best_split(
        &self,
        x: &Matrix<f32>,
        y: &[f32],
        indices: &[usize],
        parent_sse: f64,
    ) -> Option<BestSplit> {
        let n = indices.len();
        let (total_sum, total_sq) = target_moments(y, indices);
        let mut best: Option<BestSplit> = None;

        for feature_idx in 0..x.n_cols() {
            let mut pairs: Vec<(f32, f32)> = indices
                .iter()
                .map(|&idx| (x.get(idx, feature_idx), y[idx]))
                .collect();
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let mut left_sum = 0.0f64;
            let mut left_sq = 0.0f64;

            for i in 0..n - 1 {
                let (value, target) = pairs[i];
                let t = f64::from(target);
                left_sum += t;
                left_sq += t * t;

                let next_value = pairs[i + 1].0;
                if value == next_value {
                    continue;
                }

                let n_left = i + 1;
                let n_right = n - n_left;
                if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                    continue;
                }

                let sse_left = sse(left_sum, left_sq, n_left);
                let sse_right = sse(total_sum - left_sum, total_sq - left_sq, n_right);
                let sse_gain = parent_sse - sse_left - sse_right;

                if sse_gain > best.as_ref().map_or(0.0, |b| b.sse_gain) {
                    best = Some(BestSplit {
                        feature_idx,
                        threshold: (value + next_value) / 2.0,
                        sse_gain,
                    });
                }
            }
        }

        best
    }

    /// Predicts target values for each row of `x`.
    ///
    /// # Panics
    ///
    /// Panics if called before [`DecisionTreeRegressor::fit`].
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let root = self
            .root
            .as_ref()
            .expect("Model not fitted. Call fit() first.");
        let values = (0..x.n_rows()).map(|i| root.predict(x.row(i))).collect();
        Vector::from_vec(values)
    }

    /// Returns normalized mean-decrease-in-impurity feature importances.
    ///
    /// Each split contributes its variance reduction weighted by the number
    /// of samples it saw; the result is normalized to sum to 1.0. Returns
    /// all zeros when the tree is a single leaf, `None` when unfitted.
    #[must_use]
    pub fn feature_importances(&self) -> Option<Vec<f32>> {
        let root = self.root.as_ref()?;
        let n_features = self.n_features?;

        let mut importances = vec![0.0f32; n_features];
        root.accumulate_importances(&mut importances);

        let total: f32 = importances.iter().sum();
        if total > 0.0 {
            for v in &mut importances {
                *v /= total;
            }
        }
        Some(importances)
    }

    /// Returns the R² score on the given data.
    ///
    /// # Panics
    ///
    /// Panics if called before [`DecisionTreeRegressor::fit`].
    #[must_use]
    pub fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        crate::metrics::r_squared(self.predict(x).as_slice(), y.as_slice())
    }
}

impl Estimator for DecisionTreeRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        Self::fit(self, x, y)
    }

    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        Self::predict(self, x)
    }
}

/// Draws `n_samples` row indices with replacement.
fn bootstrap_sample(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    let mut rng: Box<dyn RngCore> = match random_state {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(thread_rng()),
    };
    let dist = Uniform::from(0..n_samples);
    (0..n_samples).map(|_| dist.sample(&mut rng)).collect()
}

/// A bootstrap-aggregated ensemble of regression trees.
///
/// # Examples
///
/// ```
/// use huella::prelude::*;
///
/// let x = Matrix::from_vec(8, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
/// let y = Vector::from_vec(vec![10.0, 10.0, 10.0, 10.0, 80.0, 80.0, 80.0, 80.0]);
///
/// let mut forest = RandomForestRegressor::new(10).with_random_state(42);
/// forest.fit(&x, &y).unwrap();
///
/// let test = Matrix::from_vec(1, 1, vec![2.0]).unwrap();
/// let prediction = forest.predict(&test)[0];
/// assert!(prediction < 45.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    n_estimators: usize,
    max_depth: Option<usize>,
    random_state: Option<u64>,
    n_features: Option<usize>,
}

impl RandomForestRegressor {
    /// Creates an unfitted forest with `n_estimators` trees.
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            random_state: None,
            n_features: None,
        }
    }

    /// Sets the maximum depth for every tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the seed for reproducible bootstrap sampling.
    ///
    /// Tree `i` is seeded with `random_state + i`, so a fitted forest is a
    /// pure function of its training data and configuration.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Returns the configured number of trees.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Returns `true` if the forest has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Fits the forest: each tree trains on its own bootstrap resample.
    ///
    /// # Errors
    ///
    /// Returns an error if the training set is empty, dimensions disagree,
    /// or `n_estimators` is zero.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        if self.n_estimators == 0 {
            return Err("Forest needs at least one tree".into());
        }
        if x.n_rows() == 0 {
            return Err("Cannot fit on an empty training set".into());
        }
        if x.n_rows() != y.len() {
            return Err(HuellaError::dimension_mismatch(
                "training rows",
                x.n_rows(),
                y.len(),
            ));
        }

        self.trees.clear();
        for i in 0..self.n_estimators {
            let seed = self.random_state.map(|s| s + i as u64);
            let indices = bootstrap_sample(x.n_rows(), seed);

            let mut tree = DecisionTreeRegressor::new();
            if let Some(max_depth) = self.max_depth {
                tree = tree.with_max_depth(max_depth);
            }
            tree.fit_on(x, y, indices)?;
            self.trees.push(tree);
        }
        self.n_features = Some(x.n_cols());
        Ok(())
    }

    /// Predicts by averaging tree predictions.
    ///
    /// # Panics
    ///
    /// Panics if called before [`RandomForestRegressor::fit`].
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        assert!(!self.trees.is_empty(), "Model not fitted. Call fit() first.");

        let mut sums = vec![0.0f32; x.n_rows()];
        for tree in &self.trees {
            let predictions = tree.predict(x);
            for (sum, &p) in sums.iter_mut().zip(predictions.iter()) {
                *sum += p;
            }
        }
        let n_trees = self.trees.len() as f32;
        Vector::from_vec(sums.into_iter().map(|s| s / n_trees).collect())
    }

    /// Returns feature importances averaged over all trees.
    ///
    /// Importances are normalized to sum to 1.0 when any split exists; a
    /// forest of single-leaf trees reports all zeros. Returns `None` when
    /// unfitted.
    #[must_use]
    pub fn feature_importances(&self) -> Option<Vec<f32>> {
        let n_features = self.n_features?;
        if self.trees.is_empty() {
            return None;
        }

        let mut totals = vec![0.0f32; n_features];
        for tree in &self.trees {
            let importances = tree.feature_importances()?;
            for (total, v) in totals.iter_mut().zip(importances) {
                *total += v;
            }
        }

        let n_trees = self.trees.len() as f32;
        for total in &mut totals {
            *total /= n_trees;
        }

        let sum: f32 = totals.iter().sum();
        if sum > 0.0 {
            for total in &mut totals {
                *total /= sum;
            }
        }
        Some(totals)
    }

    /// Returns the R² score on the given data.
    ///
    /// # Panics
    ///
    /// Panics if called before [`RandomForestRegressor::fit`].
    #[must_use]
    pub fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        crate::metrics::r_squared(self.predict(x).as_slice(), y.as_slice())
    }
}

impl Estimator for RandomForestRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        Self::fit(self, x, y)
    }

    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        Self::predict(self, x)
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
