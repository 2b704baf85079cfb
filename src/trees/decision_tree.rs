//! Recursive tree induction shared by classification and regression.

use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};
use tracing::info;

use crate::{data::dataset::Dataset, error::ModelError};

use super::{kind::TreeKind, node::TreeNode, params::TreeParams, split::find_best_split, tree::Tree};

/// Decision tree learner.
///
/// Use the [`DecisionTreeClassifier`](super::classifier::DecisionTreeClassifier)
/// and [`DecisionTreeRegressor`](super::regressor::DecisionTreeRegressor) aliases.
#[derive(Clone, Debug)]
pub struct DecisionTree<K: TreeKind> {
    tree: Option<Tree<K>>,
    tree_params: TreeParams,
}

impl<K: TreeKind> Default for DecisionTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TreeKind> DecisionTree<K> {
    /// Creates an unfitted tree with default parameters.
    pub fn new() -> Self {
        Self::from_params(TreeParams::new())
    }

    pub fn from_params(tree_params: TreeParams) -> Self {
        Self {
            tree: None,
            tree_params,
        }
    }

    /// Creates an unfitted tree with custom parameters.
    ///
    /// # Errors
    ///
    /// Fails if `min_samples_split` is less than 2 or `max_depth` is less than 1.
    pub fn with_params(
        min_samples_split: Option<usize>,
        max_depth: Option<usize>,
    ) -> Result<Self, ModelError> {
        let mut tree = Self::new();
        tree.set_min_samples_split(min_samples_split.unwrap_or(2))?;
        tree.set_max_depth(max_depth)?;
        Ok(tree)
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: usize) -> Result<(), ModelError> {
        self.tree_params.set_min_samples_split(min_samples_split)
    }

    pub fn set_max_depth(&mut self, max_depth: Option<usize>) -> Result<(), ModelError> {
        self.tree_params.set_max_depth(max_depth)
    }

    pub fn set_max_features(&mut self, max_features: Option<usize>) -> Result<(), ModelError> {
        self.tree_params.set_max_features(max_features)
    }

    pub fn params(&self) -> &TreeParams {
        &self.tree_params
    }

    pub fn tree(&self) -> Option<&Tree<K>> {
        self.tree.as_ref()
    }

    pub fn into_tree(self) -> Option<Tree<K>> {
        self.tree
    }

    /// Depth of the fitted tree, 0 before fitting.
    pub fn depth(&self) -> usize {
        self.tree.as_ref().map_or(0, Tree::depth)
    }

    /// Builds the tree from a dataset, replacing any previous fit.
    ///
    /// Randomness is only consumed when `max_features` is set; the generator
    /// is seeded from the `seed` parameter, or from OS entropy without one.
    pub fn fit(&mut self, dataset: &Dataset<f64, K::Label>) -> Result<(), ModelError> {
        let mut rng = match self.tree_params.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.fit_with_rng(dataset, &mut rng)
    }

    /// Builds the tree, drawing split-time feature subsets from `rng`.
    pub fn fit_with_rng<R: Rng + ?Sized>(
        &mut self,
        dataset: &Dataset<f64, K::Label>,
        rng: &mut R,
    ) -> Result<(), ModelError> {
        check_dataset(dataset)?;
        let root = self.build_tree(dataset, 0, rng);
        let tree = Tree::from_root(root);
        info!(
            learner = K::NAME,
            samples = dataset.nrows(),
            features = dataset.ncols(),
            depth = tree.depth(),
            "finished building the tree"
        );
        self.tree = Some(tree);
        Ok(())
    }

    pub fn predict_row(&self, row: &[f64]) -> Result<K::Label, ModelError> {
        self.tree.as_ref().ok_or(ModelError::NotFitted)?.predict_row(row)
    }

    pub fn predict(&self, features: &DMatrix<f64>) -> Result<DVector<K::Label>, ModelError> {
        self.tree.as_ref().ok_or(ModelError::NotFitted)?.predict(features)
    }

    fn build_tree<R: Rng + ?Sized>(
        &self,
        dataset: &Dataset<f64, K::Label>,
        depth: usize,
        rng: &mut R,
    ) -> TreeNode<K::Label> {
        let labels = dataset.y.as_slice();
        let at_max_depth = self.tree_params.max_depth().is_some_and(|max| depth >= max);
        if at_max_depth
            || dataset.nrows() < self.tree_params.min_samples_split()
            || (K::stops_when_pure() && is_pure(labels))
        {
            return TreeNode::leaf(K::leaf_value(labels));
        }

        let features = self.features_for_split(dataset.ncols(), rng);
        match find_best_split::<K>(dataset, &features) {
            Some(split) => {
                let left = self.build_tree(&split.left, depth + 1, rng);
                let right = self.build_tree(&split.right, depth + 1, rng);
                TreeNode::split(split.feature_index, split.threshold, left, right)
            }
            None => TreeNode::leaf(K::leaf_value(labels)),
        }
    }

    /// Columns scanned by one split search, redrawn on every call.
    fn features_for_split<R: Rng + ?Sized>(&self, num_features: usize, rng: &mut R) -> Vec<usize> {
        match self.tree_params.max_features() {
            Some(count) if count < num_features => index::sample(rng, num_features, count).into_vec(),
            _ => (0..num_features).collect(),
        }
    }
}

fn is_pure<L: PartialEq>(labels: &[L]) -> bool {
    labels.windows(2).all(|pair| pair[0] == pair[1])
}

/// Rejects training sets the builder can't grow a tree from.
pub(crate) fn check_dataset<L: crate::data::dataset::TargetValue>(
    dataset: &Dataset<f64, L>,
) -> Result<(), ModelError> {
    if dataset.nrows() == 0 {
        return Err(ModelError::EmptyDataset);
    }
    if dataset.ncols() == 0 {
        return Err(ModelError::ZeroFeatures);
    }
    if dataset.y.len() != dataset.nrows() {
        return Err(ModelError::LabelCountMismatch {
            rows: dataset.nrows(),
            labels: dataset.y.len(),
        });
    }
    Ok(())
}
