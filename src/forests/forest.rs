//! Bootstrap-aggregated ensembles of decision trees.

use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    data::dataset::Dataset,
    error::ModelError,
    trees::{
        decision_tree::{check_dataset, DecisionTree},
        kind::TreeKind,
        tree::Tree,
    },
};

use super::{bootstrap::bootstrap_indices, params::ForestParams};

/// Random forest learner and fitted ensemble.
///
/// Trees are kept in the order they were grown. Use the
/// [`RandomForestClassifier`](super::classifier::RandomForestClassifier) and
/// [`RandomForestRegressor`](super::regressor::RandomForestRegressor) aliases.
#[derive(Clone, Debug)]
pub struct Forest<K: TreeKind> {
    trees: Vec<Tree<K>>,
    forest_params: ForestParams,
}

impl<K: TreeKind> Default for Forest<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TreeKind> Forest<K> {
    pub fn new() -> Self {
        Self::from_params(ForestParams::new())
    }

    pub fn from_params(forest_params: ForestParams) -> Self {
        Self {
            trees: Vec::new(),
            forest_params,
        }
    }

    /// Creates an unfitted forest with custom parameters.
    ///
    /// # Errors
    ///
    /// Fails if `num_trees` is 0, `min_samples_split` is less than 2 or
    /// `max_depth` is less than 1.
    pub fn with_params(
        num_trees: usize,
        min_samples_split: Option<usize>,
        max_depth: Option<usize>,
    ) -> Result<Self, ModelError> {
        let mut forest_params = ForestParams::new();
        forest_params.set_num_trees(num_trees)?;
        let tree_params = forest_params.tree_params_mut();
        tree_params.set_min_samples_split(min_samples_split.unwrap_or(2))?;
        tree_params.set_max_depth(max_depth)?;
        Ok(Self::from_params(forest_params))
    }

    pub fn params(&self) -> &ForestParams {
        &self.forest_params
    }

    pub fn params_mut(&mut self) -> &mut ForestParams {
        &mut self.forest_params
    }

    pub fn trees(&self) -> &[Tree<K>] {
        &self.trees
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Fits the forest with a generator seeded from `seed`, or from OS entropy.
    pub fn fit(
        &mut self,
        dataset: &Dataset<f64, K::Label>,
        seed: Option<u64>,
    ) -> Result<(), ModelError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            _ => StdRng::from_entropy(),
        };
        self.fit_with_rng(dataset, &mut rng)
    }

    /// Grows `num_trees` trees, each on its own bootstrap resample of `dataset`.
    ///
    /// Trees are grown one after another from the single generator `rng`: the
    /// bootstrap draw for a tree comes first, then every feature draw that
    /// tree's split searches make. Replaces any previous fit.
    #[instrument(skip_all, fields(learner = K::NAME, num_trees = self.forest_params.num_trees()))]
    pub fn fit_with_rng<R: Rng + ?Sized>(
        &mut self,
        dataset: &Dataset<f64, K::Label>,
        rng: &mut R,
    ) -> Result<(), ModelError> {
        check_dataset(dataset)?;
        let num_samples = dataset.nrows();
        let draw_count = self.forest_params.sample_size().unwrap_or(num_samples);

        let mut tree_params = self.forest_params.tree_params().clone();
        if tree_params.max_features().is_none() {
            tree_params.set_max_features(K::forest_max_features(dataset.ncols()))?;
        }

        let mut trees = Vec::with_capacity(self.forest_params.num_trees());
        for tree_index in 0..self.forest_params.num_trees() {
            let indices = bootstrap_indices(num_samples, draw_count, rng);
            let sample = dataset.select_rows(&indices);

            let mut tree = DecisionTree::<K>::from_params(tree_params.clone());
            tree.fit_with_rng(&sample, rng)?;
            debug!(tree_index, depth = tree.depth(), "fitted bootstrap tree");
            trees.push(tree.into_tree().ok_or(ModelError::NotFitted)?);
        }
        self.trees = trees;

        info!(
            samples = num_samples,
            features = dataset.ncols(),
            draw_count,
            max_features = tree_params.max_features(),
            "finished building the trees"
        );
        Ok(())
    }

    /// Aggregates the member trees' predictions for one row.
    ///
    /// Classification returns the majority vote (ties to the lowest class id),
    /// regression the mean.
    pub fn predict_row(&self, row: &[f64]) -> Result<K::Label, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        let predictions = self
            .trees
            .iter()
            .map(|tree| tree.predict_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(K::aggregate(&predictions))
    }

    /// Predicts every row of `features`, preserving row order.
    pub fn predict(&self, features: &DMatrix<f64>) -> Result<DVector<K::Label>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        let predictions = (0..features.nrows())
            .into_par_iter()
            .map(|i| {
                let row: Vec<f64> = features.row(i).iter().copied().collect();
                self.predict_row(&row)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DVector::from_vec(predictions))
    }

    /// Encodes the forest as an array of tree encodings, in tree order.
    pub fn to_json(&self) -> Result<Value, ModelError> {
        self.trees
            .iter()
            .map(Tree::to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    /// Decodes a forest produced by [`Forest::to_json`].
    ///
    /// The result predicts only; its parameters are the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MalformedModel`] if `value` is not a non-empty
    /// array of valid tree encodings.
    pub fn from_json(value: &Value) -> Result<Self, ModelError> {
        let encoded = value
            .as_array()
            .ok_or_else(|| ModelError::MalformedModel("forest must be an array of trees".into()))?;
        if encoded.is_empty() {
            return Err(ModelError::MalformedModel("forest has no trees".into()));
        }
        let trees = encoded
            .iter()
            .map(Tree::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(learner = K::NAME, num_trees = trees.len(), "decoded forest");
        Ok(Self {
            trees,
            forest_params: ForestParams::new(),
        })
    }
}
