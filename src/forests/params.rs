use crate::{error::ModelError, trees::params::TreeParams};

/// Hyperparameters of a bagged ensemble.
#[derive(Clone, Debug, PartialEq)]
pub struct ForestParams {
    num_trees: usize,
    sample_size: Option<usize>,
    tree_params: TreeParams,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ForestParams {
    pub fn new() -> Self {
        Self {
            num_trees: 10,
            sample_size: None,
            tree_params: TreeParams::new(),
        }
    }

    pub fn set_num_trees(&mut self, num_trees: usize) -> Result<(), ModelError> {
        if num_trees < 1 {
            return Err(ModelError::invalid_parameter(
                "n_estimators",
                "the number of trees must be greater than 0",
            ));
        }
        self.num_trees = num_trees;
        Ok(())
    }

    /// Rows drawn per bootstrap resample. `None` draws as many rows as the training set has.
    pub fn set_sample_size(&mut self, sample_size: Option<usize>) -> Result<(), ModelError> {
        if sample_size.is_some_and(|size| size < 1) {
            return Err(ModelError::invalid_parameter(
                "sample_size",
                "the sample size must be greater than 0",
            ));
        }
        self.sample_size = sample_size;
        Ok(())
    }

    /// Parameters every member tree is grown with.
    ///
    /// The tree-level `seed` is ignored; member trees draw from the forest's generator.
    pub fn set_tree_params(&mut self, tree_params: TreeParams) {
        self.tree_params = tree_params;
    }

    pub fn tree_params_mut(&mut self) -> &mut TreeParams {
        &mut self.tree_params
    }

    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    pub fn sample_size(&self) -> Option<usize> {
        self.sample_size
    }

    pub fn tree_params(&self) -> &TreeParams {
        &self.tree_params
    }
}
