use crate::error::ModelError;

/// Hyperparameters of a single decision tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeParams {
    pub min_samples_split: usize,
    pub max_depth: Option<usize>,
    pub max_features: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self {
            min_samples_split: 2,
            max_depth: None,
            max_features: None,
            seed: None,
        }
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: usize) -> Result<(), ModelError> {
        if min_samples_split < 2 {
            return Err(ModelError::invalid_parameter(
                "min_samples_split",
                "the minimum number of samples to split must be greater than 1",
            ));
        }
        self.min_samples_split = min_samples_split;
        Ok(())
    }

    /// `None` grows the tree until every node is pure or unsplittable.
    pub fn set_max_depth(&mut self, max_depth: Option<usize>) -> Result<(), ModelError> {
        if max_depth.is_some_and(|depth| depth < 1) {
            return Err(ModelError::invalid_parameter(
                "max_depth",
                "the maximum depth must be greater than 0",
            ));
        }
        self.max_depth = max_depth;
        Ok(())
    }

    /// Number of columns drawn at random for every split search. `None` scans all.
    pub fn set_max_features(&mut self, max_features: Option<usize>) -> Result<(), ModelError> {
        if max_features.is_some_and(|count| count < 1) {
            return Err(ModelError::invalid_parameter(
                "max_features",
                "the number of features per split must be greater than 0",
            ));
        }
        self.max_features = max_features;
        Ok(())
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
