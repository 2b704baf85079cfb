//! Decision Tree Regressor
use super::{
    decision_tree::DecisionTree,
    impurity,
    kind::{round_encoded, TreeKind},
};
use crate::error::ModelError;

/// Regression learner: real labels, variance impurity, mean leaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Regression;

/// Decision tree over real-valued targets.
pub type DecisionTreeRegressor = DecisionTree<Regression>;

impl TreeKind for Regression {
    type Label = f64;

    const NAME: &'static str = "regressor";

    fn impurity(labels: &[f64]) -> f64 {
        impurity::variance(labels)
    }

    fn leaf_value(labels: &[f64]) -> f64 {
        impurity::mean(labels)
    }

    /// Regression trees keep splitting constant nodes until a stop rule or a
    /// degenerate split ends them.
    fn stops_when_pure() -> bool {
        false
    }

    /// Midpoints between consecutive sorted values.
    fn candidate_thresholds(sorted_values: &[f64]) -> Vec<f64> {
        let mut candidates = sorted_values
            .windows(2)
            .map(|pair| (pair[0] + pair[1]) / 2.0)
            .collect::<Vec<_>>();
        candidates.dedup();
        candidates
    }

    fn aggregate(predictions: &[f64]) -> f64 {
        impurity::mean(predictions)
    }

    fn encode_label(label: f64) -> f64 {
        round_encoded(label)
    }

    fn label_from_wire(row_index: usize, value: f64) -> Result<f64, ModelError> {
        if !value.is_finite() {
            return Err(ModelError::NonFiniteValue { row_index });
        }
        Ok(value)
    }

    /// A third of the columns, at least one, redrawn at every split.
    fn forest_max_features(num_features: usize) -> Option<usize> {
        Some((num_features / 3).max(1))
    }
}
