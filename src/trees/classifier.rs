//! Decision Tree Classifier
use super::{decision_tree::DecisionTree, impurity, kind::TreeKind};
use crate::error::ModelError;
use num_traits::ToPrimitive;

/// Classification learner: integer class labels, Gini impurity, majority leaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Classification;

/// Decision tree over integer class labels.
pub type DecisionTreeClassifier = DecisionTree<Classification>;

impl TreeKind for Classification {
    type Label = i64;

    const NAME: &'static str = "classifier";

    fn impurity(labels: &[i64]) -> f64 {
        impurity::gini(labels)
    }

    fn leaf_value(labels: &[i64]) -> i64 {
        // Leaves are never built from an empty partition.
        impurity::majority_class(labels).unwrap_or_default()
    }

    fn stops_when_pure() -> bool {
        true
    }

    /// Every distinct observed value is a candidate.
    fn candidate_thresholds(sorted_values: &[f64]) -> Vec<f64> {
        let mut candidates = sorted_values.to_vec();
        candidates.dedup();
        candidates
    }

    /// Majority vote; ties go to the lowest class id.
    fn aggregate(predictions: &[i64]) -> i64 {
        impurity::majority_class(predictions).unwrap_or_default()
    }

    fn encode_label(label: i64) -> i64 {
        label
    }

    fn label_from_wire(row_index: usize, value: f64) -> Result<i64, ModelError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(ModelError::NonIntegralLabel { row_index, value });
        }
        value
            .to_i64()
            .ok_or(ModelError::LabelOutOfRange { row_index, value })
    }

    /// Classification forests scan every column at every split.
    fn forest_max_features(_num_features: usize) -> Option<usize> {
        None
    }
}
