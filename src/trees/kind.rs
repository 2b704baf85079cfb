use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::{data::dataset::TargetValue, error::ModelError};

/// Learner-specific behaviour plugged into the shared tree and forest code.
///
/// Implemented by [`Classification`](super::classifier::Classification)
/// (Gini impurity, majority leaf, vote) and
/// [`Regression`](super::regressor::Regression) (variance, mean leaf, average).
pub trait TreeKind: Clone + Copy + Debug + Default + Send + Sync + 'static {
    /// Label stored in leaves and returned by predictions.
    type Label: TargetValue + PartialEq + Serialize + DeserializeOwned;

    /// Human-readable learner name used in logs.
    const NAME: &'static str;

    /// Impurity of a non-empty label vector; lower is more homogeneous.
    fn impurity(labels: &[Self::Label]) -> f64;

    /// Value a leaf predicts for the labels that reached it.
    fn leaf_value(labels: &[Self::Label]) -> Self::Label;

    /// Whether a node whose labels are all equal stops splitting early.
    fn stops_when_pure() -> bool;

    /// Candidate thresholds for one feature, given its values sorted ascending.
    fn candidate_thresholds(sorted_values: &[f64]) -> Vec<f64>;

    /// Combines the per-tree predictions of a forest for one row.
    fn aggregate(predictions: &[Self::Label]) -> Self::Label;

    /// Rounds a leaf value to its encoded precision.
    fn encode_label(label: Self::Label) -> Self::Label;

    /// Converts a wire label (always a float) into this learner's label.
    fn label_from_wire(row_index: usize, value: f64) -> Result<Self::Label, ModelError>;

    /// Features scanned per split inside a forest; `None` scans every column.
    fn forest_max_features(num_features: usize) -> Option<usize>;
}

/// Decimal places kept for thresholds and real-valued leaves in encoded trees.
pub const ENCODED_DECIMALS: i32 = 4;

/// Magnitude from which an `f64` has no digits left after the fourth decimal.
const EXACT_MAGNITUDE: f64 = 1e15;

pub(crate) fn round_encoded(value: f64) -> f64 {
    if value.abs() >= EXACT_MAGNITUDE {
        return value;
    }
    let scale = 10f64.powi(ENCODED_DECIMALS);
    (value * scale).round() / scale
}
