//! Fitted decision trees: prediction and the JSON interchange format.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ModelError;

use super::kind::{round_encoded, TreeKind};
use super::node::TreeNode;

/// Deepest tree [`Tree::to_json`] emits.
///
/// Every level nests one JSON object, and a prediction request wraps the tree
/// in up to four more containers; serde_json stops reading at 128.
pub const MAX_ENCODED_DEPTH: usize = 120;

/// An immutable fitted tree.
///
/// Produced by [`DecisionTree::fit`](super::decision_tree::DecisionTree::fit)
/// or decoded with [`Tree::from_json`]. A decoded tree carries no
/// hyperparameters and supports prediction only.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree<K: TreeKind> {
    root: TreeNode<K::Label>,
}

impl<K: TreeKind> Tree<K> {
    pub(crate) fn from_root(root: TreeNode<K::Label>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &TreeNode<K::Label> {
        &self.root
    }

    /// Number of node levels; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Routes one feature row to a leaf and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::FeatureIndexOutOfRange`] if a decision node on the
    /// path reads a column the row doesn't have.
    pub fn predict_row(&self, row: &[f64]) -> Result<K::Label, ModelError> {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    let value = row.get(*feature_index).ok_or(
                        ModelError::FeatureIndexOutOfRange {
                            feature_index: *feature_index,
                            row_len: row.len(),
                        },
                    )?;
                    node = if *value < *threshold { left } else { right };
                }
            }
        }
    }

    /// Predicts every row of `features`, preserving row order.
    pub fn predict(&self, features: &DMatrix<f64>) -> Result<DVector<K::Label>, ModelError> {
        let predictions = (0..features.nrows())
            .into_par_iter()
            .map(|i| {
                let row: Vec<f64> = features.row(i).iter().copied().collect();
                self.predict_row(&row)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DVector::from_vec(predictions))
    }

    /// Encodes the tree, rounding thresholds and real-valued leaves to four decimals.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ModelTooDeep`] for trees with more than
    /// [`MAX_ENCODED_DEPTH`] levels, which JSON readers can't nest back.
    pub fn to_json(&self) -> Result<Value, ModelError> {
        let depth = self.depth();
        if depth > MAX_ENCODED_DEPTH {
            return Err(ModelError::ModelTooDeep {
                depth,
                max_depth: MAX_ENCODED_DEPTH,
            });
        }
        let encoded = self.root.map_values(&round_encoded, &K::encode_label);
        serde_json::to_value(encoded).map_err(|source| ModelError::EncodeModel { source })
    }

    /// Decodes a tree previously produced by [`Tree::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MalformedModel`] for a missing field, an unknown
    /// `"type"`, or a value of the wrong kind.
    pub fn from_json(value: &Value) -> Result<Self, ModelError> {
        let root = TreeNode::<K::Label>::deserialize(value)
            .map_err(|error| ModelError::MalformedModel(error.to_string()))?;
        debug!(
            learner = K::NAME,
            depth = root.depth(),
            leaves = root.num_leaves(),
            "decoded tree"
        );
        Ok(Self { root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trees::{classifier::Classification, regressor::Regression};
    use serde_json::json;

    fn stump() -> Tree<Regression> {
        Tree::from_root(TreeNode::split(
            1,
            0.123456,
            TreeNode::leaf(1.0 / 3.0),
            TreeNode::leaf(2.0),
        ))
    }

    #[test]
    fn test_predict_row_routes_strictly_below_threshold() {
        let tree = stump();
        assert_eq!(tree.predict_row(&[9.0, 0.1]).unwrap(), 1.0 / 3.0);
        assert_eq!(tree.predict_row(&[9.0, 0.123456]).unwrap(), 2.0);
    }

    #[test]
    fn test_predict_row_short_row() {
        let err = stump().predict_row(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::FeatureIndexOutOfRange {
                feature_index: 1,
                row_len: 1
            }
        ));
    }

    #[test]
    fn test_predict_matrix_keeps_order() {
        let features = DMatrix::from_row_slice(3, 2, &[0.0, 5.0, 0.0, -5.0, 0.0, 0.2]);
        let predictions = stump().predict(&features).unwrap();
        assert_eq!(predictions, DVector::from_vec(vec![2.0, 1.0 / 3.0, 2.0]));
    }

    #[test]
    fn test_to_json_rounds_to_four_decimals() {
        let encoded = stump().to_json().unwrap();
        assert_eq!(
            encoded,
            json!({
                "type": "split",
                "feature_index": 1,
                "threshold": 0.1235,
                "left": {"type": "leaf", "value": 0.3333},
                "right": {"type": "leaf", "value": 2.0}
            })
        );
    }

    #[test]
    fn test_classification_leaf_encodes_as_integer() {
        let tree: Tree<Classification> = Tree::from_root(TreeNode::leaf(4));
        assert_eq!(tree.to_json().unwrap(), json!({"type": "leaf", "value": 4}));
    }

    #[test]
    fn test_from_json_accepts_integer_reals() {
        let tree = Tree::<Regression>::from_json(&json!({"type": "leaf", "value": 12})).unwrap();
        assert_eq!(tree.predict_row(&[]).unwrap(), 12.0);
    }

    #[test]
    fn test_from_json_unknown_type() {
        let err = Tree::<Classification>::from_json(&json!({"type": "stump", "value": 1})).unwrap_err();
        assert!(matches!(err, ModelError::MalformedModel(_)));
    }

    #[test]
    fn test_from_json_missing_field() {
        let err = Tree::<Classification>::from_json(&json!({
            "type": "split",
            "threshold": 1.0,
            "left": {"type": "leaf", "value": 0},
            "right": {"type": "leaf", "value": 1}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("feature_index"));
    }

    fn chain(depth: usize) -> Tree<Regression> {
        let mut node = TreeNode::leaf(0.0);
        for level in 1..depth {
            node = TreeNode::split(0, level as f64, TreeNode::leaf(level as f64), node);
        }
        Tree::from_root(node)
    }

    #[test]
    fn test_to_json_depth_limit() {
        let err = chain(MAX_ENCODED_DEPTH + 1).to_json().unwrap_err();
        assert!(matches!(
            err,
            ModelError::ModelTooDeep {
                depth,
                max_depth: MAX_ENCODED_DEPTH,
            } if depth == MAX_ENCODED_DEPTH + 1
        ));
    }

    #[test]
    fn test_deepest_encoding_parses_inside_request_envelope() {
        let tree = chain(MAX_ENCODED_DEPTH);
        let body = json!({
            "trainedModel": { "model_details": { "forestStructure": [tree.to_json().unwrap()] } }
        })
        .to_string();

        let parsed: Value = serde_json::from_str(&body).unwrap();
        let encoded = &parsed["trainedModel"]["model_details"]["forestStructure"][0];
        let decoded = Tree::<Regression>::from_json(encoded).unwrap();
        assert_eq!(decoded.depth(), MAX_ENCODED_DEPTH);
        assert_eq!(decoded.predict_row(&[1000.0]).unwrap(), 0.0);
        assert_eq!(decoded, tree);
    }
}
