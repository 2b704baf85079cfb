use serde::{Deserialize, Serialize};

/// Decision tree vertex.
///
/// The serde representation is the interchange format of trained models:
/// `{"type": "leaf", "value": v}` or
/// `{"type": "split", "feature_index": i, "threshold": t, "left": .., "right": ..}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode<L> {
    Leaf {
        value: L,
    },
    Split {
        feature_index: usize,
        /// Rows with `value < threshold` go left, all others go right.
        threshold: f64,
        left: Box<TreeNode<L>>,
        right: Box<TreeNode<L>>,
    },
}

impl<L: Copy> TreeNode<L> {
    pub fn leaf(value: L) -> Self {
        Self::Leaf { value }
    }

    pub fn split(feature_index: usize, threshold: f64, left: Self, right: Self) -> Self {
        Self::Split {
            feature_index,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of levels below and including this node; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn num_leaves(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Split { left, right, .. } => left.num_leaves() + right.num_leaves(),
        }
    }

    /// Copy of the subtree with thresholds and leaf values passed through the given maps.
    pub(crate) fn map_values(
        &self,
        threshold_map: &impl Fn(f64) -> f64,
        value_map: &impl Fn(L) -> L,
    ) -> Self {
        match self {
            Self::Leaf { value } => Self::leaf(value_map(*value)),
            Self::Split {
                feature_index,
                threshold,
                left,
                right,
            } => Self::split(
                *feature_index,
                threshold_map(*threshold),
                left.map_values(threshold_map, value_map),
                right.map_values(threshold_map, value_map),
            ),
        }
    }
}
