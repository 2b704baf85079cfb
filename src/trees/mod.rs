/// Classification learner and its tree alias
pub mod classifier;
/// Recursive tree induction
pub mod decision_tree;
/// Impurity and aggregation functions
pub mod impurity;
/// Learner abstraction shared by trees and forests
pub mod kind;
/// Tree vertices and their interchange format
pub mod node;
/// Tree hyperparameters
pub mod params;
/// Regression learner and its tree alias
pub mod regressor;
/// Split search
pub mod split;
/// Fitted trees
pub mod tree;

pub use classifier::{Classification, DecisionTreeClassifier};
pub use decision_tree::DecisionTree;
pub use kind::TreeKind;
pub use node::TreeNode;
pub use params::TreeParams;
pub use regressor::{DecisionTreeRegressor, Regression};
pub use tree::Tree;
