//! # Rusty-forest
//!
//! `rusty-forest` grows decision trees and random forests for classification and
//! regression, and round-trips fitted models through a small JSON format so a
//! model trained in one process can predict in another.
//!
//! ## Getting Started
//!
//! To use `rusty-forest`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-forest = "*"
//! ```
//!
//! ## Example Usage
//!
//! Train a classification tree, serialize it and predict with the decoded copy:
//!
//! ```rust
//! use rusty_forest::data::dataset::Dataset;
//! use rusty_forest::trees::{Classification, DecisionTreeClassifier, Tree};
//! use nalgebra::{DMatrix, DVector};
//!
//! let x = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
//! let y = DVector::from_vec(vec![0, 0, 1, 1]);
//!
//! let dataset = Dataset::new(x, y);
//!
//! let mut model = DecisionTreeClassifier::with_params(None, Some(3)).unwrap();
//!
//! model.fit(&dataset).unwrap();
//!
//! let encoded = model.tree().unwrap().to_json().unwrap();
//! let decoded = Tree::<Classification>::from_json(&encoded).unwrap();
//!
//! assert_eq!(decoded.predict_row(&[6.0, 7.0]).unwrap(), 1);
//! ```

/// Dataset and data manipulation utilities
pub mod data;
/// Error type shared by every fallible operation
pub mod error;
/// Random Forests
pub mod forests;
/// Functions for evaluating model performance
pub mod metrics;
/// JSON training and prediction requests
pub mod service;
/// Decision trees
pub mod trees;

pub use error::ModelError;
