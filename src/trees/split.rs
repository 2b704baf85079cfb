//! Exhaustive split search.

use crate::data::dataset::Dataset;

use super::kind::TreeKind;

/// Winning split of a node together with the partitions it induces.
#[derive(Debug)]
pub struct SplitData<K: TreeKind> {
    pub feature_index: usize,
    pub threshold: f64,
    /// Sample-weighted impurity of the two children.
    pub impurity: f64,
    pub left: Dataset<f64, K::Label>,
    pub right: Dataset<f64, K::Label>,
}

/// Finds the `(feature, threshold)` pair minimizing weighted child impurity.
///
/// Only the columns listed in `features` are scanned, in the given order.
/// Rows go left when `value < threshold`. A candidate that leaves either side
/// empty is skipped. On equal impurity the first candidate in
/// feature-then-threshold order wins.
///
/// Returns `None` when every candidate is degenerate.
pub fn find_best_split<K: TreeKind>(
    dataset: &Dataset<f64, K::Label>,
    features: &[usize],
) -> Option<SplitData<K>> {
    let num_samples = dataset.nrows() as f64;
    let labels = dataset.y.as_slice();

    let mut best: Option<(usize, f64, f64)> = None;

    for &feature_index in features {
        let column = dataset.x.column(feature_index);
        let mut sorted_values: Vec<f64> = column.iter().copied().collect();
        sorted_values.sort_by(f64::total_cmp);

        for threshold in K::candidate_thresholds(&sorted_values) {
            let mut left = Vec::new();
            let mut right = Vec::new();
            for (&value, &label) in column.iter().zip(labels) {
                if value < threshold {
                    left.push(label);
                } else {
                    right.push(label);
                }
            }
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let impurity = (left.len() as f64 / num_samples) * K::impurity(&left)
                + (right.len() as f64 / num_samples) * K::impurity(&right);

            if best.map_or(true, |(_, _, best_impurity)| impurity < best_impurity) {
                best = Some((feature_index, threshold, impurity));
            }
        }
    }

    let (feature_index, threshold, impurity) = best?;
    let (left, right) = dataset.split_on_threshold(feature_index, threshold);
    Some(SplitData {
        feature_index,
        threshold,
        impurity,
        left,
        right,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trees::{classifier::Classification, regressor::Regression};
    use approx::assert_relative_eq;
    use nalgebra::{DMatrix, DVector};

    #[test]
    fn test_classification_split_uses_observed_values() {
        let x = DMatrix::from_row_slice(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        let y = DVector::from_vec(vec![0, 0, 1, 1]);
        let dataset = Dataset::new(x, y);

        let split = find_best_split::<Classification>(&dataset, &[0]).unwrap();
        assert_eq!(split.feature_index, 0);
        assert_eq!(split.threshold, 3.0);
        assert_eq!(split.impurity, 0.0);
        assert_eq!(split.left.y, DVector::from_vec(vec![0, 0]));
        assert_eq!(split.right.y, DVector::from_vec(vec![1, 1]));
    }

    #[test]
    fn test_regression_split_uses_midpoints() {
        let x = DMatrix::from_row_slice(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        let y = DVector::from_vec(vec![1.0, 1.0, 5.0, 5.0]);
        let dataset = Dataset::new(x, y);

        let split = find_best_split::<Regression>(&dataset, &[0]).unwrap();
        assert_eq!(split.threshold, 2.5);
        assert_relative_eq!(split.impurity, 0.0);
        assert_eq!(split.left.nrows(), 2);
    }

    #[test]
    fn test_picks_the_informative_feature() {
        // Feature 0 is noise, feature 1 separates the classes.
        let x = DMatrix::from_row_slice(4, 2, &[5.0, 1.0, 1.0, 2.0, 4.0, 10.0, 2.0, 11.0]);
        let y = DVector::from_vec(vec![0, 0, 1, 1]);
        let dataset = Dataset::new(x, y);

        let split = find_best_split::<Classification>(&dataset, &[0, 1]).unwrap();
        assert_eq!(split.feature_index, 1);
        assert_eq!(split.threshold, 10.0);
    }

    #[test]
    fn test_ties_keep_first_feature() {
        // Both columns separate the classes perfectly.
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0]);
        let y = DVector::from_vec(vec![0, 0, 1, 1]);
        let dataset = Dataset::new(x, y);

        assert_eq!(find_best_split::<Classification>(&dataset, &[0, 1]).unwrap().feature_index, 0);
        assert_eq!(find_best_split::<Classification>(&dataset, &[1, 0]).unwrap().feature_index, 1);
    }

    #[test]
    fn test_constant_feature_has_no_split() {
        let x = DMatrix::from_row_slice(3, 1, &[7.0, 7.0, 7.0]);
        let dataset = Dataset::new(x.clone(), DVector::from_vec(vec![0, 1, 0]));
        assert!(find_best_split::<Classification>(&dataset, &[0]).is_none());

        let dataset = Dataset::new(x, DVector::from_vec(vec![1.0, 2.0, 3.0]));
        assert!(find_best_split::<Regression>(&dataset, &[0]).is_none());
    }
}
