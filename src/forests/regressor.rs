//! Random Forest Regressor
use super::forest::Forest;
use crate::trees::regressor::Regression;

/// Bagged regression trees combined by averaging.
///
/// Each split search scans a fresh random third of the feature columns
/// (at least one), unlike the classifier which scans them all.
pub type RandomForestRegressor = Forest<Regression>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Dataset;
    use approx::assert_relative_eq;
    use nalgebra::{DMatrix, DVector};

    fn linear_dataset() -> Dataset<f64, f64> {
        let x = DMatrix::from_fn(30, 4, |i, j| (i as f64) * (j as f64 + 1.0) % 11.0 + i as f64);
        let y = DVector::from_fn(30, |i, _| 2.0 * i as f64 + 1.0);
        Dataset::new(x, y)
    }

    #[test]
    fn test_prediction_is_mean_of_member_predictions() {
        let dataset = linear_dataset();
        let mut forest = RandomForestRegressor::with_params(6, None, Some(4)).unwrap();
        forest.fit(&dataset, Some(77)).unwrap();

        for row in [[0.0, 1.0, 2.0, 3.0], [12.0, 4.0, 20.0, 15.5], [40.0, 40.0, 40.0, 40.0]] {
            let member_mean = forest
                .trees()
                .iter()
                .map(|tree| tree.predict_row(&row).unwrap())
                .sum::<f64>()
                / forest.num_trees() as f64;
            assert_relative_eq!(forest.predict_row(&row).unwrap(), member_mean, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_predictions_stay_within_target_range() {
        let dataset = linear_dataset();
        let mut forest = RandomForestRegressor::with_params(8, None, None).unwrap();
        forest.fit(&dataset, Some(5)).unwrap();

        let predictions = forest.predict(&dataset.x).unwrap();
        assert!(predictions.iter().all(|&p| (1.0..=59.0).contains(&p)));
    }

    #[test]
    fn test_single_feature_is_always_scanned() {
        let x = DMatrix::from_vec(5, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = DVector::from_vec(vec![10.0, 10.0, 10.0, 50.0, 50.0]);
        let dataset = Dataset::new(x, y);
        let mut forest = RandomForestRegressor::with_params(20, None, None).unwrap();
        forest.fit(&dataset, Some(9)).unwrap();

        assert!(forest.predict_row(&[1.0]).unwrap() < forest.predict_row(&[5.0]).unwrap());
    }
}
