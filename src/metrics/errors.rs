use nalgebra::DVector;

use crate::{
    data::dataset::RealNumber,
    error::ModelError,
    forests::regressor::RandomForestRegressor,
    trees::regressor::DecisionTreeRegressor,
};

use super::confusion::check_lengths;

pub trait RegressionMetrics<T: RealNumber> {
    fn mse(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<T, ModelError> {
        let n = sample_count(y_true, y_pred)?;
        let errors = y_pred - y_true;
        Ok(errors.component_mul(&errors).sum() / n)
    }

    fn mae(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<T, ModelError> {
        let n = sample_count(y_true, y_pred)?;
        let abs_errors_sum = y_pred
            .iter()
            .zip(y_true.iter())
            .fold(T::zero(), |acc, (&y_p, &y_t)| acc + (y_p - y_t).abs());
        Ok(abs_errors_sum / n)
    }

    /// Coefficient of determination against the mean of `y_true`.
    fn r2(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<T, ModelError> {
        let n = sample_count(y_true, y_pred)?;
        let y_true_mean = y_true.sum() / n;
        let residual = y_true
            .iter()
            .zip(y_pred.iter())
            .fold(T::zero(), |acc, (&y_t, &y_p)| acc + (y_t - y_p) * (y_t - y_p));
        let total = y_true
            .iter()
            .fold(T::zero(), |acc, &y_t| acc + (y_t - y_true_mean) * (y_t - y_true_mean));
        Ok(T::one() - residual / total)
    }
}

fn sample_count<T: RealNumber>(y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<T, ModelError> {
    check_lengths(y_true.len(), y_pred.len())?;
    if y_true.is_empty() {
        return Err(ModelError::EmptyDataset);
    }
    T::from_usize(y_true.len())
        .ok_or_else(|| ModelError::invalid_parameter("y_true", "length doesn't fit the float type"))
}

impl RegressionMetrics<f64> for DecisionTreeRegressor {}
impl RegressionMetrics<f64> for RandomForestRegressor {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Scorer;
    impl RegressionMetrics<f64> for Scorer {}

    #[test]
    fn test_mse_and_mae() {
        let y_true = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let y_pred = DVector::from_vec(vec![1.0, 3.0, 3.0, 2.0]);
        assert_relative_eq!(Scorer.mse(&y_true, &y_pred).unwrap(), 1.25);
        assert_relative_eq!(Scorer.mae(&y_true, &y_pred).unwrap(), 0.75);
    }

    #[test]
    fn test_r2() {
        let y_true = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(Scorer.r2(&y_true, &y_true).unwrap(), 1.0);

        let mean_pred = DVector::from_element(4, 2.5);
        assert_relative_eq!(Scorer.r2(&y_true, &mean_pred).unwrap(), 0.0);
    }

    #[test]
    fn test_mismatched_lengths() {
        let y_true = DVector::from_vec(vec![1.0, 2.0]);
        let y_pred = DVector::from_vec(vec![1.0]);
        assert!(Scorer.mse(&y_true, &y_pred).is_err());
        assert!(Scorer.r2(&y_true, &y_pred).is_err());
    }
}
