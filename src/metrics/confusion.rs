use std::collections::BTreeSet;

use nalgebra::{DMatrix, DVector};

use crate::{
    data::dataset::WholeNumber,
    error::ModelError,
    forests::classifier::RandomForestClassifier,
    trees::classifier::DecisionTreeClassifier,
};

type ConfusionMatrix = DMatrix<usize>;

pub trait ClassificationMetrics<T: WholeNumber + Ord> {
    /// Confusion matrix with rows for true classes and columns for predicted
    /// classes, both in ascending class order.
    fn confusion_matrix(
        &self,
        y_true: &DVector<T>,
        y_pred: &DVector<T>,
    ) -> Result<ConfusionMatrix, ModelError> {
        check_lengths(y_true.len(), y_pred.len())?;

        let classes = y_true
            .iter()
            .chain(y_pred.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();

        let mut matrix = DMatrix::zeros(classes.len(), classes.len());
        for (y_t, y_p) in y_true.iter().zip(y_pred.iter()) {
            // Both lookups succeed: `classes` holds every label seen above.
            let row = classes.binary_search(y_t).unwrap_or_default();
            let col = classes.binary_search(y_p).unwrap_or_default();
            matrix[(row, col)] += 1;
        }
        Ok(matrix)
    }

    /// Fraction of predictions equal to the true label.
    fn accuracy(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64, ModelError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        if y_true.is_empty() {
            return Ok(0.0);
        }
        Ok(matrix.diagonal().sum() as f64 / y_true.len() as f64)
    }
}

pub(crate) fn check_lengths(truth: usize, predicted: usize) -> Result<(), ModelError> {
    if truth != predicted {
        return Err(ModelError::LabelCountMismatch {
            rows: predicted,
            labels: truth,
        });
    }
    Ok(())
}

impl ClassificationMetrics<i64> for DecisionTreeClassifier {}
impl ClassificationMetrics<i64> for RandomForestClassifier {}
