//! Random Forest Classifier
use super::forest::Forest;
use crate::trees::classifier::Classification;

/// Bagged classification trees combined by majority vote.
///
/// Every split of every member tree scans all feature columns.
pub type RandomForestClassifier = Forest<Classification>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Dataset;
    use crate::trees::impurity::majority_class;
    use nalgebra::{DMatrix, DVector};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn noisy_dataset() -> Dataset<f64, i64> {
        let mut rng = StdRng::seed_from_u64(17);
        let rows = 60;
        let x = DMatrix::from_fn(rows, 3, |_, _| rng.gen_range(0.0..10.0));
        let y = DVector::from_fn(rows, |i, _| {
            let base = if x[(i, 0)] + x[(i, 1)] > 10.0 { 1 } else { 0 };
            // Flip a few labels so the bootstrap trees disagree.
            if i % 7 == 0 {
                1 - base
            } else {
                base
            }
        });
        Dataset::new(x, y)
    }

    #[test]
    fn test_vote_is_the_mode_of_member_predictions() {
        let dataset = noisy_dataset();
        let mut forest = RandomForestClassifier::with_params(9, None, Some(4)).unwrap();
        forest.fit(&dataset, Some(3)).unwrap();

        for i in 0..dataset.nrows() {
            let row: Vec<f64> = dataset.x.row(i).iter().copied().collect();
            let votes: Vec<i64> = forest
                .trees()
                .iter()
                .map(|tree| tree.predict_row(&row).unwrap())
                .collect();
            assert_eq!(forest.predict_row(&row).unwrap(), majority_class(&votes).unwrap());
        }
    }

    #[test]
    fn test_batch_predict_matches_rows() {
        let dataset = noisy_dataset();
        let mut forest = RandomForestClassifier::with_params(5, None, Some(3)).unwrap();
        forest.fit(&dataset, Some(21)).unwrap();

        let predictions = forest.predict(&dataset.x).unwrap();
        for (i, prediction) in predictions.iter().enumerate() {
            let row: Vec<f64> = dataset.x.row(i).iter().copied().collect();
            assert_eq!(*prediction, forest.predict_row(&row).unwrap());
        }
    }

    #[test]
    fn test_separable_blobs() {
        let x = DMatrix::from_row_slice(6, 1, &[0.0, 0.5, 1.0, 9.0, 9.5, 10.0]);
        let dataset = Dataset::new(x, DVector::from_vec(vec![0, 0, 0, 1, 1, 1]));
        let mut forest = RandomForestClassifier::with_params(15, None, None).unwrap();
        forest.fit(&dataset, Some(1)).unwrap();

        assert_eq!(forest.predict_row(&[-3.0]).unwrap(), 0);
        assert_eq!(forest.predict_row(&[0.2]).unwrap(), 0);
        assert_eq!(forest.predict_row(&[10.0]).unwrap(), 1);
        assert_eq!(forest.predict_row(&[30.0]).unwrap(), 1);
    }
}
