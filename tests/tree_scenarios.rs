use approx::assert_relative_eq;
use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};

use rusty_forest::{
    data::dataset::Dataset,
    error::ModelError,
    forests::{RandomForestClassifier, RandomForestRegressor},
    trees::{
        impurity::{gini, variance},
        DecisionTreeClassifier, DecisionTreeRegressor,
    },
};

fn one_to_ten() -> DMatrix<f64> {
    DMatrix::from_vec(10, 1, (1..=10).map(f64::from).collect())
}

#[test]
fn parity_classifier_predicts_valid_labels() {
    let labels = (1..=10).map(|i| i64::from(i % 2 == 0)).collect::<Vec<_>>();
    let dataset = Dataset::new(one_to_ten(), DVector::from_vec(labels));

    let mut classifier = DecisionTreeClassifier::with_params(Some(2), Some(5)).unwrap();
    classifier.fit(&dataset).unwrap();

    // The root sits at depth 0, so five decision levels give six node levels.
    assert!(classifier.depth() >= 1 && classifier.depth() <= 6);
    let held_out = DMatrix::from_vec(3, 1, vec![11.0, 12.0, 13.0]);
    let predictions = classifier.predict(&held_out).unwrap();
    assert!(predictions.iter().all(|label| [0, 1].contains(label)));
}

#[test]
fn linear_regressor_brackets_midpoint() {
    let labels = vec![2.1, 3.9, 6.2, 8.1, 10.3, 12.2, 13.9, 16.2, 17.8, 19.7];
    let dataset = Dataset::new(one_to_ten(), DVector::from_vec(labels));

    let mut regressor = DecisionTreeRegressor::with_params(Some(2), Some(5)).unwrap();
    regressor.fit(&dataset).unwrap();

    assert!(regressor.depth() <= 6);
    let prediction = regressor.predict_row(&[5.5]).unwrap();
    assert!(
        (10.3..=12.2).contains(&prediction),
        "prediction {prediction} outside [10.3, 12.2]"
    );
}

#[test]
fn depth_stays_within_limit_on_random_data() {
    let mut rng = StdRng::seed_from_u64(11);
    let x = DMatrix::from_fn(60, 3, |_, _| rng.gen_range(-5.0_f64..5.0));
    let y = DVector::from_fn(60, |i, _| (x[(i, 0)] + x[(i, 1)] > 0.0) as i64);
    let dataset = Dataset::new(x, y);

    for max_depth in 1..=4 {
        let mut classifier = DecisionTreeClassifier::with_params(None, Some(max_depth)).unwrap();
        classifier.fit(&dataset).unwrap();
        assert!(classifier.depth() >= 1);
        assert!(classifier.depth() <= max_depth + 1);
    }
}

#[test]
fn impurity_bounds() {
    let labels = [0, 1, 2, 0, 1, 2, 2];
    let impurity = gini(&labels);
    assert!(impurity > 0.0 && impurity <= 1.0 - 1.0 / 3.0);
    assert_relative_eq!(gini(&[4, 4, 4]), 0.0);

    assert!(variance(&[1.0, 3.0, 8.0]) > 0.0);
    assert_relative_eq!(variance(&[2.5, 2.5]), 0.0);
}

#[test]
fn empty_feature_matrix_is_rejected() {
    let err = Dataset::<f64, i64>::from_rows(&[], vec![]).unwrap_err();
    assert!(matches!(err, ModelError::EmptyDataset));

    let empty = Dataset::new(DMatrix::<f64>::zeros(0, 2), DVector::<f64>::zeros(0));
    let mut regressor = DecisionTreeRegressor::new();
    assert!(matches!(regressor.fit(&empty), Err(ModelError::EmptyDataset)));
    let mut forest = RandomForestRegressor::new();
    assert!(matches!(forest.fit(&empty, Some(1)), Err(ModelError::EmptyDataset)));
}

#[test]
fn forests_aggregate_member_trees() {
    let mut rng = StdRng::seed_from_u64(21);
    let x = DMatrix::from_fn(40, 2, |_, _| rng.gen_range(0.0_f64..10.0));
    let class_y = DVector::from_fn(40, |i, _| (x[(i, 0)] > 5.0) as i64);
    let real_y = DVector::from_fn(40, |i, _| 2.0 * x[(i, 0)] - x[(i, 1)]);

    let mut classifier = RandomForestClassifier::with_params(9, None, Some(4)).unwrap();
    classifier
        .fit(&Dataset::new(x.clone(), class_y), Some(3))
        .unwrap();
    let mut regressor = RandomForestRegressor::with_params(9, None, Some(4)).unwrap();
    regressor.fit(&Dataset::new(x, real_y), Some(3)).unwrap();

    for row in [[1.0, 1.0], [4.9, 8.0], [5.1, 0.5], [9.0, 9.0]] {
        let votes = classifier
            .trees()
            .iter()
            .map(|tree| tree.predict_row(&row).unwrap())
            .collect::<Vec<_>>();
        let ones = votes.iter().filter(|&&vote| vote == 1).count();
        let mode = i64::from(ones > votes.len() - ones);
        assert_eq!(classifier.predict_row(&row).unwrap(), mode);

        let mean = regressor
            .trees()
            .iter()
            .map(|tree| tree.predict_row(&row).unwrap())
            .sum::<f64>()
            / regressor.num_trees() as f64;
        assert_relative_eq!(regressor.predict_row(&row).unwrap(), mean, epsilon = 1e-12);
    }
}
