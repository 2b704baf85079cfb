//! Impurity and leaf-value functions over a label vector.
//!
//! All functions expect a non-empty slice. The tree builder never calls them
//! on an empty partition because empty splits are rejected before scoring.

use std::collections::BTreeMap;

/// Frequency of each class, keyed in ascending class order.
pub fn class_counts<L: Ord + Copy>(labels: &[L]) -> BTreeMap<L, usize> {
    let mut counts = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

/// Gini impurity `1 - Σ p_c²`.
pub fn gini<L: Ord + Copy>(labels: &[L]) -> f64 {
    debug_assert!(!labels.is_empty(), "gini impurity of an empty label vector");
    let n = labels.len() as f64;
    1.0 - class_counts(labels)
        .values()
        .map(|&count| {
            let p = count as f64 / n;
            p * p
        })
        .sum::<f64>()
}

/// Most frequent class. Ties go to the lowest class id.
///
/// Returns `None` for an empty slice.
pub fn majority_class<L: Ord + Copy>(labels: &[L]) -> Option<L> {
    let mut best: Option<(L, usize)> = None;
    for (label, count) in class_counts(labels) {
        // Strict comparison over ascending keys keeps the lowest id on ties.
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance, i.e. the MSE of predicting the mean.
pub fn variance(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty(), "variance of an empty label vector");
    let mean = mean(values);
    values.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64
}
