use nalgebra::{DMatrix, DVector};
use num_traits::{Float, FromPrimitive, Num, ToPrimitive};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::cmp::PartialOrd;
use std::fmt::{self, Display};
use std::fmt::{Debug, Formatter};
use std::hash::Hash;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use crate::error::ModelError;

pub trait DataValue:
    Debug
    + Clone
    + Copy
    + Num
    + FromPrimitive
    + ToPrimitive
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + Display
    + 'static
{
}

impl<T> DataValue for T where
    T: Debug
        + Clone
        + Copy
        + Num
        + FromPrimitive
        + ToPrimitive
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
        + Send
        + Sync
        + Display
        + 'static
{
}

pub trait Number: DataValue + PartialOrd {}
impl<T> Number for T where T: DataValue + PartialOrd {}

pub trait WholeNumber: Number + Eq + Hash {}
impl<T> WholeNumber for T where T: Number + Eq + Hash {}

pub trait RealNumber: Number + Float {}
impl<T> RealNumber for T where T: Number + Float {}

pub trait TargetValue: DataValue {}
impl<T> TargetValue for T where T: DataValue {}

/// Training set: one feature row per label.
pub struct Dataset<XT: Number, YT: TargetValue> {
    pub x: DMatrix<XT>,
    pub y: DVector<YT>,
}

impl<XT: Number, YT: TargetValue> Clone for Dataset<XT, YT> {
    fn clone(&self) -> Self {
        Self::new(self.x.clone(), self.y.clone())
    }
}

impl<XT: Number, YT: TargetValue> Debug for Dataset<XT, YT> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    x: [\n")?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{:?}, ", self.x[(i, j)])?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    y: [")?;
        for i in 0..self.y.len() {
            write!(f, "{:?}, ", self.y[i])?;
        }
        write!(f, "]\n}}")
    }
}

impl<YT: TargetValue> Dataset<f64, YT> {
    /// Builds a dataset from row-major feature rows, enforcing the input contract.
    ///
    /// # Errors
    ///
    /// * [`ModelError::EmptyDataset`] if `rows` is empty.
    /// * [`ModelError::ZeroFeatures`] if the rows have no columns.
    /// * [`ModelError::RaggedRow`] if a row's width differs from the first row's.
    /// * [`ModelError::LabelCountMismatch`] if `labels` has a different length than `rows`.
    /// * [`ModelError::NonFiniteValue`] if any feature is NaN or infinite.
    pub fn from_rows(rows: &[Vec<f64>], labels: Vec<YT>) -> Result<Self, ModelError> {
        let first = rows.first().ok_or(ModelError::EmptyDataset)?;
        let num_features = first.len();
        if num_features == 0 {
            return Err(ModelError::ZeroFeatures);
        }
        if labels.len() != rows.len() {
            return Err(ModelError::LabelCountMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != num_features {
                return Err(ModelError::RaggedRow {
                    row_index,
                    expected: num_features,
                    got: row.len(),
                });
            }
            if row.iter().any(|value| !value.is_finite()) {
                return Err(ModelError::NonFiniteValue { row_index });
            }
        }

        let x = DMatrix::from_row_slice(rows.len(), num_features, &rows.concat());
        Ok(Self::new(x, DVector::from_vec(labels)))
    }
}

impl<XT: Number, YT: TargetValue> Dataset<XT, YT> {
    pub fn new(x: DMatrix<XT>, y: DVector<YT>) -> Self {
        Self { x, y }
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// Copies the given rows, in the given order, into a new dataset.
    ///
    /// Indices may repeat; this is how bootstrap resamples are materialised.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        if indices.is_empty() {
            return Self::new(DMatrix::zeros(0, self.x.ncols()), DVector::zeros(0));
        }
        let rows = indices
            .iter()
            .map(|&index| self.x.row(index))
            .collect::<Vec<_>>();
        let labels = indices.iter().map(|&index| self.y[index]).collect::<Vec<_>>();

        Self::new(DMatrix::from_rows(&rows), DVector::from_vec(labels))
    }

    /// Partitions the rows into `value < threshold` (left) and the rest (right).
    pub fn split_on_threshold(&self, feature_index: usize, threshold: XT) -> (Self, Self) {
        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) =
            (0..self.x.nrows()).partition(|&index| self.x[(index, feature_index)] < threshold);

        (self.select_rows(&left_indices), self.select_rows(&right_indices))
    }

    pub fn train_test_split(
        &self,
        train_size: f64,
        seed: Option<u64>,
    ) -> Result<(Self, Self), ModelError> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err(ModelError::invalid_parameter(
                "train_size",
                "should be between 0.0 and 1.0",
            ));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.x.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let train_size = (self.x.nrows() as f64 * train_size).floor() as usize;

        Ok((
            self.select_rows(&indices[..train_size]),
            self.select_rows(&indices[train_size..]),
        ))
    }
}
