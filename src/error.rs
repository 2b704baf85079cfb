/// Errors reported by fitting, prediction and model decoding.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Returned when the training set has no rows.
    #[error("training dataset has zero samples")]
    EmptyDataset,

    /// Returned when the training rows have no feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when a row has a different width than the first row.
    #[error("row {row_index} has {got} features, expected {expected}")]
    RaggedRow {
        /// The zero-based index of the offending row.
        row_index: usize,
        /// The width of the first row.
        expected: usize,
        /// The width of the offending row.
        got: usize,
    },

    /// Returned when the label vector and the feature matrix disagree in length.
    #[error("got {labels} labels for {rows} rows")]
    LabelCountMismatch {
        /// Number of feature rows.
        rows: usize,
        /// Number of labels.
        labels: usize,
    },

    /// Returned when a feature value or label is NaN or infinite.
    #[error("non-finite value at row {row_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending row.
        row_index: usize,
    },

    /// Returned when a classification label is not a whole number.
    #[error("classification label {value} at row {row_index} is not a whole number")]
    NonIntegralLabel {
        /// The zero-based index of the offending row.
        row_index: usize,
        /// The label as received.
        value: f64,
    },

    /// Returned when the algorithm selector names no known learner.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Returned when a serialized tree or forest can't be decoded.
    #[error("malformed model: {0}")]
    MalformedModel(String),

    /// Returned when a fitted tree has more levels than the JSON format carries.
    #[error("tree has {depth} levels, at most {max_depth} can be encoded; lower `max_depth`")]
    ModelTooDeep {
        /// Levels of the fitted tree.
        depth: usize,
        /// Deepest encodable tree.
        max_depth: usize,
    },

    /// Returned when a classification label lies outside the integer label range.
    #[error("classification label {value} at row {row_index} is out of range")]
    LabelOutOfRange {
        /// The zero-based index of the offending row.
        row_index: usize,
        /// The label as received.
        value: f64,
    },

    /// Returned when a fitted model can't be encoded to JSON.
    #[error("failed to encode model")]
    EncodeModel {
        /// The underlying serde_json error.
        source: serde_json::Error,
    },

    /// Returned when a hyperparameter is out of its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Wire or builder name of the parameter.
        name: &'static str,
        /// Human-readable description of the constraint.
        reason: String,
    },

    /// Returned when predicting with a model that holds no tree.
    #[error("model wasn't fitted yet")]
    NotFitted,

    /// Returned when a prediction row is too short for the tree it is routed through.
    #[error("feature index {feature_index} is out of range for a row of {row_len} features")]
    FeatureIndexOutOfRange {
        /// Feature index stored in the decision node.
        feature_index: usize,
        /// Width of the row being predicted.
        row_len: usize,
    },

    /// Returned when a request body is not valid JSON of the expected shape.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ModelError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
