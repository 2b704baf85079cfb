//! JSON request/response boundary for training and prediction.
//!
//! The service is stateless: a training response carries the full serialized
//! model, and every prediction request hands that model back.

use std::{fmt, str::FromStr};

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    data::dataset::Dataset,
    error::ModelError,
    forests::{forest::Forest, params::ForestParams},
    trees::{
        classifier::Classification, decision_tree::DecisionTree, kind::TreeKind,
        params::TreeParams, regressor::Regression, tree::Tree,
    },
};

/// The four learners the service can train and serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    DecisionTreeRegressor,
    DecisionTreeClassifier,
    RandomForestRegressor,
    RandomForestClassifier,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DecisionTreeRegressor => "decisionTreeRegressor",
            Self::DecisionTreeClassifier => "decisionTreeClassifier",
            Self::RandomForestRegressor => "randomForestRegressor",
            Self::RandomForestClassifier => "randomForestClassifier",
        }
    }

    pub fn is_forest(&self) -> bool {
        matches!(self, Self::RandomForestRegressor | Self::RandomForestClassifier)
    }

    fn trained_message(&self) -> &'static str {
        match self {
            Self::DecisionTreeRegressor => "Decision Tree Regressor trained successfully!",
            Self::DecisionTreeClassifier => "Decision Tree Classifier trained successfully!",
            Self::RandomForestRegressor => "Random Forest Regressor trained successfully!",
            Self::RandomForestClassifier => "Random Forest Classifier trained successfully!",
        }
    }

    /// Key under which a training response stores the serialized model.
    fn structure_key(&self) -> &'static str {
        if self.is_forest() {
            "forestStructure"
        } else {
            "treeStructure"
        }
    }
}

impl FromStr for Algorithm {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decisionTreeRegressor" => Ok(Self::DecisionTreeRegressor),
            "decisionTreeClassifier" => Ok(Self::DecisionTreeClassifier),
            "randomForestRegressor" => Ok(Self::RandomForestRegressor),
            "randomForestClassifier" => Ok(Self::RandomForestClassifier),
            other => Err(ModelError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Hyperparameters as they arrive on the wire: plain JSON numbers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HyperParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_samples_split: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_estimators: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<f64>,
}

impl HyperParams {
    /// Validated tree parameters; `max_depth` and `min_samples_split` are required.
    pub fn tree_params(&self) -> Result<TreeParams, ModelError> {
        let mut tree_params = TreeParams::new();
        tree_params.set_max_depth(Some(required_count("max_depth", self.max_depth)?))?;
        tree_params.set_min_samples_split(required_count(
            "min_samples_split",
            self.min_samples_split,
        )?)?;
        tree_params.set_seed(self.seed()?);
        Ok(tree_params)
    }

    /// Validated forest parameters; additionally requires `n_estimators`.
    pub fn forest_params(&self) -> Result<ForestParams, ModelError> {
        let mut forest_params = ForestParams::new();
        forest_params.set_num_trees(required_count("n_estimators", self.n_estimators)?)?;
        forest_params.set_tree_params(self.tree_params()?);
        Ok(forest_params)
    }

    pub fn seed(&self) -> Result<Option<u64>, ModelError> {
        self.seed
            .map(|seed| {
                whole_number("seed", seed)?
                    .to_u64()
                    .ok_or_else(|| ModelError::invalid_parameter("seed", "out of range"))
            })
            .transpose()
    }
}

fn whole_number(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(ModelError::invalid_parameter(
            name,
            format!("expected a non-negative whole number, got {value}"),
        ));
    }
    Ok(value)
}

fn required_count(name: &'static str, value: Option<f64>) -> Result<usize, ModelError> {
    let value = value.ok_or_else(|| ModelError::invalid_parameter(name, "missing"))?;
    whole_number(name, value)?
        .to_usize()
        .ok_or_else(|| ModelError::invalid_parameter(name, "out of range"))
}

/// Feature rows and labels; labels are floats on the wire for both learners.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    #[serde(rename = "X")]
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
}

impl TrainingData {
    /// Validates the rows and converts the labels to `K`'s label type.
    pub fn to_dataset<K: TreeKind>(&self) -> Result<Dataset<f64, K::Label>, ModelError> {
        let labels = self
            .y
            .iter()
            .enumerate()
            .map(|(row_index, &value)| K::label_from_wire(row_index, value))
            .collect::<Result<Vec<_>, _>>()?;
        Dataset::from_rows(&self.x, labels)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    pub algorithm: String,
    #[serde(default)]
    pub params: HyperParams,
    pub training_data: TrainingData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainResponse {
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_depth: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_structure: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_trees: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forest_structure: Option<Value>,
}

impl TrainResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            tree_depth: None,
            tree_structure: None,
            number_of_trees: None,
            forest_structure: None,
        }
    }

    fn tree(algorithm: Algorithm, depth: usize, structure: Value) -> Self {
        Self {
            status: Status::Success,
            message: algorithm.trained_message().to_string(),
            tree_depth: Some(depth),
            tree_structure: Some(structure),
            ..Self::error("")
        }
    }

    fn forest(algorithm: Algorithm, num_trees: usize, structure: Value) -> Self {
        Self {
            status: Status::Success,
            message: algorithm.trained_message().to_string(),
            number_of_trees: Some(num_trees),
            forest_structure: Some(structure),
            ..Self::error("")
        }
    }
}

/// A model handed back for prediction.
///
/// `model_details` is the training response (or any object) holding the
/// `treeStructure` or `forestStructure` key for the algorithm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub algorithm: String,
    pub model_details: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub trained_model: TrainedModel,
    pub prediction_data: Vec<f64>,
}

/// A class label or a regression value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prediction {
    Class(i64),
    Value(f64),
}

impl From<i64> for Prediction {
    fn from(label: i64) -> Self {
        Self::Class(label)
    }
}

impl From<f64> for Prediction {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PredictResponse {
    pub fn success(prediction: Prediction) -> Self {
        Self {
            status: Status::Success,
            prediction: Some(prediction),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            prediction: None,
            message: Some(message.into()),
        }
    }
}

/// Fits the requested learner and returns its serialized form.
pub fn train(request: &TrainRequest) -> Result<TrainResponse, ModelError> {
    let algorithm = request.algorithm.parse::<Algorithm>()?;
    let data = &request.training_data;
    let response = match algorithm {
        Algorithm::DecisionTreeRegressor => {
            let (depth, structure) = train_tree::<Regression>(data, &request.params)?;
            TrainResponse::tree(algorithm, depth, structure)
        }
        Algorithm::DecisionTreeClassifier => {
            let (depth, structure) = train_tree::<Classification>(data, &request.params)?;
            TrainResponse::tree(algorithm, depth, structure)
        }
        Algorithm::RandomForestRegressor => {
            let (num_trees, structure) = train_forest::<Regression>(data, &request.params)?;
            TrainResponse::forest(algorithm, num_trees, structure)
        }
        Algorithm::RandomForestClassifier => {
            let (num_trees, structure) = train_forest::<Classification>(data, &request.params)?;
            TrainResponse::forest(algorithm, num_trees, structure)
        }
    };
    info!(%algorithm, samples = data.x.len(), "trained model");
    Ok(response)
}

fn train_tree<K: TreeKind>(
    data: &TrainingData,
    params: &HyperParams,
) -> Result<(usize, Value), ModelError> {
    let tree_params = params.tree_params()?;
    let dataset = data.to_dataset::<K>()?;
    let mut model = DecisionTree::<K>::from_params(tree_params);
    model.fit(&dataset)?;
    let tree = model.tree().ok_or(ModelError::NotFitted)?;
    Ok((tree.depth(), tree.to_json()?))
}

fn train_forest<K: TreeKind>(
    data: &TrainingData,
    params: &HyperParams,
) -> Result<(usize, Value), ModelError> {
    let forest_params = params.forest_params()?;
    let seed = params.seed()?;
    let dataset = data.to_dataset::<K>()?;
    let mut model = Forest::<K>::from_params(forest_params);
    model.fit(&dataset, seed)?;
    Ok((model.num_trees(), model.to_json()?))
}

/// Decodes the model carried by the request and predicts its single row.
pub fn predict(request: &PredictRequest) -> Result<Prediction, ModelError> {
    let model = &request.trained_model;
    let algorithm = model.algorithm.parse::<Algorithm>()?;
    let key = algorithm.structure_key();
    let structure = model
        .model_details
        .get(key)
        .ok_or_else(|| ModelError::MalformedModel(format!("missing `{key}`")))?;
    let row = &request.prediction_data;

    match algorithm {
        Algorithm::DecisionTreeRegressor => predict_tree::<Regression>(structure, row),
        Algorithm::DecisionTreeClassifier => predict_tree::<Classification>(structure, row),
        Algorithm::RandomForestRegressor => predict_forest::<Regression>(structure, row),
        Algorithm::RandomForestClassifier => predict_forest::<Classification>(structure, row),
    }
}

fn predict_tree<K: TreeKind>(structure: &Value, row: &[f64]) -> Result<Prediction, ModelError>
where
    K::Label: Into<Prediction>,
{
    Ok(Tree::<K>::from_json(structure)?.predict_row(row)?.into())
}

fn predict_forest<K: TreeKind>(structure: &Value, row: &[f64]) -> Result<Prediction, ModelError>
where
    K::Label: Into<Prediction>,
{
    Ok(Forest::<K>::from_json(structure)?.predict_row(row)?.into())
}

/// Handles a raw training request body; failures become an error response.
#[instrument(skip_all, fields(len = body.len()))]
pub fn handle_train_request(body: &str) -> String {
    let response = serde_json::from_str::<TrainRequest>(body)
        .map_err(|error| ModelError::InvalidRequest(error.to_string()))
        .and_then(|request| train(&request))
        .unwrap_or_else(|error| {
            warn!(%error, "training request failed");
            TrainResponse::error(error.to_string())
        });
    render(&response)
}

/// Handles a raw prediction request body; failures become an error response.
#[instrument(skip_all, fields(len = body.len()))]
pub fn handle_predict_request(body: &str) -> String {
    let response = serde_json::from_str::<PredictRequest>(body)
        .map_err(|error| ModelError::InvalidRequest(error.to_string()))
        .and_then(|request| predict(&request))
        .map(PredictResponse::success)
        .unwrap_or_else(|error| {
            warn!(%error, "prediction request failed");
            PredictResponse::error(error.to_string())
        });
    render(&response)
}

fn render<T: Serialize>(response: &T) -> String {
    serde_json::to_string(response).unwrap_or_else(|error| {
        serde_json::json!({ "status": Status::Error, "message": error.to_string() }).to_string()
    })
}
