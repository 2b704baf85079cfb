use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use csv::ReaderBuilder;
use tracing::{info, warn};

use rusty_forest::{
    data::dataset::Dataset,
    forests::{RandomForestClassifier, RandomForestRegressor},
    metrics::{ClassificationMetrics, RegressionMetrics},
    service::{
        self, Algorithm, HyperParams, PredictRequest, TrainRequest, TrainedModel, TrainingData,
    },
    trees::{Classification, DecisionTreeClassifier, DecisionTreeRegressor, Regression},
};

#[derive(Parser)]
#[command(name = "rusty-forest")]
#[command(about = "Train decision trees and random forests, and predict from saved models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Args, Debug, Clone)]
struct TreeArgs {
    /// Maximum tree depth
    #[arg(long, default_value_t = 5)]
    max_depth: usize,

    /// Minimum number of samples required to split a node
    #[arg(long, default_value_t = 2)]
    min_samples_split: usize,

    /// Number of trees (forests only)
    #[arg(long, default_value_t = 10)]
    n_estimators: usize,

    /// RNG seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

impl TreeArgs {
    fn hyper_params(&self) -> HyperParams {
        HyperParams {
            max_depth: Some(self.max_depth as f64),
            min_samples_split: Some(self.min_samples_split as f64),
            n_estimators: Some(self.n_estimators as f64),
            seed: self.seed.map(|seed| seed as f64),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Fit a model on a CSV file whose last column is the label
    Train {
        /// Path to the training CSV file
        #[arg(long)]
        data: PathBuf,

        /// One of decisionTreeRegressor, decisionTreeClassifier,
        /// randomForestRegressor, randomForestClassifier
        #[arg(long)]
        algorithm: String,

        /// The CSV file starts with a header row
        #[arg(long, default_value_t = false)]
        header: bool,

        /// Fraction of rows held out to report evaluation metrics (0 disables)
        #[arg(long, default_value_t = 0.2)]
        holdout: f64,

        /// Write the trained model here instead of printing the response
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Predict one row with a model written by `train --output`
    Predict {
        /// Path to the saved model
        #[arg(long)]
        model: PathBuf,

        /// Comma-separated feature values
        #[arg(long, allow_hyphen_values = true)]
        row: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Train {
            data,
            algorithm,
            header,
            holdout,
            output,
            tree,
        } => run_train(&data, &algorithm, header, holdout, output, &tree),
        Command::Predict { model, row } => run_predict(&model, &row),
    }
}

fn read_training_data(path: &Path, header: bool) -> Result<TrainingData> {
    let mut reader = ReaderBuilder::new()
        .has_headers(header)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut training_data = TrainingData::default();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        let values = record
            .iter()
            .map(|field| field.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("non-numeric field on record {line}"))?;
        let Some((label, features)) = values.split_last() else {
            bail!("record {line} is empty");
        };
        training_data.x.push(features.to_vec());
        training_data.y.push(*label);
    }
    info!(
        rows = training_data.x.len(),
        path = %path.display(),
        "read training data"
    );
    Ok(training_data)
}

fn run_train(
    data: &Path,
    algorithm: &str,
    header: bool,
    holdout: f64,
    output: Option<PathBuf>,
    tree: &TreeArgs,
) -> Result<()> {
    let request = TrainRequest {
        algorithm: algorithm.to_string(),
        params: tree.hyper_params(),
        training_data: read_training_data(data, header)?,
    };
    let response = service::train(&request)?;

    if holdout > 0.0 {
        let algorithm = algorithm.parse::<Algorithm>()?;
        report_holdout(algorithm, &request, holdout)?;
    }

    match output {
        Some(path) => {
            let model = TrainedModel {
                algorithm: request.algorithm.clone(),
                model_details: serde_json::to_value(&response)?,
            };
            fs::write(&path, serde_json::to_string_pretty(&model)?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "saved model");
        }
        None => println!("{}", serde_json::to_string_pretty(&response)?),
    }
    Ok(())
}

/// Refits on a shuffled train split and logs metrics on the held-out rows.
fn report_holdout(algorithm: Algorithm, request: &TrainRequest, holdout: f64) -> Result<()> {
    let params = &request.params;
    let seed = params.seed()?;
    let data = &request.training_data;

    match algorithm {
        Algorithm::DecisionTreeClassifier | Algorithm::RandomForestClassifier => {
            let dataset = data.to_dataset::<Classification>()?;
            let Some((train, test)) = holdout_split(&dataset, holdout, seed)? else {
                return Ok(());
            };
            let (predictions, accuracy) = if algorithm.is_forest() {
                let mut model = RandomForestClassifier::from_params(params.forest_params()?);
                model.fit(&train, seed)?;
                let predictions = model.predict(&test.x)?;
                let accuracy = model.accuracy(&test.y, &predictions)?;
                (predictions, accuracy)
            } else {
                let mut model = DecisionTreeClassifier::from_params(params.tree_params()?);
                model.fit(&train)?;
                let predictions = model.predict(&test.x)?;
                let accuracy = model.accuracy(&test.y, &predictions)?;
                (predictions, accuracy)
            };
            info!(%algorithm, test_rows = predictions.len(), accuracy, "hold-out evaluation");
        }
        Algorithm::DecisionTreeRegressor | Algorithm::RandomForestRegressor => {
            let dataset = data.to_dataset::<Regression>()?;
            let Some((train, test)) = holdout_split(&dataset, holdout, seed)? else {
                return Ok(());
            };
            let (mse, mae, r2) = if algorithm.is_forest() {
                let mut model = RandomForestRegressor::from_params(params.forest_params()?);
                model.fit(&train, seed)?;
                let predictions = model.predict(&test.x)?;
                (
                    model.mse(&test.y, &predictions)?,
                    model.mae(&test.y, &predictions)?,
                    model.r2(&test.y, &predictions)?,
                )
            } else {
                let mut model = DecisionTreeRegressor::from_params(params.tree_params()?);
                model.fit(&train)?;
                let predictions = model.predict(&test.x)?;
                (
                    model.mse(&test.y, &predictions)?,
                    model.mae(&test.y, &predictions)?,
                    model.r2(&test.y, &predictions)?,
                )
            };
            info!(%algorithm, test_rows = test.nrows(), mse, mae, r2, "hold-out evaluation");
        }
    }
    Ok(())
}

type Split<YT> = (Dataset<f64, YT>, Dataset<f64, YT>);

fn holdout_split<YT: rusty_forest::data::dataset::TargetValue>(
    dataset: &Dataset<f64, YT>,
    holdout: f64,
    seed: Option<u64>,
) -> Result<Option<Split<YT>>> {
    let (train, test) = dataset.train_test_split(1.0 - holdout, seed)?;
    if train.nrows() == 0 || test.nrows() == 0 {
        warn!(rows = dataset.nrows(), holdout, "too few rows for a hold-out evaluation");
        return Ok(None);
    }
    Ok(Some((train, test)))
}

fn run_predict(model: &Path, row: &str) -> Result<()> {
    let contents = fs::read_to_string(model)
        .with_context(|| format!("failed to read {}", model.display()))?;
    let trained_model: TrainedModel =
        serde_json::from_str(&contents).context("model file is not a saved model")?;
    let prediction_data = row
        .split(',')
        .map(|value| value.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .context("row must be comma-separated numbers")?;

    let request = PredictRequest {
        trained_model,
        prediction_data,
    };
    let body = serde_json::to_string(&request)?;
    println!("{}", service::handle_predict_request(&body));
    Ok(())
}
