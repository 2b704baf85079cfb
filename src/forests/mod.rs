/// Bootstrap resampling
pub mod bootstrap;
/// Random forest classifier alias
pub mod classifier;
/// Bagged tree ensembles
pub mod forest;
/// Forest hyperparameters
pub mod params;
/// Random forest regressor alias
pub mod regressor;

pub use bootstrap::bootstrap_indices;
pub use classifier::RandomForestClassifier;
pub use forest::Forest;
pub use params::ForestParams;
pub use regressor::RandomForestRegressor;
