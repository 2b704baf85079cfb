/// Classification metrics
pub mod confusion;
/// Regression error metrics
pub mod errors;

pub use confusion::ClassificationMetrics;
pub use errors::RegressionMetrics;
