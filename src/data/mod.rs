/// Training set container
pub mod dataset;
