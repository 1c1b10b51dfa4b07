mod summary;
pub mod views;

pub use views::{ClassificationMetrics, VerdictDistribution};
