pub mod catalog;
pub mod classification;
pub mod config;
pub mod error;
pub mod telemetry;
