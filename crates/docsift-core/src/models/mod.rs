//! Data models: pipeline configuration and per-document results.

pub mod config;
pub mod report;

pub use config::{PipelineConfig, SignalWeights};
pub use report::DocumentReport;
