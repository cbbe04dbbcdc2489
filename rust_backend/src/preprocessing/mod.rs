//! Dataset quality checks and the end-to-end analysis pipeline.

pub mod pipeline;
pub mod validator;

pub use pipeline::{run_analysis, AnalysisPipeline, AnalysisReport};
pub use validator::{DatasetValidator, ValidationResult, ValidationStats};
