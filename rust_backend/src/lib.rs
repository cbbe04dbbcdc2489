//! Unicorn company valuation analysis.
//!
//! Loads a table of privately held companies valued at one billion or more,
//! compares strategies for its missing data and answers a fixed set of
//! investor questions: which companies match a city/industry shortlist, how
//! valuation is spread across countries, and where recent joiners are.
//!
//! # Example
//!
//! ```no_run
//! use unicorn_analysis::config::AnalysisConfig;
//! use unicorn_analysis::preprocessing::AnalysisPipeline;
//!
//! let pipeline = AnalysisPipeline::with_config(AnalysisConfig::default());
//! let report = pipeline.run().expect("analysis failed");
//! for entry in &report.top_countries {
//!     println!("{}: {:.1}B", entry.country, entry.valuation);
//! }
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod reporting;
pub mod transformations;

pub use error::{AnalysisError, AnalysisResult};
