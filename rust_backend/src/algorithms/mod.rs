//! Aggregations and descriptive statistics.
//!
//! # Components
//!
//! - [`analysis`]: Country valuation sums, top-N ranking with exclusions,
//!   summary statistics and box-plot geometry, computed with polars
//!
//! # Example
//!
//! ```no_run
//! use unicorn_analysis::algorithms::{country_sum, top_n_excluding};
//! use unicorn_analysis::core::domain::Dataset;
//!
//! # fn example(dataset: &Dataset) {
//! let sums = country_sum(dataset).expect("frame operations succeed");
//! let excluded = vec!["United States".to_string(), "China".to_string()];
//! for entry in top_n_excluding(&sums, 20, &excluded) {
//!     println!("{}: {:.1}B", entry.country, entry.valuation);
//! }
//! # }
//! ```

pub mod analysis;

pub use analysis::{
    box_plot_stats, country_sum, describe, overview, top_n_excluding, AggregateView,
    BoxPlotStats, CountryTotal, DatasetOverview, SummaryStats,
};
