//! Missing-data handling and record filtering.
//!
//! # Modules
//!
//! - [`cleaning`]: Missing counts, row/column removal, backward fill and their comparison
//! - [`filtering`]: Criteria, join-year and continent filters over a dataset
//!
//! # Example
//!
//! ```no_run
//! use unicorn_analysis::core::domain::Dataset;
//! use unicorn_analysis::transformations::{resolve, year_filter, MissingSentinels};
//!
//! # fn example(dataset: &Dataset) {
//! let report = resolve(dataset.frame(), &dataset.source_rows(), &MissingSentinels::native())
//!     .expect("frame operations succeed");
//! println!("{} missing cells", report.counts.total);
//!
//! let recent = year_filter(dataset, 2020);
//! println!("{} companies joined after 2020", recent.len());
//! # }
//! ```

pub mod cleaning;
pub mod filtering;

pub use cleaning::{
    backfill, drop_missing_columns, drop_missing_rows, missing_counts, resolve, retention,
    rows_with_missing, MissingDataReport, MissingSentinels, MissingStrategy,
};
pub use filtering::{
    criteria_filter, filter_by_continent, year_filter, SearchCriteria, SearchCriterion,
};
