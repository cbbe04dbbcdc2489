//! Parsers for the unicorn companies table.
//!
//! # Parsers
//!
//! - [`csv_parser`]: Read a delimited file into a polars `DataFrame` of text columns
//! - [`normalizer`]: Derive typed [`CompanyRecord`](crate::core::domain::CompanyRecord)s,
//!   the join year and the numeric valuation
//!
//! # Example
//!
//! ```no_run
//! use unicorn_analysis::parsing::csv_parser::load_table;
//! use unicorn_analysis::parsing::normalizer::{normalize, ParsePolicy};
//! use std::path::Path;
//!
//! let raw = load_table(Path::new("Unicorn_Companies.csv"), b',')
//!     .expect("Failed to load table");
//! let outcome = normalize(&raw, ParsePolicy::Abort).expect("Failed to normalize");
//! println!("{} companies", outcome.dataset.len());
//! ```

pub mod csv_parser;
pub mod normalizer;

#[cfg(test)]
mod csv_parser_tests;

pub use csv_parser::{load_table, parse_table_str, DEFAULT_DELIMITER};
pub use normalizer::{normalize, NormalizeOutcome, ParsePolicy};
