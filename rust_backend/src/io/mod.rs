//! High-level data loading utilities.
//!
//! Loaders combine the table parser with the normalizer and fingerprint the
//! input, producing a ready-to-query [`Dataset`](crate::core::domain::Dataset).
//!
//! # Example
//!
//! ```no_run
//! use unicorn_analysis::io::loaders::CompanyLoader;
//! use unicorn_analysis::parsing::normalizer::ParsePolicy;
//! use std::path::Path;
//!
//! let path = Path::new("Unicorn_Companies.csv");
//! let result = CompanyLoader::load_from_file(path, b',', ParsePolicy::Abort)
//!     .expect("Failed to load");
//! println!("Loaded {} companies", result.num_records());
//! ```

pub mod checksum;
pub mod loaders;


pub use checksum::calculate_checksum;
pub use loaders::{CompanyLoadResult, CompanyLoader};
